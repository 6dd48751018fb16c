use strum_macros::{Display, EnumString};

use crate::app::domain::OrganizationId;

/// Deployment environment. Read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

/// Centralized environment configuration.
/// All env vars and defaults are defined here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. Required.
    pub database_url: String,

    /// Address the HTTP server binds to.
    /// Default: 0.0.0.0:3000
    pub bind_addr: String,

    /// Deployment environment.
    /// Default: production
    pub environment: Environment,

    /// Tenant substituted when a request names none. Only honoured in development.
    /// Default: dev-org-001
    pub default_organization_id: OrganizationId,

    /// Identity adapter: "auth_service" or "static".
    /// Default: auth_service
    pub identity_adapter: String,

    /// Base URL of the authentication service.
    /// Default: http://localhost:8001
    pub auth_service_url: String,

    /// `token=user,...` pairs for the static identity adapter.
    pub static_tokens: Option<String>,
}

impl Config {
    /// Build config from environment variables.
    /// Returns an error if required vars are missing.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env")?;

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let environment = std::env::var("APP_ENV")
            .unwrap_or_else(|_| "production".to_string())
            .parse::<Environment>()
            .map_err(|_| "APP_ENV must be one of development, test, production")?;

        let default_organization_id = OrganizationId::from_string(
            &std::env::var("DEFAULT_ORGANIZATION_ID").unwrap_or_else(|_| "dev-org-001".to_string()),
        )
        .map_err(|e| format!("DEFAULT_ORGANIZATION_ID is invalid: {}", e))?;

        let identity_adapter = std::env::var("IDENTITY_ADAPTER")
            .unwrap_or_else(|_| "auth_service".to_string());

        let auth_service_url = std::env::var("AUTH_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8001".to_string());

        let static_tokens = std::env::var("STATIC_TOKENS").ok();

        Ok(Self {
            database_url,
            bind_addr,
            environment,
            default_organization_id,
            identity_adapter,
            auth_service_url,
            static_tokens,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Fallback tenant for requests without one, if this environment allows it.
    pub fn fallback_organization(&self) -> Option<&OrganizationId> {
        self.is_development().then_some(&self.default_organization_id)
    }

    /// Config for tests. Uses in-memory database URL and static identity tokens.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            environment: Environment::Test,
            default_organization_id: OrganizationId::from_string("dev-org-001")
                .unwrap_or_default(),
            identity_adapter: "static".to_string(),
            auth_service_url: "http://localhost:8001".to_string(),
            static_tokens: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_tenant_only_in_development() {
        let mut config = Config::for_tests();
        assert!(config.fallback_organization().is_none());

        config.environment = Environment::Production;
        assert!(config.fallback_organization().is_none());

        config.environment = Environment::Development;
        assert_eq!(
            config.fallback_organization().map(|id| id.as_str()),
            Some("dev-org-001")
        );
    }

    #[test]
    fn environment_parses_lowercase() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }
}
