use std::env;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::app::db::{self, NewOrganization};
use crate::app::domain::{OrganizationId, OrganizationRole, RoleName, UserId};
use crate::seeds::{Seed, SeedOutcome};

/// In development, creates the fallback tenant with `DEV_OWNER_ID` as owner.
pub struct DevOrganization;

#[async_trait]
impl Seed for DevOrganization {
    fn version(&self) -> i64 {
        20260101000200
    }

    fn description(&self) -> &str {
        "dev_organization"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error> {
        if env::var("APP_ENV").ok().as_deref() != Some("development") {
            return Ok(SeedOutcome::Skipped);
        }
        let owner = match env::var("DEV_OWNER_ID").ok().map(|s| UserId::from_string(s.trim())) {
            Some(Ok(id)) => id,
            _ => return Ok(SeedOutcome::Skipped),
        };
        let organization_id = match OrganizationId::from_string(
            &env::var("DEFAULT_ORGANIZATION_ID").unwrap_or_else(|_| "dev-org-001".to_string()),
        ) {
            Ok(id) => id,
            Err(_) => return Ok(SeedOutcome::Skipped),
        };

        if db::organizations::find_by_id(pool, &organization_id).await?.is_none() {
            db::organizations::insert(
                pool,
                &NewOrganization {
                    id: organization_id.clone(),
                    name: "Development Organization".to_string(),
                    description: Some("Fallback tenant for local development".to_string()),
                    is_personal: false,
                },
            )
            .await?;
        }
        if db::organizations::find_member_role(pool, &organization_id, &owner)
            .await?
            .is_none()
        {
            let role = RoleName::from(OrganizationRole::Owner);
            db::organizations::add_member(pool, &organization_id, &owner, &role).await?;
        }

        eprintln!("Dev organization {} owned by {}", organization_id, owner);
        Ok(SeedOutcome::Applied)
    }
}
