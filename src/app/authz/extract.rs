//! Request extractors carrying the caller's verified identity and tenant.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::{Membership, Permission};
use crate::app::domain::{OrganizationId, UserId};
use crate::app::error::AppError;
use crate::app::{tenant, AppState};

/// A caller whose bearer credential was verified. No tenant involved.
#[derive(Debug, Clone)]
pub struct Authenticated(pub UserId);

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthenticated)?;

        let user_id = state.identity.verify(token).await?;
        Ok(Self(user_id))
    }
}

/// A verified caller who is a member of the request's organization.
#[derive(Debug, Clone)]
pub struct TenantMember(pub Membership);

#[axum::async_trait]
impl FromRequestParts<AppState> for TenantMember {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Authenticated(user_id) = Authenticated::from_request_parts(parts, state).await?;
        let organization_id = tenant::resolve_organization(&parts.headers, &state.config)?;
        let membership = state
            .gate
            .resolver()
            .resolve_role(&user_id, &organization_id)
            .await?;
        membership
            .map(Self)
            .ok_or(AppError::NoMembership { organization_id })
    }
}

/// A verified caller allowed `P` in the request's organization.
#[derive(Debug)]
pub struct Authorized<P> {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    _permission: PhantomData<fn() -> P>,
}

#[axum::async_trait]
impl<P: Permission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Authenticated(user_id) = Authenticated::from_request_parts(parts, state).await?;
        let organization_id = tenant::resolve_organization(&parts.headers, &state.config)?;
        let user_id = state
            .gate
            .authorize(&user_id, &organization_id, P::RESOURCE, P::ACTION)
            .await?;
        Ok(Self {
            user_id,
            organization_id,
            _permission: PhantomData,
        })
    }
}
