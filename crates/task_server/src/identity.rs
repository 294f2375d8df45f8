use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::header::HeaderName;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use task_core::OwnerId;

use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<OwnerId>;
}

#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: HeaderName,
}

impl HeaderIdentity {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl Default for HeaderIdentity {
    fn default() -> Self {
        Self::new(HeaderName::from_static(DEFAULT_IDENTITY_HEADER))
    }
}

impl IdentityResolver for HeaderIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Option<OwnerId> {
        let raw = headers.get(&self.header)?.to_str().ok()?;
        OwnerId::parse(raw).ok()
    }
}

pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let owner = state
        .identity
        .resolve(request.headers())
        .ok_or_else(|| ApiError::unauthenticated("missing or invalid user identity"))?;

    request.extensions_mut().insert(owner);
    Ok(next.run(request).await)
}

#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OwnerId>()
            .cloned()
            .map(Owner)
            .ok_or_else(|| ApiError::unauthenticated("request has no resolved user identity"))
    }
}
