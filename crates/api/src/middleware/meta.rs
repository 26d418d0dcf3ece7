//! Request metadata extractor for audit enrichment.

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use sentinel_db::repositories::AuditContext;

use crate::middleware::auth::AuthUser;

/// Client IP and user agent captured from request headers, recorded on every
/// audit entry the request produces.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Build the [`AuditContext`] for this request's write pipeline.
    pub fn audit_context(&self, user: &AuthUser) -> AuditContext {
        AuditContext {
            actor_id: Some(user.user_id),
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    /// Audit context for requests without an authenticated actor (login).
    pub fn anonymous_context(&self) -> AuditContext {
        AuditContext {
            actor_id: None,
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Behind a proxy the original client is the first hop in
        // X-Forwarded-For.
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string());

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(Self {
            ip_address,
            user_agent,
        })
    }
}
