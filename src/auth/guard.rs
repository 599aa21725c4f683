//! The auth pipeline: bearer-token verification and role-based access.

use crate::adapters::FrameworkAdapter;
use crate::auth::token::{TokenClaims, TokenService};
use crate::context::RequestContext;
use crate::error::AuthError;

/// Guards a handler behind a verified bearer token, optionally gated on the
/// token's `role` claim.
///
/// The guard always uses the verifying decode; signature and expiry are
/// checked on every request, not only at issuance.
pub struct AuthGuard {
    service: TokenService,
    allowed_roles: Option<Vec<String>>,
}

impl AuthGuard {
    /// Require any authenticated caller.
    pub fn bearer(service: TokenService) -> Self {
        Self {
            service,
            allowed_roles: None,
        }
    }

    /// Require an authenticated caller whose `role` claim is in the
    /// allow-list.
    ///
    /// An empty allow-list admits nobody: every authenticated caller is
    /// rejected with 403.
    pub fn with_roles<I, R>(service: TokenService, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            service,
            allowed_roles: Some(roles.into_iter().map(Into::into).collect()),
        }
    }

    /// Extract, verify, and authorize the request's bearer token.
    pub fn authorize<A: FrameworkAdapter>(
        &self,
        adapter: &A,
        request: &A::Request,
    ) -> Result<TokenClaims, AuthError> {
        let header = adapter
            .auth_header(request)
            .ok_or(AuthError::MissingCredentials)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingCredentials)?;

        let claims = self.service.decode(token)?;

        if let Some(allowed) = &self.allowed_roles {
            let role = claims.role().ok_or(AuthError::Forbidden)?;
            if !allowed.iter().any(|r| r == role) {
                return Err(AuthError::Forbidden);
            }
        }

        Ok(claims)
    }

    /// Run the guard and pass control to `next` with the decoded payload
    /// attached to the context, or convert the failure through the adapter.
    /// `next` is never invoked on failure.
    pub fn run<A, H>(
        &self,
        adapter: &A,
        request: &A::Request,
        mut ctx: RequestContext,
        next: H,
    ) -> A::Response
    where
        A: FrameworkAdapter,
        H: FnOnce(RequestContext) -> A::Response,
    {
        match self.authorize(adapter, request) {
            Ok(claims) => {
                ctx.claims = Some(claims);
                next(ctx)
            }
            Err(error) => {
                tracing::warn!(status = error.status_code(), %error, "request rejected by auth guard");
                adapter.auth_error_response(error)
            }
        }
    }
}
