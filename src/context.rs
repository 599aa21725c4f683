use crate::auth::TokenClaims;

/// Per-call state threaded through the guard and pipeline chain.
///
/// Each stage populates its own slot: the auth guard sets `claims` after a
/// successful decode, the validation pipeline hands the validated object to
/// the handler directly. Handlers receive the context by value; it is built
/// fresh for every inbound call and dropped when the call completes.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Decoded token payload, present once the auth guard has run.
    pub claims: Option<TokenClaims>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claims(mut self, claims: TokenClaims) -> Self {
        self.claims = Some(claims);
        self
    }
}
