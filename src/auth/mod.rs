//! Bearer-token authentication: issuance, verification, and the request
//! guard.

mod guard;
mod token;

pub use guard::AuthGuard;
pub use token::{decode_unverified, TokenClaims, TokenConfig, TokenService};
