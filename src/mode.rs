use crate::schema::SchemaOptions;
use serde::{Deserialize, Serialize};

/// Validation strictness policy, selected per registered handler.
///
/// The pipeline holds no mode-specific branching: a mode resolves to the two
/// booleans of [`SchemaOptions`] and the schema capability does the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Unknown fields are rejected and values must match their declared type
    /// exactly. Suited to authoritative writes.
    #[default]
    Strict,
    /// Unknown fields are ignored and unambiguous coercions are applied.
    /// Suited to loosely-typed sources such as query strings and form posts.
    Lax,
    /// Like [`ValidationMode::Lax`]; intended for adapters whose framework
    /// request object already normalizes types somewhat.
    Permissive,
}

impl ValidationMode {
    pub fn policy(self) -> SchemaOptions {
        match self {
            Self::Strict => SchemaOptions {
                reject_unknown: true,
                coerce: false,
            },
            Self::Lax | Self::Permissive => SchemaOptions {
                reject_unknown: false,
                coerce: true,
            },
        }
    }
}
