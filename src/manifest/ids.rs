//! Item and resource identifier derivation.

use serde::{Deserialize, Serialize};

/// Identifier of the shared-asset resource every module depends on.
pub const COMMON_RESOURCE_ID: &str = "common_files";

/// How `item_*` / `resource_*` identifiers are derived for a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierScheme {
    /// From the module key; stable when the module table is reordered.
    #[default]
    Key,
    /// From the module's position in the discovery result.
    Sequence,
}

/// The `item`/`resource` identifier pair of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIds {
    pub item: String,
    pub resource: String,
}

impl IdentifierScheme {
    pub fn ids(self, key: &str, index: usize) -> ModuleIds {
        let suffix = match self {
            IdentifierScheme::Sequence => format!("{:03}", index),
            IdentifierScheme::Key => key_suffix(key),
        };
        ModuleIds {
            item: format!("item_{}", suffix),
            resource: format!("resource_{}", suffix),
        }
    }
}

/// Numeric keys are zero-padded like sequence ids; anything else is reduced to
/// XML name characters.
fn key_suffix(key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        return format!("{:0>3}", key);
    }
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
