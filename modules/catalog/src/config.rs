use serde::{Deserialize, Serialize};

/// Configuration for the catalog module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Page size used when the caller does not supply a usable `limit`.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Upper bound on a single uploaded image, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_limit() -> u32 {
    12
}

fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}
