//! Global fields configuration

use serde::{Deserialize, Serialize};

/// Fields recorded once on the root span
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fields {
    pub service: Option<String>,
    /// Deployment environment (dev/staging/prod)
    pub env: Option<String>,
    pub version: Option<String>,
    pub instance: Option<String>,
}

impl Fields {
    /// Read fields from `DEVSHARE_SERVICE`, `DEVSHARE_ENV`, `DEVSHARE_VERSION`
    /// and `DEVSHARE_INSTANCE`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            service: std::env::var("DEVSHARE_SERVICE").ok(),
            env: std::env::var("DEVSHARE_ENV").ok(),
            version: std::env::var("DEVSHARE_VERSION")
                .ok()
                .or_else(|| option_env!("CARGO_PKG_VERSION").map(String::from)),
            instance: std::env::var("DEVSHARE_INSTANCE").ok(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.env.is_none()
            && self.version.is_none()
            && self.instance.is_none()
    }
}
