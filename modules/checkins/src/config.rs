use serde::{Deserialize, Serialize};

/// Configuration for the check-ins module (`modules.checkins`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckInsConfig {
    /// Identity signed in by the static provider; empty means sign-in is cancelled.
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl CheckInsConfig {
    /// Read the module section out of a per-module config bag entry.
    pub fn from_value(value: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        match value {
            Some(v) => Ok(serde_json::from_value(v.clone())?),
            None => Ok(Self::default()),
        }
    }
}
