//! Cycle accounting configuration

use serde::Deserialize;

use crate::domain::cycles::PartialPolicy;

/// Cycle accounting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccountingConfig {
    /// Report negative partial counts as zero
    #[serde(default = "default_clamp")]
    pub clamp_negative_partials: bool,
}

impl AccountingConfig {
    pub fn partial_policy(&self) -> PartialPolicy {
        PartialPolicy {
            clamp_negative: self.clamp_negative_partials,
        }
    }
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            clamp_negative_partials: default_clamp(),
        }
    }
}

fn default_clamp() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_by_default() {
        assert_eq!(AccountingConfig::default().partial_policy(), PartialPolicy::default());
    }

    #[test]
    fn clamp_can_be_switched_off() {
        let config = AccountingConfig {
            clamp_negative_partials: false,
        };
        assert_eq!(config.partial_policy(), PartialPolicy::raw());
    }
}
