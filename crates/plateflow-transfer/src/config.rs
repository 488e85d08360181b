//! Configuration for transfer planning
//!
//! Defines the fill order for destination plates and volume limits.

use plateflow_domain::FillOrder;
use serde::{Deserialize, Serialize};

/// Configuration for the transfer planner
///
/// # Examples
///
/// ```
/// use plateflow_domain::FillOrder;
/// use plateflow_transfer::TransferConfig;
///
/// // Default: samples go down columns first
/// let config = TransferConfig::default();
/// assert_eq!(config.fill_order, FillOrder::ColumnMajor);
///
/// // Fill across rows instead
/// let config = TransferConfig::row_wise();
/// assert_eq!(config.fill_order, FillOrder::RowMajor);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Order in which samples are placed into destination plates
    /// Default: column-major (A1, B1, C1, ...)
    #[serde(default = "default_fill_order")]
    pub fill_order: FillOrder,

    /// Volume used when a caller does not specify one (ul)
    /// Default: 20 ul
    #[serde(default = "default_volume_ul")]
    pub default_volume_ul: f64,

    /// Largest single transfer accepted (ul)
    /// Default: 1000 ul
    #[serde(default = "default_max_volume_ul")]
    pub max_volume_ul: f64,
}

fn default_fill_order() -> FillOrder {
    FillOrder::ColumnMajor
}

fn default_volume_ul() -> f64 {
    20.0
}

fn default_max_volume_ul() -> f64 {
    1000.0
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            fill_order: default_fill_order(),
            default_volume_ul: default_volume_ul(),
            max_volume_ul: default_max_volume_ul(),
        }
    }
}

impl TransferConfig {
    /// Row-major preset: samples go across rows first (A1, A2, A3, ...)
    pub fn row_wise() -> Self {
        Self {
            fill_order: FillOrder::RowMajor,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_volume_ul.is_finite() || self.max_volume_ul <= 0.0 {
            return Err("max_volume_ul must be a positive number".to_string());
        }
        if !self.default_volume_ul.is_finite() || self.default_volume_ul < 0.0 {
            return Err("default_volume_ul must be a non-negative number".to_string());
        }
        if self.default_volume_ul > self.max_volume_ul {
            return Err("default_volume_ul cannot exceed max_volume_ul".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
