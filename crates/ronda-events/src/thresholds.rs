//! Classification cut-offs.
//!
//! The defaults are tuned for small caps, where a 3% move is ordinary noise.
//! Larger companies move less on the same news, so their price cut-offs are
//! scaled down. Volume-ratio cut-offs are relative already and do not scale.

use ronda_traits::{AssetClass, Result, RondaError};
use serde::{Deserialize, Serialize};

/// Cut-offs for the leakage axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeakageThresholds {
    /// Lead-in move (absolute %) above which leakage is suspected (default: 3.0).
    pub high_drift_pct: f64,
    /// Lead-in volume ratio that must accompany a suspicious drift (default: 1.5).
    pub high_volume_ratio: f64,
    /// Lead-in move (absolute %) below which the company ran a tight ship (default: 1.0).
    pub tight_drift_pct: f64,
    /// Lead-in volume ratio below which the company ran a tight ship (default: 1.2).
    pub tight_volume_ratio: f64,
}

impl Default for LeakageThresholds {
    fn default() -> Self {
        Self {
            high_drift_pct: 3.0,
            high_volume_ratio: 1.5,
            tight_drift_pct: 1.0,
            tight_volume_ratio: 1.2,
        }
    }
}

/// Cut-offs for the conviction axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvictionThresholds {
    /// Day-of move (absolute %) needed for institutional conviction (default: 2.0).
    pub institutional_move_pct: f64,
    /// Day-of volume ratio needed for institutional conviction (default: 3.0).
    pub institutional_volume_ratio: f64,
    /// Upward day-of move (%) that flags retail hype (default: 5.0).
    pub hype_move_pct: f64,
    /// Volume ratio below which a large move lacks support (default: 2.0).
    pub hype_volume_ratio: f64,
    /// Day-of move (absolute %) below which the market ignored the news (default: 1.0).
    pub quiet_move_pct: f64,
    /// Volume ratio below which the market ignored the news (default: 1.0).
    pub quiet_volume_ratio: f64,
}

impl Default for ConvictionThresholds {
    fn default() -> Self {
        Self {
            institutional_move_pct: 2.0,
            institutional_volume_ratio: 3.0,
            hype_move_pct: 5.0,
            hype_volume_ratio: 2.0,
            quiet_move_pct: 1.0,
            quiet_volume_ratio: 1.0,
        }
    }
}

/// Cut-offs for the retention axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionThresholds {
    /// Day-of move (absolute %) below which retention is not assessed (default: 1.0).
    pub materiality_pct: f64,
    /// Share of the day-of move that must still stand after the lead-out (default: 0.5).
    pub hold_fraction: f64,
}

impl Default for RetentionThresholds {
    fn default() -> Self {
        Self {
            materiality_pct: 1.0,
            hold_fraction: 0.5,
        }
    }
}

/// The full threshold table injected into every classification call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Leakage cut-offs.
    pub leakage: LeakageThresholds,
    /// Conviction cut-offs.
    pub conviction: ConvictionThresholds,
    /// Retention cut-offs.
    pub retention: RetentionThresholds,
}

impl Thresholds {
    /// Threshold table for an asset class.
    ///
    /// Price cut-offs are multiplied by [`price_scale`](Self::price_scale);
    /// small caps get the defaults.
    #[must_use]
    pub fn for_asset_class(asset_class: AssetClass) -> Self {
        Self::default().scaled(Self::price_scale(asset_class))
    }

    /// Multiplier applied to percentage cut-offs (1.0, 2/3 and 1/2 for
    /// small, mid and large caps).
    #[must_use]
    pub const fn price_scale(asset_class: AssetClass) -> f64 {
        match asset_class {
            AssetClass::SmallCap => 1.0,
            AssetClass::MidCap => 2.0 / 3.0,
            AssetClass::LargeCap => 0.5,
        }
    }

    /// Copy of this table with every percentage cut-off multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let mut scaled = self.clone();
        scaled.leakage.high_drift_pct *= factor;
        scaled.leakage.tight_drift_pct *= factor;
        scaled.conviction.institutional_move_pct *= factor;
        scaled.conviction.hype_move_pct *= factor;
        scaled.conviction.quiet_move_pct *= factor;
        scaled.retention.materiality_pct *= factor;
        scaled
    }

    /// Reject tables that would make a class unreachable or divide by zero.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("leakage.high_drift_pct", self.leakage.high_drift_pct),
            ("leakage.high_volume_ratio", self.leakage.high_volume_ratio),
            ("leakage.tight_drift_pct", self.leakage.tight_drift_pct),
            ("leakage.tight_volume_ratio", self.leakage.tight_volume_ratio),
            ("conviction.institutional_move_pct", self.conviction.institutional_move_pct),
            ("conviction.institutional_volume_ratio", self.conviction.institutional_volume_ratio),
            ("conviction.hype_move_pct", self.conviction.hype_move_pct),
            ("conviction.hype_volume_ratio", self.conviction.hype_volume_ratio),
            ("conviction.quiet_move_pct", self.conviction.quiet_move_pct),
            ("conviction.quiet_volume_ratio", self.conviction.quiet_volume_ratio),
            ("retention.materiality_pct", self.retention.materiality_pct),
            ("retention.hold_fraction", self.retention.hold_fraction),
        ];
        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(RondaError::InvalidConfig(format!(
                    "threshold {name} must be positive, got {value}"
                )));
            }
        }
        if self.leakage.tight_drift_pct >= self.leakage.high_drift_pct {
            return Err(RondaError::InvalidConfig(
                "leakage.tight_drift_pct must be below leakage.high_drift_pct".to_string(),
            ));
        }
        Ok(())
    }
}
