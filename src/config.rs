//! Background renderer configuration
//!
//! Device capability is resolved once by the host page and injected here as a
//! [`RenderProfile`]. Both the point-set animation and the renderer read from
//! the same profile; neither re-derives it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BackgroundError, Result};

/// Per-tier animation parameters
///
/// These are build-time tuning tables, not runtime knobs. The touch tier
/// freezes the point count entirely by combining an effectively-infinite tick
/// interval with zero add probability and zero removals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    /// Upper bound for the randomized "max points" target
    pub max_pts_upper: usize,
    /// Lower bound for the randomized "max points" target
    pub max_pts_lower: usize,
    /// Upper bound for the randomized "min points" target
    pub min_pts_upper: usize,
    /// Lower bound for the randomized "min points" target
    pub min_pts_lower: usize,
    /// Probability (percent) of adding a point on a growth tick
    pub add_pt_prob: f64,
    /// Milliseconds between point-set updates
    pub tick_interval_ms: f64,
    /// Points removed per tick while shrinking
    pub removals_per_tick: usize,
}

const DESKTOP_PARAMS: ProfileParams = ProfileParams {
    max_pts_upper: 300,
    max_pts_lower: 100,
    min_pts_upper: 70,
    min_pts_lower: 30,
    add_pt_prob: 50.0,
    tick_interval_ms: 45.0,
    removals_per_tick: 1,
};

const MOBILE_PARAMS: ProfileParams = ProfileParams {
    max_pts_upper: 60,
    max_pts_lower: 30,
    min_pts_upper: 20,
    min_pts_lower: 10,
    add_pt_prob: 0.0,
    tick_interval_ms: 99_999.0,
    removals_per_tick: 0,
};

/// Device capability tier for the background animation
///
/// `Desktop` means a pointer-capable device running the full animation;
/// `Touch` means a touch-only device that renders a static diagram with
/// thicker lines.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderProfile {
    /// Pointer-capable device: animated point set, 1 px lines
    Desktop,
    /// Touch-only device: frozen point set, thick lines
    Touch,
}

impl RenderProfile {
    /// Get the animation parameter table for this tier
    pub fn params(self) -> ProfileParams {
        match self {
            RenderProfile::Desktop => DESKTOP_PARAMS,
            RenderProfile::Touch => MOBILE_PARAMS,
        }
    }

    /// Line width in device pixels for this tier
    ///
    /// Touch devices get wider lines to compensate for lower visibility.
    pub fn line_width(self) -> f32 {
        match self {
            RenderProfile::Desktop => 1.0,
            RenderProfile::Touch => 3.0,
        }
    }

    /// Cap on per-cell nested layers for this tier
    ///
    /// Touch devices render roughly a third of the style's layer count
    /// (rounded up, at least one layer) to keep fill rate down.
    pub fn layer_cap(self, style_max_layers: usize) -> usize {
        match self {
            RenderProfile::Desktop => style_max_layers,
            RenderProfile::Touch => style_max_layers.div_ceil(3).max(1),
        }
    }

    /// Get a human-readable name for this tier
    pub fn name(self) -> &'static str {
        match self {
            RenderProfile::Desktop => "Desktop",
            RenderProfile::Touch => "Touch",
        }
    }
}

impl Default for RenderProfile {
    fn default() -> Self {
        RenderProfile::Desktop
    }
}

/// Configuration for the background scene
///
/// The seed drives every stochastic decision (initial fill, growth ticks,
/// target re-randomization). Two scenes built from the same configuration and
/// fed the same events evolve identically, which the tests rely on; the
/// default seed is random, so visuals differ across sessions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundConfig {
    /// Random seed for the point-set animation
    pub seed: u32,
    /// Device capability tier
    pub profile: RenderProfile,
    /// Device pixel ratio (logical px -> device px scale factor)
    pub pixel_ratio: f64,
}

impl BackgroundConfig {
    /// Get the animation parameter table for the configured tier
    #[inline]
    pub fn params(&self) -> ProfileParams {
        self.profile.params()
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            profile: RenderProfile::default(),
            pixel_ratio: 1.0,
        }
    }
}

/// Builder for creating [`BackgroundConfig`] with validation
///
/// # Example
///
/// ```rust
/// use voronoi_lines::{BackgroundConfigBuilder, RenderProfile};
///
/// let config = BackgroundConfigBuilder::new()
///     .seed(42)
///     .profile(RenderProfile::Desktop)
///     .pixel_ratio(2.0)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, 42);
/// ```
#[derive(Debug, Clone)]
pub struct BackgroundConfigBuilder {
    seed: Option<u32>,
    profile: RenderProfile,
    pixel_ratio: f64,
}

impl BackgroundConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - profile: Desktop
    /// - pixel_ratio: 1.0
    pub fn new() -> Self {
        Self {
            seed: None,
            profile: RenderProfile::default(),
            pixel_ratio: 1.0,
        }
    }

    /// Set the random seed for the point-set animation
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the device capability tier
    pub fn profile(mut self, profile: RenderProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the device pixel ratio
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the ratio is not finite and positive.
    pub fn pixel_ratio(mut self, ratio: f64) -> Result<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(BackgroundError::InvalidConfig(format!(
                "pixel ratio must be finite and positive (got {})",
                ratio
            )));
        }
        self.pixel_ratio = ratio;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<BackgroundConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(BackgroundConfig {
            seed,
            profile: self.profile,
            pixel_ratio: self.pixel_ratio,
        })
    }
}

impl Default for BackgroundConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_params() {
        let desktop = RenderProfile::Desktop.params();
        assert_eq!(desktop.max_pts_upper, 300);
        assert_eq!(desktop.min_pts_lower, 30);
        assert_eq!(desktop.removals_per_tick, 1);

        let touch = RenderProfile::Touch.params();
        assert_eq!(touch.add_pt_prob, 0.0);
        assert_eq!(touch.removals_per_tick, 0);
        assert!(touch.tick_interval_ms > 10_000.0);
    }

    #[test]
    fn test_line_widths() {
        assert_eq!(RenderProfile::Desktop.line_width(), 1.0);
        assert_eq!(RenderProfile::Touch.line_width(), 3.0);
    }

    #[test]
    fn test_layer_cap() {
        assert_eq!(RenderProfile::Desktop.layer_cap(15), 15);
        assert_eq!(RenderProfile::Touch.layer_cap(15), 5);
        assert_eq!(RenderProfile::Touch.layer_cap(7), 3);
        // Single-layer styles are never capped to zero
        assert_eq!(RenderProfile::Touch.layer_cap(1), 1);
    }

    #[test]
    fn test_builder_defaults() {
        let config = BackgroundConfigBuilder::new().build().unwrap();
        assert_eq!(config.profile, RenderProfile::Desktop);
        assert_eq!(config.pixel_ratio, 1.0);
        let _seed = config.seed; // random, just verify it was set
    }

    #[test]
    fn test_builder_custom() {
        let config = BackgroundConfigBuilder::new()
            .seed(7)
            .profile(RenderProfile::Touch)
            .pixel_ratio(1.5)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.profile, RenderProfile::Touch);
        assert_eq!(config.pixel_ratio, 1.5);
    }

    #[test]
    fn test_builder_invalid_pixel_ratio() {
        assert!(BackgroundConfigBuilder::new().pixel_ratio(0.0).is_err());
        assert!(BackgroundConfigBuilder::new().pixel_ratio(-1.0).is_err());
        assert!(BackgroundConfigBuilder::new()
            .pixel_ratio(f64::NAN)
            .is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = BackgroundConfigBuilder::new()
            .seed(12345)
            .profile(RenderProfile::Touch)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: BackgroundConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.seed, restored.seed);
        assert_eq!(config.profile, restored.profile);
    }
}
