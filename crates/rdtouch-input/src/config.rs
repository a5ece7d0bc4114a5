#![forbid(unsafe_code)]

//! Tunable thresholds for gesture interpretation.
//!
//! Every distance is expressed in density-independent pixels (dp) and
//! converted to screen pixels through [`TouchConfig::density`], so the same
//! config behaves alike on screens of different pixel density.
//!
//! # Loading
//!
//! With the `config` feature enabled:
//!
//! ```toml
//! # rdtouch.toml
//! density = 2.625
//! swipe_threshold_dp = 40.0
//! long_press_timeout_ms = 450
//! ```
//!
//! ```rust,ignore
//! let config = TouchConfig::from_toml_file("rdtouch.toml")?;
//! let config = TouchConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `TouchConfig::default()` mirrors the stock platform gesture constants.
//! The two vertical-motion thresholds (multi-finger swipe and the scroll
//! touch slop) are independent knobs; neither is derived from the other.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use rdtouch_core::canvas::DEFAULT_MAX_ZOOM_FACTOR;
use rdtouch_core::fling::DEFAULT_DECELERATION;

/// Slowest accepted fling deceleration, dp/s².
pub const MIN_FLING_DECELERATION_DP: f64 = 1.0;

/// Thresholds and timeouts for touch gesture interpretation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TouchConfig {
    /// Screen pixels per dp (default: 1.0).
    pub density: f64,
    /// Vertical travel before a 3+-finger swipe fires (default: 40dp).
    pub swipe_threshold_dp: f64,
    /// Movement before a touch stops being a tap (default: 8dp).
    pub touch_slop_dp: f64,
    /// Width of the screen border treated as a system edge swipe (default: 12dp).
    pub edge_slop_dp: f64,
    /// Maximum distance between taps of a double tap (default: 100dp).
    pub double_tap_slop_dp: f64,
    /// Pointer span below which a pinch neither starts nor continues
    /// (default: 32dp).
    pub min_span_dp: f64,
    /// Minimum release speed for a fling (default: 50dp/s).
    pub min_fling_velocity_dp: f64,
    /// Release speeds are clamped to this (default: 8000dp/s).
    pub max_fling_velocity_dp: f64,
    /// Fling deceleration in dp/s², at least 1 (default: 2000).
    pub fling_deceleration_dp: f64,
    /// Hold time before a long press fires (default: 500ms).
    pub long_press_timeout_ms: u64,
    /// Maximum interval between taps of a double tap (default: 300ms).
    pub double_tap_timeout_ms: u64,
    /// Upper bound on screen pixels per image pixel (default: 100).
    pub max_zoom_factor: f64,
    /// Tolerance for taps on the image edge, in image pixels (default: 0.001).
    pub image_edge_epsilon: f64,
    /// Raw events buffered by the native-touch strategy before it gives up
    /// on replaying a sequence (default: 256).
    pub max_queued_touch_events: usize,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            swipe_threshold_dp: 40.0,
            touch_slop_dp: 8.0,
            edge_slop_dp: 12.0,
            double_tap_slop_dp: 100.0,
            min_span_dp: 32.0,
            min_fling_velocity_dp: 50.0,
            max_fling_velocity_dp: 8000.0,
            fling_deceleration_dp: DEFAULT_DECELERATION,
            long_press_timeout_ms: 500,
            double_tap_timeout_ms: 300,
            max_zoom_factor: DEFAULT_MAX_ZOOM_FACTOR,
            image_edge_epsilon: 0.001,
            max_queued_touch_events: 256,
        }
    }
}

impl TouchConfig {
    /// Default thresholds at the given display density.
    #[must_use]
    pub fn with_density(density: f64) -> Self {
        Self {
            density,
            ..Self::default()
        }
    }

    #[inline]
    fn px(&self, dp: f64) -> f64 {
        dp * self.density
    }

    /// Swipe threshold in screen pixels.
    #[inline]
    #[must_use]
    pub fn swipe_threshold(&self) -> f64 {
        self.px(self.swipe_threshold_dp)
    }

    /// Touch slop in screen pixels.
    #[inline]
    #[must_use]
    pub fn touch_slop(&self) -> f64 {
        self.px(self.touch_slop_dp)
    }

    /// Edge slop in whole screen pixels.
    #[inline]
    #[must_use]
    pub fn edge_slop(&self) -> i32 {
        self.px(self.edge_slop_dp).round() as i32
    }

    /// Double-tap slop in screen pixels.
    #[inline]
    #[must_use]
    pub fn double_tap_slop(&self) -> f64 {
        self.px(self.double_tap_slop_dp)
    }

    /// Minimum pinch span in screen pixels.
    #[inline]
    #[must_use]
    pub fn min_span(&self) -> f64 {
        self.px(self.min_span_dp)
    }

    /// Minimum fling speed in px/s.
    #[inline]
    #[must_use]
    pub fn min_fling_velocity(&self) -> f64 {
        self.px(self.min_fling_velocity_dp)
    }

    /// Maximum fling speed in px/s.
    #[inline]
    #[must_use]
    pub fn max_fling_velocity(&self) -> f64 {
        self.px(self.max_fling_velocity_dp)
    }

    /// Fling deceleration in px/s².
    #[inline]
    #[must_use]
    pub fn fling_deceleration(&self) -> f64 {
        self.px(self.fling_deceleration_dp)
    }

    #[inline]
    #[must_use]
    pub fn long_press_timeout(&self) -> Duration {
        Duration::from_millis(self.long_press_timeout_ms)
    }

    #[inline]
    #[must_use]
    pub fn double_tap_timeout(&self) -> Duration {
        Duration::from_millis(self.double_tap_timeout_ms)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let positive = [
            ("density", self.density),
            ("swipe_threshold_dp", self.swipe_threshold_dp),
            ("touch_slop_dp", self.touch_slop_dp),
            ("double_tap_slop_dp", self.double_tap_slop_dp),
            ("max_fling_velocity_dp", self.max_fling_velocity_dp),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                errors.push(format!("{name} must be > 0, got {value}"));
            }
        }

        if !(self.fling_deceleration_dp.is_finite()
            && self.fling_deceleration_dp >= MIN_FLING_DECELERATION_DP)
        {
            errors.push(format!(
                "fling_deceleration_dp must be >= {MIN_FLING_DECELERATION_DP}, got {}",
                self.fling_deceleration_dp
            ));
        }
        if !(self.min_span_dp.is_finite() && self.min_span_dp >= 0.0) {
            errors.push(format!("min_span_dp must be >= 0, got {}", self.min_span_dp));
        }
        if !(self.edge_slop_dp.is_finite() && self.edge_slop_dp >= 0.0) {
            errors.push(format!("edge_slop_dp must be >= 0, got {}", self.edge_slop_dp));
        }
        if !(self.min_fling_velocity_dp.is_finite() && self.min_fling_velocity_dp >= 0.0) {
            errors.push(format!(
                "min_fling_velocity_dp must be >= 0, got {}",
                self.min_fling_velocity_dp
            ));
        }
        if self.min_fling_velocity_dp > self.max_fling_velocity_dp {
            errors.push(format!(
                "min_fling_velocity_dp ({}) exceeds max_fling_velocity_dp ({})",
                self.min_fling_velocity_dp, self.max_fling_velocity_dp
            ));
        }
        if !(self.max_zoom_factor.is_finite() && self.max_zoom_factor >= 1.0) {
            errors.push(format!(
                "max_zoom_factor must be >= 1, got {}",
                self.max_zoom_factor
            ));
        }
        if !(self.image_edge_epsilon.is_finite() && self.image_edge_epsilon >= 0.0) {
            errors.push(format!(
                "image_edge_epsilon must be >= 0, got {}",
                self.image_edge_epsilon
            ));
        }
        if self.long_press_timeout_ms == 0 {
            errors.push("long_press_timeout_ms must be > 0".into());
        }
        if self.max_queued_touch_events == 0 {
            errors.push("max_queued_touch_events must be > 0".into());
        }

        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check the config, turning validation failures into an error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Error loading or validating a [`TouchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
