// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracker configuration.

use alloc::string::{String, ToString as _};

/// Marker class used when none is configured.
pub const DEFAULT_MARKER_CLASS: &str = "css-parallax";

/// Custom-property prefix used when none is configured.
pub const DEFAULT_CSS_PREFIX: &str = "parallax-";

/// Decimal digits written per metric value when none is configured.
pub const DEFAULT_DECIMAL_ACCURACY: usize = 3;

/// Configuration for a [`Tracker`](crate::tracker::Tracker).
///
/// Construct with [`Default`] and override individual fields with struct
/// update syntax:
///
/// ```
/// use strata_core::config::TrackerConfig;
///
/// let config = TrackerConfig {
///     css_prefix: "fx-".into(),
///     ..TrackerConfig::default()
/// };
/// assert_eq!(config.marker_class, "css-parallax");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    /// The CSS class that opts an element into tracking.
    ///
    /// Core never inspects class lists itself; backends use this to classify
    /// nodes when driving the tracker's membership methods.
    pub marker_class: String,
    /// Prefix for written custom property names. An entry named `scroll-y`
    /// with the default prefix is written as `--parallax-scroll-y`.
    pub css_prefix: String,
    /// Number of decimal digits in written values.
    pub decimal_accuracy: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            css_prefix: DEFAULT_CSS_PREFIX.to_string(),
            decimal_accuracy: DEFAULT_DECIMAL_ACCURACY,
        }
    }
}
