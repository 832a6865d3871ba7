//! Host configuration.
//!
//! [`GraphOptions`] mirrors the loosely typed options object a host passes in
//! (camelCase keys, every key optional, wrong types ignored). [`GraphConfig`]
//! is the resolved form the engine works with: defaults applied and values
//! clamped so the focused node always stays visually dominant.

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::lenient;

/// Color scheme. Only affects the default node fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse a theme name case-insensitively. Unknown names map to light.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Fill used for nodes that carry no color of their own.
    pub fn node_color(self) -> &'static str {
        match self {
            Theme::Light => "#111827",
            Theme::Dark => "#e6edf3",
        }
    }
}

/// Raw options as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphOptions {
    #[serde(default, deserialize_with = "lenient::finite")]
    pub size_range_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::finite")]
    pub size_range_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::finite")]
    pub active_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::finite")]
    pub animate_duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient::finite")]
    pub redirect_delay_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient::finite")]
    pub jitter: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub persist_positions: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub redirect_enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub open_in_new_tab: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub seed: Option<u64>,
}

impl GraphOptions {
    /// Parse an options object from JSON text. Empty text means no options.
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }
}

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    /// Smallest normalized resting size.
    pub size_range_min: f32,
    /// Largest normalized resting size.
    pub size_range_max: f32,
    /// Size of the focused node.
    pub active_size: f32,
    /// Cap applied to every other node while one is focused.
    pub others_max_size: f32,
    pub animate_duration_ms: f64,
    pub redirect_delay_ms: f64,
    /// Maximum displacement radius for non-focused nodes.
    pub jitter: f32,
    pub persist_positions: bool,
    pub redirect_enabled: bool,
    pub open_in_new_tab: bool,
    pub theme: Theme,
    pub seed: Option<u64>,
}

impl GraphConfig {
    pub const DEFAULT_SIZE_RANGE_MIN: f32 = 14.0;
    pub const DEFAULT_SIZE_RANGE_MAX: f32 = 20.0;
    pub const DEFAULT_ACTIVE_SIZE: f32 = 26.0;
    pub const DEFAULT_ANIMATE_DURATION_MS: f64 = 2000.0;
    pub const DEFAULT_REDIRECT_DELAY_MS: f64 = 2100.0;
    pub const DEFAULT_JITTER: f32 = 40.0;

    /// How far below the active size other nodes are capped.
    const ACTIVE_MARGIN: f32 = 6.0;

    /// Grid cells are this many max-radii wide.
    const CELL_RADII: f32 = 6.0;

    /// Resolve raw options, applying defaults and clamps.
    pub fn resolve(options: &GraphOptions) -> Self {
        let mut range_min = options
            .size_range_min
            .map_or(Self::DEFAULT_SIZE_RANGE_MIN, |v| v as f32)
            .max(1.0);
        let mut range_max = options
            .size_range_max
            .map_or(Self::DEFAULT_SIZE_RANGE_MAX, |v| v as f32)
            .max(1.0);
        if range_min > range_max {
            std::mem::swap(&mut range_min, &mut range_max);
        }

        let mut active_size = options
            .active_size
            .map_or(Self::DEFAULT_ACTIVE_SIZE, |v| v as f32);
        let others_max_size = range_max.min(active_size - Self::ACTIVE_MARGIN).max(range_min);
        if active_size <= others_max_size {
            active_size = others_max_size + 1.0;
        }

        Self {
            size_range_min: range_min,
            size_range_max: range_max,
            active_size,
            others_max_size,
            animate_duration_ms: options
                .animate_duration_ms
                .unwrap_or(Self::DEFAULT_ANIMATE_DURATION_MS)
                .max(0.0),
            redirect_delay_ms: options
                .redirect_delay_ms
                .unwrap_or(Self::DEFAULT_REDIRECT_DELAY_MS)
                .max(0.0),
            jitter: options
                .jitter
                .map_or(Self::DEFAULT_JITTER, |v| v as f32)
                .max(0.0),
            persist_positions: options.persist_positions.unwrap_or(false),
            redirect_enabled: options.redirect_enabled.unwrap_or(true),
            open_in_new_tab: options.open_in_new_tab.unwrap_or(false),
            theme: options
                .theme
                .as_deref()
                .map(Theme::from_name)
                .unwrap_or_default(),
            seed: options.seed,
        }
    }

    /// Minimum center-to-center distance targeted after a focus cycle.
    pub fn min_separation(&self) -> f32 {
        2.0 * self.active_size.max(self.size_range_max)
    }

    /// Radius of the largest node that can appear (resting or focused).
    pub fn max_node_radius(&self) -> f32 {
        self.size_range_max.max(self.active_size) / 2.0
    }

    /// Edge length of a placement grid cell.
    pub fn cell_size(&self) -> f32 {
        self.max_node_radius() * Self::CELL_RADII
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::resolve(&GraphOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.size_range_min, 14.0);
        assert_eq!(config.size_range_max, 20.0);
        assert_eq!(config.active_size, 26.0);
        assert_eq!(config.others_max_size, 20.0);
        assert_eq!(config.animate_duration_ms, 2000.0);
        assert_eq!(config.redirect_delay_ms, 2100.0);
        assert_eq!(config.jitter, 40.0);
        assert!(!config.persist_positions);
        assert!(config.redirect_enabled);
        assert!(!config.open_in_new_tab);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.min_separation(), 52.0);
        assert_eq!(config.cell_size(), 78.0);
    }

    #[test]
    fn test_options_from_json_ignore_unknown_and_mistyped() {
        let options = GraphOptions::from_json(
            r##"{"sizeRangeMin":10,"activeSize":"huge","jitter":12,"openInNewTab":true,
                "theme":"DARK","accent":"#3b82f6","legend":false}"##,
        )
        .unwrap();
        let config = GraphConfig::resolve(&options);

        assert_eq!(config.size_range_min, 10.0);
        assert_eq!(config.active_size, 26.0);
        assert_eq!(config.jitter, 12.0);
        assert!(config.open_in_new_tab);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn test_empty_options_text() {
        assert_eq!(GraphOptions::from_json("  ").unwrap(), GraphOptions::default());
    }

    #[test]
    fn test_others_max_stays_below_active() {
        let config = GraphConfig::resolve(&GraphOptions {
            size_range_min: Some(14.0),
            size_range_max: Some(30.0),
            active_size: Some(10.0),
            ..Default::default()
        });
        assert_eq!(config.others_max_size, 14.0);
        assert!(config.others_max_size < config.active_size);
    }

    #[test]
    fn test_large_active_keeps_range_max_cap() {
        let config = GraphConfig::resolve(&GraphOptions {
            active_size: Some(40.0),
            ..Default::default()
        });
        assert_eq!(config.others_max_size, 20.0);
        assert_eq!(config.cell_size(), 120.0);
        assert_eq!(config.min_separation(), 80.0);
    }

    #[test]
    fn test_inverted_range_is_swapped() {
        let config = GraphConfig::resolve(&GraphOptions {
            size_range_min: Some(20.0),
            size_range_max: Some(10.0),
            ..Default::default()
        });
        assert_eq!(config.size_range_min, 10.0);
        assert_eq!(config.size_range_max, 20.0);
    }

    #[test]
    fn test_negative_timing_is_clamped() {
        let config = GraphConfig::resolve(&GraphOptions {
            animate_duration_ms: Some(-5.0),
            jitter: Some(-1.0),
            ..Default::default()
        });
        assert_eq!(config.animate_duration_ms, 0.0);
        assert_eq!(config.jitter, 0.0);
    }
}
