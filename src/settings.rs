//! Field settings and preferences
//!
//! Persisted as JSON in LocalStorage. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Halo rings under the Low preset
const LOW_HALO_STEPS: u32 = 8;
/// Upper bounds accepted from stored settings
const MAX_BLOCK_COUNT: usize = 256;
const MAX_PLACEMENT_BUDGET: u32 = 100_000;
const MAX_DRAW_STEPS: u32 = 256;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Preset named by a `quality=` pair in a URL query string (`?quality=low`)
    pub fn from_query(search: &str) -> Option<Self> {
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "quality")
            .and_then(|(_, value)| Self::from_str(value))
    }

    /// Triangles per tessellated circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 24,
            QualityPreset::Medium => 48,
            QualityPreset::High => 96,
        }
    }
}

/// Tunable field parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Circle tessellation quality
    pub quality: QualityPreset,

    // === Layout ===
    /// Blocks to place per layout
    pub block_count: usize,
    /// Block diameter in pixels
    pub block_size: f32,
    /// Rejection sampling budget
    pub placement_attempts: u32,
    /// Minimum centre spacing as a multiple of `attraction_radius`
    pub min_spacing_factor: f32,

    // === Force model ===
    /// Reach of each block's pull
    pub attraction_radius: f32,
    /// Strength at the centre, before the 4th power
    pub max_strength: f32,

    // === Visuals ===
    /// Draw the fading attraction halo around blocks
    pub show_halo: bool,
    /// Halo rings per block
    pub halo_steps: u32,
    /// Force line segments
    pub line_steps: u32,
    /// Force line length multiplier
    pub force_line_scale: f32,
    /// Ideal position dot diameter
    pub indicator_diameter: f32,

    // === HUD ===
    /// Show the force/error readout
    pub show_readout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            block_count: NUM_BLOCKS,
            block_size: BLOCK_SIZE,
            placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            min_spacing_factor: MIN_SPACING_FACTOR,

            attraction_radius: ATTRACTION_RADIUS,
            max_strength: MAX_STRENGTH,

            show_halo: true,
            halo_steps: HALO_STEPS,
            line_steps: LINE_STEPS,
            force_line_scale: FORCE_LINE_SCALE,
            indicator_diameter: INDICATOR_DIAMETER,

            show_readout: true,
        }
    }
}

impl Settings {
    /// Apply a quality preset (resets quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset thins the halo, the most overdraw-heavy element
        self.halo_steps = match preset {
            QualityPreset::Low => LOW_HALO_STEPS,
            QualityPreset::Medium | QualityPreset::High => HALO_STEPS,
        };
    }

    /// Effective halo ring count (0 when the halo is off)
    pub fn effective_halo_steps(&self) -> u32 {
        if self.show_halo { self.halo_steps } else { 0 }
    }

    /// Replace values that would break layout or drawing with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.block_size) {
            self.block_size = defaults.block_size;
        }
        if !positive(self.attraction_radius) {
            self.attraction_radius = defaults.attraction_radius;
        }
        if !positive(self.max_strength) {
            self.max_strength = defaults.max_strength;
        }
        if !self.min_spacing_factor.is_finite() || self.min_spacing_factor < 0.0 {
            self.min_spacing_factor = defaults.min_spacing_factor;
        }
        if !positive(self.force_line_scale) {
            self.force_line_scale = defaults.force_line_scale;
        }
        if !positive(self.indicator_diameter) {
            self.indicator_diameter = defaults.indicator_diameter;
        }
        if self.placement_attempts > MAX_PLACEMENT_BUDGET {
            self.placement_attempts = defaults.placement_attempts;
        }
        if self.block_count > MAX_BLOCK_COUNT {
            self.block_count = defaults.block_count;
        }
        // More blocks than draws can never be placed
        self.block_count = self.block_count.min(self.placement_attempts as usize);
        if self.halo_steps > MAX_DRAW_STEPS {
            self.halo_steps = defaults.halo_steps;
        }
        if self.line_steps == 0 || self.line_steps > MAX_DRAW_STEPS {
            self.line_steps = defaults.line_steps;
        }
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "attract_field_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Settings>(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Failed to save settings: {:?}", e),
                },
                Err(e) => log::warn!("Failed to serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_preset_from_query() {
        assert_eq!(QualityPreset::from_query("?quality=low"), Some(QualityPreset::Low));
        assert_eq!(
            QualityPreset::from_query("?debug=1&quality=HIGH"),
            Some(QualityPreset::High)
        );
        assert_eq!(QualityPreset::from_query("?quality=ultra"), None);
        assert_eq!(QualityPreset::from_query(""), None);
        assert_eq!(QualityPreset::from_query("?lowquality"), None);
    }

    #[test]
    fn test_apply_preset_sets_halo() {
        let mut s = Settings::default();
        s.apply_preset(QualityPreset::Low);
        assert_eq!(s.quality, QualityPreset::Low);
        assert_eq!(s.halo_steps, LOW_HALO_STEPS);
        assert_eq!(s.quality.circle_segments(), 24);

        s.apply_preset(QualityPreset::High);
        assert_eq!(s.halo_steps, HALO_STEPS);
        assert_eq!(s.quality.circle_segments(), 96);
    }

    #[test]
    fn test_effective_halo_steps() {
        let mut s = Settings::default();
        assert_eq!(s.effective_halo_steps(), HALO_STEPS);
        s.show_halo = false;
        assert_eq!(s.effective_halo_steps(), 0);
    }

    #[test]
    fn test_json_round_trip_and_partial() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        // Older saves missing fields still load
        let partial: Settings = serde_json::from_str(r#"{"block_count": 3}"#).unwrap();
        assert_eq!(partial.block_count, 3);
        assert_eq!(partial.attraction_radius, ATTRACTION_RADIUS);
    }

    #[test]
    fn test_sanitized_restores_bad_values() {
        let s = Settings {
            block_size: -5.0,
            attraction_radius: 0.0,
            max_strength: f32::NAN,
            min_spacing_factor: -1.0,
            line_steps: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.block_size, BLOCK_SIZE);
        assert_eq!(s.attraction_radius, ATTRACTION_RADIUS);
        assert_eq!(s.max_strength, MAX_STRENGTH);
        assert_eq!(s.min_spacing_factor, MIN_SPACING_FACTOR);
        assert_eq!(s.line_steps, LINE_STEPS);
    }

    #[test]
    fn test_sanitized_caps_counts_from_storage() {
        let json = r#"{"block_count": 18446744073709551615,
                       "halo_steps": 4294967295,
                       "line_steps": 4294967295,
                       "placement_attempts": 4294967295}"#;
        let s = serde_json::from_str::<Settings>(json).unwrap().sanitized();
        assert_eq!(s.block_count, NUM_BLOCKS);
        assert_eq!(s.halo_steps, HALO_STEPS);
        assert_eq!(s.line_steps, LINE_STEPS);
        assert_eq!(s.placement_attempts, MAX_PLACEMENT_ATTEMPTS);

        // The loaded settings still build a field
        let state = crate::sim::FieldState::new(1, 800.0, 600.0, &s);
        assert!(state.blocks.len() <= NUM_BLOCKS);
    }

    #[test]
    fn test_sanitized_block_count_within_attempts() {
        let s = Settings {
            block_count: 50,
            placement_attempts: 10,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.block_count, 10);
    }
}
