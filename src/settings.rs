//! Typed renderer settings and the per-run visualization configuration.
//!
//! Every configurable value a renderer exposes is a tagged `SettingValue`, so
//! a color can never be read back as a number or a string. Writes go through
//! `PixelRenderer::set_setting`, which rejects kind mismatches and invalid
//! values instead of coercing them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::render::{PixelRenderer, RendererKind};

// =============================================================================
// Setting Values
// =============================================================================

/// The kind of value a setting holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingKind {
    Color,
    Numeric,
    Text,
}

/// A tagged setting value. Cross-kind access is unrepresentable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    Color(Color),
    Numeric(f64),
    Text(String),
}

impl SettingValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Color(_) => SettingKind::Color,
            Self::Numeric(_) => SettingKind::Numeric,
            Self::Text(_) => SettingKind::Text,
        }
    }
}

/// One entry of a renderer's settings schema: a snapshot of a named, typed
/// configuration value, plus the metadata a configuration UI needs to render
/// a control for it. Edits are pushed back via `PixelRenderer::set_setting`.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererSetting {
    /// Human-readable setting name, unique within one renderer.
    pub name: &'static str,
    /// Current value.
    pub value: SettingValue,
    /// Allowed values for text settings backed by a fixed option list.
    pub options: &'static [&'static str],
    /// Optional tooltip text.
    pub tooltip: Option<&'static str>,
}

impl RendererSetting {
    pub(crate) fn new(name: &'static str, value: SettingValue) -> Self {
        Self {
            name,
            value,
            options: &[],
            tooltip: None,
        }
    }

    pub(crate) fn with_tooltip(mut self, tooltip: &'static str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub(crate) fn with_options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    /// The kind of the current value.
    pub fn kind(&self) -> SettingKind {
        self.value.kind()
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Rejected setting edits.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SettingError {
    /// No setting with this name on the target renderer.
    #[error("unknown setting `{0}`")]
    UnknownSetting(String),

    /// The value's kind does not match the setting's declared kind.
    #[error("setting `{name}` expects a {expected:?} value, got {got:?}")]
    KindMismatch {
        name: &'static str,
        expected: SettingKind,
        got: SettingKind,
    },

    /// A byte-order string outside the renderer's allowed permutations.
    #[error("unsupported byte order `{0}`")]
    InvalidByteOrder(String),

    /// Heatmap thresholds must be strictly ordered inside (0, 255); anything
    /// else would divide by zero in the gradient math.
    #[error("heatmap thresholds must satisfy 0 < t1 < t2 < t3 < 255, got {t1}, {t2}, {t3}")]
    ThresholdOrder { t1: f64, t2: f64, t3: f64 },

    /// A deserialized preset whose renderer list is missing a renderer kind
    /// or carries duplicates.
    #[error("renderer list must contain exactly one {0:?} renderer")]
    InvalidRendererList(RendererKind),
}

// =============================================================================
// Visualization Settings
// =============================================================================

/// Configuration for one rasterization run: output geometry, source stride,
/// and the set of available renderers with one of them active.
///
/// The renderer list always holds exactly one instance per kind; deserialized
/// presets are validated against that invariant.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "VisualizationSettingsRaw")]
pub struct VisualizationSettings {
    /// Output bitmap width in pixels.
    pub width: u32,
    /// Starting byte offset into the source buffer.
    pub offset: usize,
    /// Source bytes advanced per output pixel, independent of the active
    /// renderer's `skip_bytes`. A step below `skip_bytes` causes overlapping
    /// reads, which is intentional flexibility.
    pub step: usize,
    /// Display magnification hint for a viewer; not used during rasterization.
    pub zoom: u32,
    renderers: Vec<PixelRenderer>,
    active: RendererKind,
}

/// Unvalidated wire form of `VisualizationSettings`.
#[derive(Deserialize)]
struct VisualizationSettingsRaw {
    width: u32,
    offset: usize,
    step: usize,
    zoom: u32,
    renderers: Vec<PixelRenderer>,
    active: RendererKind,
}

impl TryFrom<VisualizationSettingsRaw> for VisualizationSettings {
    type Error = SettingError;

    fn try_from(raw: VisualizationSettingsRaw) -> Result<Self, SettingError> {
        for &kind in RendererKind::all() {
            if raw.renderers.iter().filter(|r| r.kind() == kind).count() != 1 {
                return Err(SettingError::InvalidRendererList(kind));
            }
        }
        Ok(Self {
            width: raw.width,
            offset: raw.offset,
            step: raw.step,
            zoom: raw.zoom,
            renderers: raw.renderers,
            active: raw.active,
        })
    }
}

impl Default for VisualizationSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualizationSettings {
    /// Settings with every renderer at its defaults and the heatmap active.
    pub fn new() -> Self {
        Self {
            width: 128,
            offset: 0,
            step: 1,
            zoom: 4,
            renderers: PixelRenderer::all(),
            active: RendererKind::Heatmap,
        }
    }

    /// All available renderers, in presentation order.
    pub fn renderers(&self) -> &[PixelRenderer] {
        &self.renderers
    }

    /// The currently active renderer.
    pub fn active_renderer(&self) -> &PixelRenderer {
        // `renderers` always holds one instance per kind
        self.renderers
            .iter()
            .find(|r| r.kind() == self.active)
            .unwrap_or_else(|| &self.renderers[0])
    }

    /// Mutable access to the active renderer, for pushing setting edits.
    pub fn active_renderer_mut(&mut self) -> &mut PixelRenderer {
        let active = self.active;
        let idx = self
            .renderers
            .iter()
            .position(|r| r.kind() == active)
            .unwrap_or(0);
        &mut self.renderers[idx]
    }

    /// Which renderer is active.
    pub fn active_kind(&self) -> RendererKind {
        self.active
    }

    /// Switch the active renderer. Each renderer keeps its own settings, so
    /// switching back restores the previous configuration.
    pub fn set_active(&mut self, kind: RendererKind) {
        self.active = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_active_is_heatmap() {
        let settings = VisualizationSettings::default();
        assert_eq!(settings.active_kind(), RendererKind::Heatmap);
        assert_eq!(settings.active_renderer().kind(), RendererKind::Heatmap);
    }

    #[test]
    fn test_defaults() {
        let settings = VisualizationSettings::default();
        assert_eq!(settings.width, 128);
        assert_eq!(settings.offset, 0);
        assert_eq!(settings.step, 1);
        assert_eq!(settings.renderers().len(), 6);
    }

    #[test]
    fn test_switching_preserves_settings() {
        let mut settings = VisualizationSettings::default();
        settings.set_active(RendererKind::Extremes);
        settings
            .active_renderer_mut()
            .set_setting("Low threshold", SettingValue::Numeric(42.0))
            .unwrap();

        settings.set_active(RendererKind::Grayscale);
        settings.set_active(RendererKind::Extremes);

        let schema = settings.active_renderer().settings();
        let low = schema.iter().find(|s| s.name == "Low threshold").unwrap();
        assert_eq!(low.value, SettingValue::Numeric(42.0));
    }

    #[test]
    fn test_setting_value_kind() {
        assert_eq!(
            SettingValue::Color(Color::rgb(0.0, 0.0, 0.0)).kind(),
            SettingKind::Color
        );
        assert_eq!(SettingValue::Numeric(1.0).kind(), SettingKind::Numeric);
        assert_eq!(SettingValue::Text("RGB".into()).kind(), SettingKind::Text);
    }

    #[test]
    fn test_deserialize_rejects_empty_renderer_list() {
        // An empty list would leave no renderer to dispatch to
        let mut v = serde_json::to_value(VisualizationSettings::default()).unwrap();
        v["renderers"] = serde_json::json!([]);
        let res = serde_json::from_value::<VisualizationSettings>(v);
        assert!(matches!(
            res.map_err(|e| e.to_string()),
            Err(msg) if msg.contains("renderer list")
        ));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_renderers() {
        let mut v = serde_json::to_value(VisualizationSettings::default()).unwrap();
        v["renderers"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!({ "Grayscale": null }));
        assert!(serde_json::from_value::<VisualizationSettings>(v).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut settings = VisualizationSettings::default();
        settings.width = 256;
        settings.set_active(RendererKind::Rgb);

        let json = serde_json::to_string(&settings).unwrap();
        let back: VisualizationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width, 256);
        assert_eq!(back.active_kind(), RendererKind::Rgb);
        assert_eq!(back.renderers().len(), 6);
    }
}
