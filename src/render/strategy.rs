//! Pixel renderer strategies: byte → color mapping functions.
//!
//! Each strategy consumes a fixed number of consecutive input bytes
//! (`skip_bytes`) and produces one color. Strategies own their configurable
//! settings; edits go through `set_setting`, which validates kind and value
//! instead of coercing.
//!
//! Optimizations:
//! - 256-entry lookup table for byte classification (computed at compile time)
//! - Match dispatch over an enum instead of virtual calls

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::settings::{RendererSetting, SettingError, SettingValue};

// =============================================================================
// Renderer Kind
// =============================================================================

/// Identifies one renderer strategy. Used to select the active renderer by
/// name rather than by position in a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendererKind {
    Rgb,
    Rgba,
    Grayscale,
    ByteClass,
    Extremes,
    Heatmap,
}

impl RendererKind {
    /// All kinds, in presentation order.
    pub fn all() -> &'static [Self] {
        &[
            Self::Rgb,
            Self::Rgba,
            Self::Grayscale,
            Self::ByteClass,
            Self::Extremes,
            Self::Heatmap,
        ]
    }
}

// =============================================================================
// Byte Orders
// =============================================================================

/// Channel assignment for the 3-byte RGB renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RgbOrder {
    #[default]
    Rgb,
    Bgr,
    Grb,
    Brg,
    Rbg,
    Gbr,
}

impl RgbOrder {
    /// All orders, in presentation order.
    pub const OPTIONS: &'static [&'static str] = &["RGB", "BGR", "GRB", "BRG", "RBG", "GBR"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Bgr => "BGR",
            Self::Grb => "GRB",
            Self::Brg => "BRG",
            Self::Rbg => "RBG",
            Self::Gbr => "GBR",
        }
    }

    fn parse(s: &str) -> Result<Self, SettingError> {
        match s {
            "RGB" => Ok(Self::Rgb),
            "BGR" => Ok(Self::Bgr),
            "GRB" => Ok(Self::Grb),
            "BRG" => Ok(Self::Brg),
            "RBG" => Ok(Self::Rbg),
            "GBR" => Ok(Self::Gbr),
            other => Err(SettingError::InvalidByteOrder(other.to_string())),
        }
    }
}

/// Channel assignment for the 4-byte RGBA renderer. ARGB is the default and
/// the fallback for any unlisted order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RgbaOrder {
    #[default]
    Argb,
    Bgra,
    Rgba,
    Abgr,
}

impl RgbaOrder {
    pub const OPTIONS: &'static [&'static str] = &["ARGB", "BGRA", "RGBA", "ABGR"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Argb => "ARGB",
            Self::Bgra => "BGRA",
            Self::Rgba => "RGBA",
            Self::Abgr => "ABGR",
        }
    }

    fn parse(s: &str) -> Result<Self, SettingError> {
        match s {
            "ARGB" => Ok(Self::Argb),
            "BGRA" => Ok(Self::Bgra),
            "RGBA" => Ok(Self::Rgba),
            "ABGR" => Ok(Self::Abgr),
            other => Err(SettingError::InvalidByteOrder(other.to_string())),
        }
    }
}

// =============================================================================
// Byte Classification
// =============================================================================

/// The five classification buckets of the byte classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteBucket {
    /// Bytes below 0x20, plus 0x7F (DEL).
    Control,
    /// Printable punctuation: anything printable that is neither a digit nor
    /// a letter.
    Printable,
    /// ASCII digits 0x30–0x39.
    Digit,
    /// Latin letters A–Z and a–z, no accents.
    Letter,
    /// Any byte at or above 0x80.
    High,
}

const fn classify_byte(b: u8) -> ByteBucket {
    match b {
        0x00..=0x1F | 0x7F => ByteBucket::Control,
        0x30..=0x39 => ByteBucket::Digit,
        0x41..=0x5A | 0x61..=0x7A => ByteBucket::Letter,
        0x80..=0xFF => ByteBucket::High,
        _ => ByteBucket::Printable,
    }
}

/// Precomputed classification lookup table.
const fn generate_bucket_lut() -> [ByteBucket; 256] {
    let mut lut = [ByteBucket::Printable; 256];
    let mut i = 0usize;
    while i < 256 {
        lut[i] = classify_byte(i as u8);
        i += 1;
    }
    lut
}

/// Static byte classification lookup table (computed at compile time).
static BYTE_BUCKET_LUT: [ByteBucket; 256] = generate_bucket_lut();

/// Classify a byte into its bucket.
#[inline]
pub fn byte_bucket(b: u8) -> ByteBucket {
    BYTE_BUCKET_LUT[b as usize]
}

// =============================================================================
// Strategy Variants
// =============================================================================

/// Maps 3 bytes onto the R, G and B channels in a configurable order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RgbRenderer {
    pub order: RgbOrder,
}

impl RgbRenderer {
    #[inline]
    fn render(&self, data: &[u8], idx: usize) -> Color {
        let b0 = f32::from(data[idx]);
        let b1 = f32::from(data[idx + 1]);
        let b2 = f32::from(data[idx + 2]);
        match self.order {
            RgbOrder::Rgb => Color::rgb(b0, b1, b2),
            RgbOrder::Bgr => Color::rgb(b2, b1, b0),
            RgbOrder::Grb => Color::rgb(b1, b0, b2),
            RgbOrder::Brg => Color::rgb(b2, b0, b1),
            RgbOrder::Rbg => Color::rgb(b0, b2, b1),
            RgbOrder::Gbr => Color::rgb(b1, b2, b0),
        }
    }

    fn settings(&self) -> Vec<RendererSetting> {
        vec![RendererSetting::new(
            "Byte order",
            SettingValue::Text(self.order.as_str().to_string()),
        )
        .with_options(RgbOrder::OPTIONS)
        .with_tooltip("Sets which bytes are used for which color channel")]
    }

    fn set(&mut self, name: &str, value: SettingValue) -> Result<(), SettingError> {
        match name {
            "Byte order" => {
                self.order = RgbOrder::parse(expect_text("Byte order", &value)?)?;
                Ok(())
            }
            _ => Err(SettingError::UnknownSetting(name.to_string())),
        }
    }
}

/// Maps 4 bytes onto the R, G, B and A channels in a configurable order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RgbaRenderer {
    pub order: RgbaOrder,
}

impl RgbaRenderer {
    #[inline]
    fn render(&self, data: &[u8], idx: usize) -> Color {
        let b0 = f32::from(data[idx]);
        let b1 = f32::from(data[idx + 1]);
        let b2 = f32::from(data[idx + 2]);
        let b3 = f32::from(data[idx + 3]);
        match self.order {
            RgbaOrder::Argb => Color::rgba(b1, b2, b3, b0),
            RgbaOrder::Bgra => Color::rgba(b2, b1, b0, b3),
            RgbaOrder::Rgba => Color::rgba(b0, b1, b2, b3),
            RgbaOrder::Abgr => Color::rgba(b3, b2, b1, b0),
        }
    }

    fn settings(&self) -> Vec<RendererSetting> {
        vec![RendererSetting::new(
            "Byte order",
            SettingValue::Text(self.order.as_str().to_string()),
        )
        .with_options(RgbaOrder::OPTIONS)
        .with_tooltip("Sets which bytes are used for which color channel")]
    }

    fn set(&mut self, name: &str, value: SettingValue) -> Result<(), SettingError> {
        match name {
            "Byte order" => {
                self.order = RgbaOrder::parse(expect_text("Byte order", &value)?)?;
                Ok(())
            }
            _ => Err(SettingError::UnknownSetting(name.to_string())),
        }
    }
}

/// Copies a single byte into all three channels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrayscaleRenderer;

impl GrayscaleRenderer {
    #[inline]
    fn render(data: &[u8], idx: usize) -> Color {
        let b = f32::from(data[idx]);
        Color::rgb(b, b, b)
    }
}

/// Classifies each byte into one of five buckets, each with its own color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ByteClassRenderer {
    pub control: Color,
    pub printable: Color,
    pub digit: Color,
    pub letter: Color,
    pub high: Color,
}

impl Default for ByteClassRenderer {
    fn default() -> Self {
        Self {
            control: Color::rgb(128.0, 0.0, 0.0),
            printable: Color::rgb(223.0, 0.0, 0.0),
            digit: Color::rgb(0.0, 32.0, 128.0),
            letter: Color::rgb(64.0, 112.0, 255.0),
            high: Color::rgb(96.0, 191.0, 0.0),
        }
    }
}

impl ByteClassRenderer {
    #[inline]
    fn render(&self, data: &[u8], idx: usize) -> Color {
        match byte_bucket(data[idx]) {
            ByteBucket::Control => self.control,
            ByteBucket::Printable => self.printable,
            ByteBucket::Digit => self.digit,
            ByteBucket::Letter => self.letter,
            ByteBucket::High => self.high,
        }
    }

    fn settings(&self) -> Vec<RendererSetting> {
        vec![
            RendererSetting::new("Control bytes color", SettingValue::Color(self.control))
                .with_tooltip("Control bytes are bytes lower than 0x20 and 0x7F"),
            RendererSetting::new("Printables color", SettingValue::Color(self.printable))
                .with_tooltip("Anything that is not a letter, number, or control character"),
            RendererSetting::new("Numbers color", SettingValue::Color(self.digit))
                .with_tooltip("Number characters 0-9"),
            RendererSetting::new("Latin alphabet color", SettingValue::Color(self.letter))
                .with_tooltip("Latin alphabet a-z. No accents."),
            RendererSetting::new("Extended ASCII color", SettingValue::Color(self.high))
                .with_tooltip("Any byte above (and including) 0x80"),
        ]
    }

    fn set(&mut self, name: &str, value: SettingValue) -> Result<(), SettingError> {
        match name {
            "Control bytes color" => self.control = expect_color("Control bytes color", &value)?,
            "Printables color" => self.printable = expect_color("Printables color", &value)?,
            "Numbers color" => self.digit = expect_color("Numbers color", &value)?,
            "Latin alphabet color" => self.letter = expect_color("Latin alphabet color", &value)?,
            "Extended ASCII color" => self.high = expect_color("Extended ASCII color", &value)?,
            _ => return Err(SettingError::UnknownSetting(name.to_string())),
        }
        Ok(())
    }
}

/// Highlights extreme byte values: exact 0x00 and 0xFF get dedicated colors,
/// values beyond the low/high thresholds get their own, everything else the
/// default color. Evaluated in that order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtremesRenderer {
    pub zero: Color,
    pub max: Color,
    pub low: Color,
    pub high: Color,
    pub fallback: Color,
    pub low_threshold: f64,
    pub high_threshold: f64,
}

impl Default for ExtremesRenderer {
    fn default() -> Self {
        Self {
            zero: Color::rgb(255.0, 0.0, 0.0),
            max: Color::rgb(0.0, 255.0, 0.0),
            low: Color::rgb(64.0, 0.0, 0.0),
            high: Color::rgb(0.0, 64.0, 0.0),
            fallback: Color::rgb(0.0, 0.0, 0.0),
            low_threshold: 16.0,
            high_threshold: 240.0,
        }
    }
}

impl ExtremesRenderer {
    #[inline]
    fn render(&self, data: &[u8], idx: usize) -> Color {
        let b = data[idx];
        if b == 0x00 {
            return self.zero;
        }
        if b == 0xFF {
            return self.max;
        }
        let v = f64::from(b);
        if v < self.low_threshold {
            return self.low;
        }
        if v > self.high_threshold {
            return self.high;
        }
        self.fallback
    }

    fn settings(&self) -> Vec<RendererSetting> {
        vec![
            RendererSetting::new("0x00 color", SettingValue::Color(self.zero))
                .with_tooltip("Color of bytes with 0x00 value"),
            RendererSetting::new("0xFF color", SettingValue::Color(self.max))
                .with_tooltip("Color of bytes with 0xFF value"),
            RendererSetting::new("Low threshold", SettingValue::Numeric(self.low_threshold)),
            RendererSetting::new("Low color", SettingValue::Color(self.low))
                .with_tooltip("Color of bytes lower than 'low threshold'"),
            RendererSetting::new("High threshold", SettingValue::Numeric(self.high_threshold)),
            RendererSetting::new("High color", SettingValue::Color(self.high))
                .with_tooltip("Color of bytes higher than 'high threshold'"),
            RendererSetting::new("Default color", SettingValue::Color(self.fallback))
                .with_tooltip("Color for all bytes not fitting other categories"),
        ]
    }

    fn set(&mut self, name: &str, value: SettingValue) -> Result<(), SettingError> {
        match name {
            "0x00 color" => self.zero = expect_color("0x00 color", &value)?,
            "0xFF color" => self.max = expect_color("0xFF color", &value)?,
            "Low color" => self.low = expect_color("Low color", &value)?,
            "High color" => self.high = expect_color("High color", &value)?,
            "Default color" => self.fallback = expect_color("Default color", &value)?,
            "Low threshold" => self.low_threshold = expect_numeric("Low threshold", &value)?,
            "High threshold" => self.high_threshold = expect_numeric("High threshold", &value)?,
            _ => return Err(SettingError::UnknownSetting(name.to_string())),
        }
        Ok(())
    }
}

/// A 5-color gradient split into 4 segments by 3 thresholds; each byte is
/// interpolated between the endpoint colors of the segment containing it.
///
/// Thresholds are kept strictly ordered inside (0, 255), which keeps every
/// segment non-empty and the interpolation denominators nonzero. Deserialized
/// presets go through the same validation, so no reachable state divides by
/// zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeatmapRendererRaw")]
pub struct HeatmapRenderer {
    pub colors: [Color; 5],
    t1: f64,
    t2: f64,
    t3: f64,
}

/// Unvalidated wire form of `HeatmapRenderer`.
#[derive(Deserialize)]
struct HeatmapRendererRaw {
    colors: [Color; 5],
    t1: f64,
    t2: f64,
    t3: f64,
}

impl TryFrom<HeatmapRendererRaw> for HeatmapRenderer {
    type Error = SettingError;

    fn try_from(raw: HeatmapRendererRaw) -> Result<Self, SettingError> {
        let mut heatmap = Self {
            colors: raw.colors,
            ..Self::default()
        };
        heatmap.set_thresholds(raw.t1, raw.t2, raw.t3)?;
        Ok(heatmap)
    }
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self {
            colors: [
                Color::rgb(0.0, 0.0, 64.0),
                Color::rgb(0.0, 0.0, 192.0),
                Color::rgb(255.0, 0.0, 0.0),
                Color::rgb(255.0, 192.0, 0.0),
                Color::rgb(255.0, 255.0, 255.0),
            ],
            t1: 32.0,
            t2: 160.0,
            t3: 224.0,
        }
    }
}

impl HeatmapRenderer {
    /// Current thresholds (t1, t2, t3).
    pub fn thresholds(&self) -> (f64, f64, f64) {
        (self.t1, self.t2, self.t3)
    }

    /// Replace all three thresholds at once, rejecting any triple that is not
    /// strictly ordered inside (0, 255).
    pub fn set_thresholds(&mut self, t1: f64, t2: f64, t3: f64) -> Result<(), SettingError> {
        if !(0.0 < t1 && t1 < t2 && t2 < t3 && t3 < 255.0) {
            return Err(SettingError::ThresholdOrder { t1, t2, t3 });
        }
        self.t1 = t1;
        self.t2 = t2;
        self.t3 = t3;
        Ok(())
    }

    #[inline]
    fn render(&self, data: &[u8], idx: usize) -> Color {
        let b = f64::from(data[idx]);
        let [c0, c1, c2, c3, c4] = self.colors;

        let (from, to, t) = if b < self.t1 {
            (c0, c1, b / self.t1)
        } else if b < self.t2 {
            (c1, c2, (b - self.t1) / (self.t2 - self.t1))
        } else if b < self.t3 {
            (c2, c3, (b - self.t2) / (self.t3 - self.t2))
        } else {
            (c3, c4, (b - self.t3) / (255.0 - self.t3))
        };

        from.lerp(to, t as f32)
    }

    fn settings(&self) -> Vec<RendererSetting> {
        vec![
            RendererSetting::new("Color 1", SettingValue::Color(self.colors[0])),
            RendererSetting::new("Color 2", SettingValue::Color(self.colors[1])),
            RendererSetting::new("Color 3", SettingValue::Color(self.colors[2])),
            RendererSetting::new("Color 4", SettingValue::Color(self.colors[3])),
            RendererSetting::new("Color 5", SettingValue::Color(self.colors[4])),
            RendererSetting::new("Threshold 1", SettingValue::Numeric(self.t1))
                .with_tooltip("Indicates the place of 'Color 2' on the gradient scale"),
            RendererSetting::new("Threshold 2", SettingValue::Numeric(self.t2))
                .with_tooltip("Indicates the place of 'Color 3' on the gradient scale"),
            RendererSetting::new("Threshold 3", SettingValue::Numeric(self.t3))
                .with_tooltip("Indicates the place of 'Color 4' on the gradient scale"),
        ]
    }

    fn set(&mut self, name: &str, value: SettingValue) -> Result<(), SettingError> {
        match name {
            "Color 1" => self.colors[0] = expect_color("Color 1", &value)?,
            "Color 2" => self.colors[1] = expect_color("Color 2", &value)?,
            "Color 3" => self.colors[2] = expect_color("Color 3", &value)?,
            "Color 4" => self.colors[3] = expect_color("Color 4", &value)?,
            "Color 5" => self.colors[4] = expect_color("Color 5", &value)?,
            "Threshold 1" => {
                let t1 = expect_numeric("Threshold 1", &value)?;
                self.set_thresholds(t1, self.t2, self.t3)?;
            }
            "Threshold 2" => {
                let t2 = expect_numeric("Threshold 2", &value)?;
                self.set_thresholds(self.t1, t2, self.t3)?;
            }
            "Threshold 3" => {
                let t3 = expect_numeric("Threshold 3", &value)?;
                self.set_thresholds(self.t1, self.t2, t3)?;
            }
            _ => return Err(SettingError::UnknownSetting(name.to_string())),
        }
        Ok(())
    }
}

// =============================================================================
// Typed Value Extraction
// =============================================================================

fn expect_color(name: &'static str, value: &SettingValue) -> Result<Color, SettingError> {
    match value {
        SettingValue::Color(c) => Ok(*c),
        other => Err(SettingError::KindMismatch {
            name,
            expected: crate::settings::SettingKind::Color,
            got: other.kind(),
        }),
    }
}

fn expect_numeric(name: &'static str, value: &SettingValue) -> Result<f64, SettingError> {
    match value {
        SettingValue::Numeric(n) => Ok(*n),
        other => Err(SettingError::KindMismatch {
            name,
            expected: crate::settings::SettingKind::Numeric,
            got: other.kind(),
        }),
    }
}

fn expect_text<'a>(name: &'static str, value: &'a SettingValue) -> Result<&'a str, SettingError> {
    match value {
        SettingValue::Text(s) => Ok(s),
        other => Err(SettingError::KindMismatch {
            name,
            expected: crate::settings::SettingKind::Text,
            got: other.kind(),
        }),
    }
}

// =============================================================================
// Pixel Renderer
// =============================================================================

/// A pluggable byte → color mapping strategy. Each variant owns its settings;
/// nothing is shared between instances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PixelRenderer {
    Rgb(RgbRenderer),
    Rgba(RgbaRenderer),
    Grayscale(GrayscaleRenderer),
    ByteClass(ByteClassRenderer),
    Extremes(ExtremesRenderer),
    Heatmap(HeatmapRenderer),
}

impl PixelRenderer {
    /// One default-configured instance of every renderer, in presentation
    /// order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Rgb(RgbRenderer::default()),
            Self::Rgba(RgbaRenderer::default()),
            Self::Grayscale(GrayscaleRenderer),
            Self::ByteClass(ByteClassRenderer::default()),
            Self::Extremes(ExtremesRenderer::default()),
            Self::Heatmap(HeatmapRenderer::default()),
        ]
    }

    /// Which strategy this is.
    pub fn kind(&self) -> RendererKind {
        match self {
            Self::Rgb(_) => RendererKind::Rgb,
            Self::Rgba(_) => RendererKind::Rgba,
            Self::Grayscale(_) => RendererKind::Grayscale,
            Self::ByteClass(_) => RendererKind::ByteClass,
            Self::Extremes(_) => RendererKind::Extremes,
            Self::Heatmap(_) => RendererKind::Heatmap,
        }
    }

    /// Map `skip_bytes` input bytes starting at `idx` to one color.
    ///
    /// Callers must guarantee `idx + skip_bytes <= data.len()`; the
    /// rasterizer substitutes black pixels instead of calling out of bounds.
    #[inline]
    pub fn render(&self, data: &[u8], idx: usize) -> Color {
        match self {
            Self::Rgb(r) => r.render(data, idx),
            Self::Rgba(r) => r.render(data, idx),
            Self::Grayscale(_) => GrayscaleRenderer::render(data, idx),
            Self::ByteClass(r) => r.render(data, idx),
            Self::Extremes(r) => r.render(data, idx),
            Self::Heatmap(r) => r.render(data, idx),
        }
    }

    /// Number of input bytes one `render` call consumes.
    pub fn skip_bytes(&self) -> usize {
        match self {
            Self::Rgb(_) => 3,
            Self::Rgba(_) => 4,
            Self::Grayscale(_) | Self::ByteClass(_) | Self::Extremes(_) | Self::Heatmap(_) => 1,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rgb(_) => "RGB renderer",
            Self::Rgba(_) => "RGBA renderer",
            Self::Grayscale(_) => "Grayscale renderer",
            Self::ByteClass(_) => "Byte classifier",
            Self::Extremes(_) => "Extremes renderer",
            Self::Heatmap(_) => "Heatmap renderer",
        }
    }

    /// One-line description for a renderer picker.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Rgb(_) => "Creates RGB colors from 3 bytes",
            Self::Rgba(_) => "Creates RGBA colors from 4 bytes",
            Self::Grayscale(_) => "Creates a gray color from 1 byte",
            Self::ByteClass(_) => {
                "Classifies bytes, then assigns specific colors to classes. Reads a single byte"
            }
            Self::Extremes(_) => "Marks extremities with specified colors",
            Self::Heatmap(_) => "Displays a 'heat map' of the file (Fancy Grayscale renderer)",
        }
    }

    /// Snapshot of the settings schema, for a configuration UI.
    pub fn settings(&self) -> Vec<RendererSetting> {
        match self {
            Self::Rgb(r) => r.settings(),
            Self::Rgba(r) => r.settings(),
            Self::Grayscale(_) => Vec::new(),
            Self::ByteClass(r) => r.settings(),
            Self::Extremes(r) => r.settings(),
            Self::Heatmap(r) => r.settings(),
        }
    }

    /// Push one setting edit by name. Rejects unknown names, kind mismatches
    /// and invalid values; on error the renderer is unchanged.
    pub fn set_setting(&mut self, name: &str, value: SettingValue) -> Result<(), SettingError> {
        match self {
            Self::Rgb(r) => r.set(name, value),
            Self::Rgba(r) => r.set(name, value),
            Self::Grayscale(_) => Err(SettingError::UnknownSetting(name.to_string())),
            Self::ByteClass(r) => r.set(name, value),
            Self::Extremes(r) => r.set(name, value),
            Self::Heatmap(r) => r.set(name, value),
        }
    }
}
