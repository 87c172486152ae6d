//! The canonical overlay state record and tolerant partial updates.
//!
//! [`OverlayState`] is the single source of truth for everything a display
//! client renders: the win counter, its upper display bound, and the visual
//! styling knobs. Field names serialize in camelCase to match the JSON the
//! overlay page and the persisted `config.json` expect.
//!
//! [`OverlayPatch`] is a mutation intent: any subset of fields may be
//! present. Patches built from raw JSON via [`OverlayPatch::from_value`]
//! silently skip absent or wrong-typed fields, so a sloppy caller can never
//! null out a field -- it either supplies a complete new value or the old
//! one stays.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lower bound enforced on `maxWin` on every write path.
const MAX_WIN_FLOOR: i64 = 1;

/// Inclusive range enforced on `strokeWidth` on every write path.
const STROKE_WIDTH_MIN: f64 = 0.0;
/// Upper bound of the `strokeWidth` range.
const STROKE_WIDTH_MAX: f64 = 12.0;

/// The full overlay state: counter plus display configuration.
///
/// Exactly one of these exists per running server, owned by the
/// [`StateStore`](crate::store::StateStore). `current` intentionally has no
/// upper bound -- it may exceed `max_win`, and the display layer decides
/// how to render the overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayState {
    /// Upper display bound for the counter. Always >= 1.
    pub max_win: i64,
    /// The live counter value.
    pub current: i64,
    /// Visual theme identifier.
    pub theme: String,
    /// CSS font descriptor.
    pub font: String,
    /// Optional remote font stylesheet URL. Empty when unused.
    pub font_url: String,
    /// Whether the overlay background is rendered.
    pub show_bg: bool,
    /// Text outline thickness. Always within [0, 12].
    pub stroke_width: f64,
    /// Text outline hex color code.
    pub stroke_color: String,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            max_win: 10,
            current: 0,
            theme: String::from("theme-default"),
            font: String::from("'Kanit', sans-serif"),
            font_url: String::new(),
            show_bg: true,
            stroke_width: 2.0,
            stroke_color: String::from("#000000"),
        }
    }
}

impl OverlayState {
    /// Merge a patch into this state and re-establish the invariants.
    ///
    /// Fields the patch carries replace the corresponding canonical field;
    /// everything else keeps its previous value. After the merge, `max_win`
    /// is floored at 1 and `stroke_width` clamped to [0, 12] -- the clamps
    /// run here so no mutation path can bypass them.
    pub fn apply(&mut self, patch: OverlayPatch) {
        if let Some(max_win) = patch.max_win {
            self.max_win = max_win;
        }
        if let Some(current) = patch.current {
            self.current = current;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(font) = patch.font {
            self.font = font;
        }
        if let Some(font_url) = patch.font_url {
            self.font_url = font_url;
        }
        if let Some(show_bg) = patch.show_bg {
            self.show_bg = show_bg;
        }
        // A non-finite width would survive the clamp below as NaN, so it
        // is not a valid value at all and keeps the previous one.
        if let Some(stroke_width) = patch.stroke_width.filter(|w| w.is_finite()) {
            self.stroke_width = stroke_width;
        }
        if let Some(stroke_color) = patch.stroke_color {
            self.stroke_color = stroke_color;
        }

        self.max_win = self.max_win.max(MAX_WIN_FLOOR);
        self.stroke_width = self.stroke_width.clamp(STROKE_WIDTH_MIN, STROKE_WIDTH_MAX);
    }
}

/// A partial update: any subset of [`OverlayState`] fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPatch {
    /// New upper display bound, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_win: Option<i64>,
    /// New counter value, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<i64>,
    /// New theme identifier, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// New font descriptor, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// New font stylesheet URL, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_url: Option<String>,
    /// New background visibility, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_bg: Option<bool>,
    /// New outline thickness, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// New outline color, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
}

impl OverlayPatch {
    /// Extract a patch from arbitrary JSON, field by field.
    ///
    /// A field that is absent or has the wrong JSON type is simply left out
    /// of the patch -- never an error. This mirrors the merge contract: a
    /// mutation intent can only ever carry well-typed values.
    pub fn from_value(value: &Value) -> Self {
        Self {
            max_win: value.get("maxWin").and_then(Value::as_i64),
            current: value.get("current").and_then(Value::as_i64),
            theme: value.get("theme").and_then(Value::as_str).map(str::to_owned),
            font: value.get("font").and_then(Value::as_str).map(str::to_owned),
            font_url: value
                .get("fontUrl")
                .and_then(Value::as_str)
                .map(str::to_owned),
            show_bg: value.get("showBg").and_then(Value::as_bool),
            stroke_width: value.get("strokeWidth").and_then(Value::as_f64),
            stroke_color: value
                .get("strokeColor")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }
}
