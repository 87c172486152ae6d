//! The command vocabulary: every remote trigger parses into an [`Action`].
//!
//! Webhook URLs and convenience endpoints carry a textual action identifier
//! plus an optional raw argument. Parsing is the only way to construct an
//! [`Action`], so anything that survives parsing is already validated --
//! handlers downstream never fail on argument grammar.
//!
//! The set is deliberately closed: adding an action means adding a variant
//! and a match arm, an explicit and reviewable change.

use thiserror::Error;

use crate::state::OverlayPatch;

/// Errors produced while parsing an action identifier and its argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action identifier is not part of the vocabulary.
    #[error("unknown action: {0}")]
    Unknown(String),

    /// `set_current` was invoked without a parseable integer.
    #[error("set_current needs a number")]
    CurrentNeedsNumber,

    /// `theme` was invoked without a value.
    #[error("theme needs a value")]
    ThemeNeedsValue,

    /// `font` was invoked without a value.
    #[error("font needs a value")]
    FontNeedsValue,

    /// `stroke` was invoked without its `<width>,<color>` argument.
    #[error("stroke needs \"<width>,<color>\"")]
    StrokeNeedsArgument,
}

/// A validated state-mutation command.
///
/// Counter-relative variants (`WinPlus`, `WinMinus`) carry the step and are
/// resolved against the live counter inside the store's critical section,
/// so concurrent increments never collapse into one.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Increment the counter by the given step.
    WinPlus(i64),
    /// Decrement the counter by the given step.
    WinMinus(i64),
    /// Set the counter to an absolute value.
    SetCurrent(i64),
    /// Set the upper display bound (already floored at 1).
    SetMax(i64),
    /// Switch the visual theme.
    Theme(String),
    /// Switch the font descriptor.
    Font(String),
    /// Set the remote font stylesheet URL (may be empty).
    FontUrl(String),
    /// Toggle the overlay background.
    ShowBg(bool),
    /// Update the text outline. Either part may be absent, in which case
    /// the corresponding field keeps its previous value.
    Stroke {
        /// Parsed outline width, when the argument's width part was numeric.
        width: Option<f64>,
        /// Outline color, when the argument carried a non-empty color part.
        color: Option<String>,
    },
}

impl Action {
    /// Parse an action identifier and optional raw argument.
    ///
    /// Identifiers are case-sensitive. The argument grammar is per-action:
    /// counter steps default to 1 when absent or unparseable, `set_max`
    /// silently floors invalid input to 1, and `bg` accepts `1`/`true`/`on`
    /// (case-insensitive) as true and treats everything else as false.
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Self, ActionError> {
        let int_arg = arg.and_then(|a| a.trim().parse::<i64>().ok());

        match name {
            "win_plus" => Ok(Self::WinPlus(int_arg.unwrap_or(1))),
            "win_minus" => Ok(Self::WinMinus(int_arg.unwrap_or(1))),
            "set_current" => int_arg
                .map(Self::SetCurrent)
                .ok_or(ActionError::CurrentNeedsNumber),
            "set_max" => Ok(Self::SetMax(int_arg.filter(|m| *m >= 1).unwrap_or(1))),
            "theme" => match arg {
                Some(value) if !value.is_empty() => Ok(Self::Theme(value.to_owned())),
                _ => Err(ActionError::ThemeNeedsValue),
            },
            "font" => match arg {
                Some(value) if !value.is_empty() => Ok(Self::Font(value.to_owned())),
                _ => Err(ActionError::FontNeedsValue),
            },
            "fonturl" => Ok(Self::FontUrl(arg.unwrap_or_default().to_owned())),
            "bg" => {
                let value = arg.unwrap_or_default().to_ascii_lowercase();
                Ok(Self::ShowBg(matches!(
                    value.as_str(),
                    "1" | "true" | "on"
                )))
            }
            "stroke" => {
                let raw = arg
                    .filter(|a| !a.is_empty())
                    .ok_or(ActionError::StrokeNeedsArgument)?;
                let (width_part, color_part) = match raw.split_once(',') {
                    // Only the part up to the next comma is the color;
                    // anything after a second comma is dropped.
                    Some((width, rest)) => (
                        width,
                        Some(rest.split_once(',').map_or(rest, |(color, _)| color)),
                    ),
                    None => (raw, None),
                };
                Ok(Self::Stroke {
                    // Rust's float grammar parses "NaN" and "inf"; only
                    // finite widths are valid outline thicknesses.
                    width: width_part
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|w| w.is_finite()),
                    color: color_part
                        .filter(|c| !c.is_empty())
                        .map(str::to_owned),
                })
            }
            other => Err(ActionError::Unknown(other.to_owned())),
        }
    }

    /// Resolve this action into a mutation intent.
    ///
    /// `current` is the live counter value read under the store's lock;
    /// relative steps use saturating arithmetic so extreme steps clamp at
    /// the integer bounds instead of wrapping.
    pub fn into_patch(self, current: i64) -> OverlayPatch {
        let mut patch = OverlayPatch::default();
        match self {
            Self::WinPlus(step) => patch.current = Some(current.saturating_add(step)),
            Self::WinMinus(step) => patch.current = Some(current.saturating_sub(step)),
            Self::SetCurrent(value) => patch.current = Some(value),
            Self::SetMax(value) => patch.max_win = Some(value),
            Self::Theme(theme) => patch.theme = Some(theme),
            Self::Font(font) => patch.font = Some(font),
            Self::FontUrl(url) => patch.font_url = Some(url),
            Self::ShowBg(show) => patch.show_bg = Some(show),
            Self::Stroke { width, color } => {
                patch.stroke_width = width;
                patch.stroke_color = color;
            }
        }
        patch
    }

    /// The wire identifier of this action, for logging and response echoes.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WinPlus(_) => "win_plus",
            Self::WinMinus(_) => "win_minus",
            Self::SetCurrent(_) => "set_current",
            Self::SetMax(_) => "set_max",
            Self::Theme(_) => "theme",
            Self::Font(_) => "font",
            Self::FontUrl(_) => "fonturl",
            Self::ShowBg(_) => "bg",
            Self::Stroke { .. } => "stroke",
        }
    }
}
