//! Webhook payload grammar: `token:appName:action[:argument]`.
//!
//! Stream-interaction services trigger the overlay by requesting a URL
//! whose last path segment is a colon-delimited command. Axum's `Path`
//! extractor percent-decodes the segment before it reaches this module.
//!
//! Validation order is fixed: split, part count, token, app name. Any
//! colons past the third part belong to the argument and are rejoined, so
//! arguments may themselves contain `:`.

use crate::error::ApiError;

/// Fixed application identifier webhook payloads must name.
pub const APP_NAME: &str = "winoverlay";

/// A structurally valid, authenticated webhook command.
///
/// The action identifier is still raw text at this point; it is validated
/// against the vocabulary by [`Action::parse`](winoverlay_core::Action::parse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCommand {
    /// The action identifier (third payload part).
    pub action: String,
    /// The rejoined argument, when any parts followed the action.
    pub argument: Option<String>,
}

/// Parse and authenticate a webhook payload.
pub fn parse_payload(payload: &str, token: &str) -> Result<HookCommand, ApiError> {
    let mut parts = payload.split(':');
    let (Some(given_token), Some(app), Some(action)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ApiError::Format);
    };

    if given_token != token {
        return Err(ApiError::InvalidToken);
    }
    if app != APP_NAME {
        return Err(ApiError::InvalidApp);
    }

    let rest: Vec<&str> = parts.collect();
    let argument = if rest.is_empty() {
        None
    } else {
        Some(rest.join(":"))
    };

    Ok(HookCommand {
        action: action.to_owned(),
        argument,
    })
}

/// Whether a bare top-level path segment looks like a webhook payload.
///
/// The compatibility route catches every single-segment path; anything
/// without the three-part colon shape is someone else's 404, not a
/// malformed webhook.
pub fn looks_like_payload(segment: &str) -> bool {
    segment.matches(':').count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "s3cret";

    #[test]
    fn parses_action_without_argument() {
        let command = parse_payload("s3cret:winoverlay:win_plus", TOKEN).ok();
        assert_eq!(
            command,
            Some(HookCommand {
                action: String::from("win_plus"),
                argument: None,
            })
        );
    }

    #[test]
    fn parses_action_with_argument() {
        let command = parse_payload("s3cret:winoverlay:set_current:5", TOKEN).ok();
        assert_eq!(
            command,
            Some(HookCommand {
                action: String::from("set_current"),
                argument: Some(String::from("5")),
            })
        );
    }

    #[test]
    fn argument_keeps_embedded_colons() {
        let command =
            parse_payload("s3cret:winoverlay:fonturl:https://x/y:8080/f.css", TOKEN).ok();
        assert_eq!(
            command.and_then(|c| c.argument),
            Some(String::from("https://x/y:8080/f.css"))
        );
    }

    #[test]
    fn too_few_parts_is_a_format_error() {
        assert!(matches!(
            parse_payload("s3cret:winoverlay", TOKEN),
            Err(ApiError::Format)
        ));
        assert!(matches!(parse_payload("", TOKEN), Err(ApiError::Format)));
    }

    #[test]
    fn wrong_token_is_rejected_before_the_app_check() {
        assert!(matches!(
            parse_payload("badtoken:wrongapp:win_plus", TOKEN),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_app_name_is_rejected() {
        assert!(matches!(
            parse_payload("s3cret:otherapp:win_plus", TOKEN),
            Err(ApiError::InvalidApp)
        ));
    }

    #[test]
    fn payload_shape_detection() {
        assert!(looks_like_payload("t:winoverlay:win_plus"));
        assert!(looks_like_payload("t:winoverlay:stroke:4,#ff0000"));
        assert!(!looks_like_payload("favicon.ico"));
        assert!(!looks_like_payload("overlay.html"));
    }
}
