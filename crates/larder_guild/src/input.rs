//! Input bounds enforced before store access.

use larder_error::{SecurityError, SecurityErrorKind};

/// Maximum accepted length for user-supplied values, in characters.
pub const MAX_INPUT_LEN: usize = 1100;

/// Maximum accepted length for custom command triggers, in characters.
pub const MAX_TRIGGER_LEN: usize = 80;

/// Guard a user-supplied argument against [`MAX_INPUT_LEN`].
///
/// Invoked at the top of every mutating guild operation; a violation
/// means the operation performs no store access at all. The bound counts
/// characters, not bytes.
pub(crate) fn bounded(what: &'static str, value: &str) -> Result<(), SecurityError> {
    let len = value.chars().count();
    if len > MAX_INPUT_LEN {
        return Err(SecurityError::new(SecurityErrorKind::InputBound {
            what: what.to_string(),
            len,
            max: MAX_INPUT_LEN,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_is_inclusive() {
        let at_bound = "a".repeat(MAX_INPUT_LEN);
        assert!(bounded("value", &at_bound).is_ok());
    }

    #[test]
    fn one_over_is_rejected() {
        let over = "a".repeat(MAX_INPUT_LEN + 1);
        let err = bounded("value", &over).unwrap_err();
        match err.kind {
            SecurityErrorKind::InputBound { len, max, .. } => {
                assert_eq!(len, MAX_INPUT_LEN + 1);
                assert_eq!(max, MAX_INPUT_LEN);
            }
        }
    }

    #[test]
    fn bound_counts_characters_not_bytes() {
        // two bytes per char in utf-8, still within the bound
        let wide = "ü".repeat(MAX_INPUT_LEN);
        assert!(wide.len() > MAX_INPUT_LEN);
        assert!(bounded("value", &wide).is_ok());
    }

    #[test]
    fn empty_input_passes() {
        assert!(bounded("value", "").is_ok());
    }
}
