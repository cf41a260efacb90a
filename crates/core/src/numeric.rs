//! Canonical rendering of numeric field values.
//!
//! Edited tables arrive as strings, so `"100"`, `"100.0"`, and `100` must all
//! compare equal. Values are parsed to f64 and re-rendered: integral values
//! without a decimal point, non-integral values rounded to two decimal places
//! with trailing zeros trimmed. Unparsable input normalizes to `"0"` but is
//! flagged so callers can surface the entry error instead of silently zeroing
//! it.

/// Result of normalizing one raw field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Canonical string rendering.
    pub value: String,
    /// True when the raw input was not a parsable finite number and the value
    /// was coerced to zero.
    pub coerced: bool,
}

/// Normalize a raw numeric field value to its canonical string form.
pub fn normalize(raw: &str) -> Normalized {
    let trimmed = raw.trim();

    let parsed = trimmed.parse::<f64>();
    let value = match parsed {
        Ok(v) if v.is_finite() => v,
        _ => {
            return Normalized {
                value: "0".to_string(),
                coerced: true,
            };
        }
    };

    // Round to two decimal places before deciding integral vs fractional, so
    // "10.001" and "10" compare equal.
    let rounded = (value * 100.0).round() / 100.0;

    let rendered = if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        // Two decimal places, then trim a trailing zero ("10.50" -> "10.5").
        let mut s = format!("{rounded:.2}");
        if s.ends_with('0') {
            s.pop();
        }
        s
    };

    // Avoid the "-0" rendering for tiny negative values.
    let rendered = if rendered == "-0" {
        "0".to_string()
    } else {
        rendered
    };

    Normalized {
        value: rendered,
        coerced: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(raw: &str) -> String {
        normalize(raw).value
    }

    #[test]
    fn integral_values_render_without_decimal_point() {
        assert_eq!(value("100"), "100");
        assert_eq!(value("100.0"), "100");
        assert_eq!(value(" 100.00 "), "100");
    }

    #[test]
    fn formatting_differences_normalize_equal() {
        assert_eq!(value("100"), value("100.0"));
        assert_eq!(value("10.50"), value("10.5"));
    }

    #[test]
    fn fractional_values_keep_significant_decimals() {
        assert_eq!(value("10.5"), "10.5");
        assert_eq!(value("10.55"), "10.55");
    }

    #[test]
    fn rounds_to_two_decimal_places() {
        assert_eq!(value("10.005"), "10.01");
        assert_eq!(value("10.004"), "10");
        assert_eq!(value("3.14159"), "3.14");
    }

    #[test]
    fn unparsable_input_coerces_to_zero_and_flags() {
        let n = normalize("not a number");
        assert_eq!(n.value, "0");
        assert!(n.coerced);

        let n = normalize("");
        assert_eq!(n.value, "0");
        assert!(n.coerced);
    }

    #[test]
    fn non_finite_input_coerces_to_zero() {
        assert!(normalize("NaN").coerced);
        assert!(normalize("inf").coerced);
    }

    #[test]
    fn negative_values_render_cleanly() {
        assert_eq!(value("-25.50"), "-25.5");
        assert_eq!(value("-0.0"), "0");
    }

    #[test]
    fn parsable_values_are_not_flagged() {
        assert!(!normalize("42").coerced);
        assert!(!normalize("0").coerced);
    }
}
