//! Chilean RUT formatting and checksum validation.
//!
//! A RUT is a national identifier of the form `12.345.678-5`: a numeric
//! body with thousands separators and a modulo-11 check digit, which may
//! be the letter `K`. `format` runs on every keystroke of the checkout
//! form, so it must accept arbitrary partial input without failing;
//! `validate` gates checkout submission.

/// Strip thousands separators and hyphens.
fn clean(input: &str) -> String {
    input.chars().filter(|c| *c != '.' && *c != '-').collect()
}

/// Re-format an input as `body-check digit` with thousands separators.
///
/// Returns an empty string for empty input. Malformed input is formatted
/// as-is; formatting never fails.
///
/// ```
/// use redy_commerce::rut;
/// assert_eq!(rut::format("123456785"), "12.345.678-5");
/// assert_eq!(rut::format(""), "");
/// ```
pub fn format(input: &str) -> String {
    let cleaned: Vec<char> = clean(input).chars().collect();
    if cleaned.is_empty() {
        return String::new();
    }

    let (body, check) = match cleaned.split_last() {
        Some((last, body)) => (body, last.to_ascii_uppercase()),
        None => return String::new(),
    };

    let mut formatted = String::new();
    let mut count = 0;
    for (i, c) in body.iter().enumerate().rev() {
        formatted.insert(0, *c);
        count += 1;
        if count == 3 && i != 0 {
            formatted.insert(0, '.');
            count = 0;
        }
    }

    format!("{}-{}", formatted, check)
}

/// Validate the modulo-11 checksum of a RUT.
///
/// Accepts formatted or unformatted input. Returns false when fewer than
/// two characters remain after stripping separators or when the body is
/// not numeric.
///
/// ```
/// use redy_commerce::rut;
/// assert!(rut::validate("12.345.678-5"));
/// assert!(!rut::validate("12.345.678-9"));
/// ```
pub fn validate(input: &str) -> bool {
    let cleaned: Vec<char> = clean(input).chars().collect();
    if cleaned.len() < 2 {
        return false;
    }

    let (body, check) = match cleaned.split_last() {
        Some((last, body)) => (body, last.to_ascii_uppercase()),
        None => return false,
    };

    if !body.iter().all(|c| c.is_ascii_digit()) {
        return false;
    }

    // Weights cycle 2..=7 starting from the least significant digit.
    let mut sum: u32 = 0;
    let mut weight = 2;
    for c in body.iter().rev() {
        let digit = c.to_digit(10).unwrap_or(0);
        sum += digit * weight;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }

    let expected = match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    };

    check == expected
}

/// Strip separators for storage and gateway submission (e.g., "12.345.678-5"
/// becomes "123456785").
pub fn normalize(input: &str) -> String {
    clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inserts_separators() {
        assert_eq!(format("123456785"), "12.345.678-5");
        assert_eq!(format("111111111"), "11.111.111-1");
        assert_eq!(format("9K"), "9-K");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format(""), "");
        assert_eq!(format(".-"), "");
    }

    #[test]
    fn test_format_uppercases_check_digit() {
        assert_eq!(format("12345670k"), "12.345.670-K");
    }

    #[test]
    fn test_format_partial_input_does_not_panic() {
        // Live-typed fragments must format without failing.
        assert_eq!(format("1"), "-1");
        assert_eq!(format("12"), "1-2");
    }

    #[test]
    fn test_validate_known_good() {
        assert!(validate("12.345.678-5"));
        assert!(validate("123456785"));
        assert!(validate("11.111.111-1"));
    }

    #[test]
    fn test_validate_wrong_check_digit() {
        assert!(!validate("12.345.678-4"));
        assert!(!validate("12.345.678-K"));
        assert!(!validate("11.111.111-K"));
    }

    #[test]
    fn test_validate_k_check_digit() {
        // Body 12345670 yields raw check 10, mapped to K.
        assert!(validate("12.345.670-K"));
        assert!(validate("12345670k"));
    }

    #[test]
    fn test_validate_rejects_short_and_non_numeric() {
        assert!(!validate(""));
        assert!(!validate("5"));
        assert!(!validate("12a45678-5"));
    }

    #[test]
    fn test_round_trip_is_stable() {
        for seed in ["123456785", "12345670K", "111111111"] {
            let formatted = format(seed);
            assert!(validate(&formatted));
            assert_eq!(format(&formatted), formatted);
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("12.345.678-5"), "123456785");
    }
}
