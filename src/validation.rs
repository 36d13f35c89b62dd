use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"));

// Artist numbers are mobile numbers: ten digits, leading 6-9.
static ARTIST_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("artist phone pattern is valid"));

/// Accepts `local@domain.tld` where neither side contains whitespace or a
/// second `@`, and the top-level label is at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Exactly ten ASCII digits starting with 6, 7, 8 or 9.
pub fn is_valid_artist_phone(phone: &str) -> bool {
    ARTIST_PHONE_RE.is_match(phone)
}

/// Returns the trimmed value if it is present and non-blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@x.com", true)]
    #[case("first.last@studio.co.in", true)]
    #[case("a@x.c", false)]
    #[case("a@@x.com", false)]
    #[case("a x@x.com", false)]
    #[case("ax.com", false)]
    #[case("a@x", false)]
    #[case("", false)]
    fn email_format(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(input), expected);
    }

    #[rstest]
    #[case("0123456789", true)]
    #[case("9123456789", true)]
    #[case("912345678", false)]
    #[case("91234567890", false)]
    #[case("91234a6789", false)]
    #[case("+919123456", false)]
    fn general_phone_format(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_phone(input), expected);
    }

    #[rstest]
    #[case("9123456789", true)]
    #[case("6000000000", true)]
    #[case("5123456789", false)]
    #[case("0123456789", false)]
    #[case("912345678", false)]
    fn artist_phone_format(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_artist_phone(input), expected);
    }

    #[test]
    fn non_blank_trims_and_rejects_empty() {
        assert_eq!(non_blank(Some("  Asha ".into())), Some("Asha".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    proptest! {
        #[test]
        fn artist_phones_are_general_phones(phone in "[6-9][0-9]{9}") {
            prop_assert!(is_valid_artist_phone(&phone));
            prop_assert!(is_valid_phone(&phone));
        }

        #[test]
        fn low_leading_digit_rejected_for_artists(phone in "[0-5][0-9]{9}") {
            prop_assert!(!is_valid_artist_phone(&phone));
            prop_assert!(is_valid_phone(&phone));
        }
    }
}
