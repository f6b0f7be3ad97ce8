//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Iranian mobile number as submitted by clients: 09xxxxxxxxx
static IRAN_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^09[0-9]{9}$").unwrap());

/// Remove spaces, dashes and parentheses from a phone number
pub fn strip_formatting(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check whether a phone number is a valid Iranian mobile number
pub fn is_valid_iran_mobile(phone: &str) -> bool {
    IRAN_MOBILE_REGEX.is_match(phone)
}

/// Normalize a phone number for the SMS gateway
///
/// The gateway expects `9xxxxxxxxx`: no leading zero and no country code.
/// Accepts `09xxxxxxxxx`, `+989xxxxxxxxx` and `989xxxxxxxxx` inputs.
pub fn normalize_for_gateway(phone: &str) -> String {
    let mut cleaned = strip_formatting(phone);

    if let Some(rest) = cleaned.strip_prefix("+98") {
        cleaned = rest.to_string();
    } else if let Some(rest) = cleaned.strip_prefix("98") {
        cleaned = rest.to_string();
    }

    if let Some(rest) = cleaned.strip_prefix('0') {
        cleaned = rest.to_string();
    }

    cleaned
}

/// Mask a phone number for logging (e.g. 091****6789)
pub fn mask_phone_number(phone: &str) -> String {
    if phone.len() >= 7 {
        format!("{}****{}", &phone[0..3], &phone[phone.len() - 4..])
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_iran_mobile() {
        assert!(is_valid_iran_mobile("09123456789"));
        assert!(is_valid_iran_mobile("09901234567"));
        assert!(!is_valid_iran_mobile("9123456789")); // Missing leading zero
        assert!(!is_valid_iran_mobile("0912345678")); // Too short
        assert!(!is_valid_iran_mobile("091234567890")); // Too long
        assert!(!is_valid_iran_mobile("08123456789")); // Invalid prefix
        assert!(!is_valid_iran_mobile("0912345678a")); // Non-digit
    }

    #[test]
    fn test_normalize_for_gateway() {
        assert_eq!(normalize_for_gateway("09123456789"), "9123456789");
        assert_eq!(normalize_for_gateway("+989123456789"), "9123456789");
        assert_eq!(normalize_for_gateway("989123456789"), "9123456789");
        assert_eq!(normalize_for_gateway("0912 345-6789"), "9123456789");
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("09123456789"), "091****6789");
        assert_eq!(mask_phone_number("0912"), "****");
    }
}
