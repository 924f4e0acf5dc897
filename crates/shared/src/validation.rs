//! Domain field validation.
//!
//! Registration limits mirror the national formats the service targets:
//! 8-digit phone numbers and a national identifier of at most 10 characters.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of a phone number.
pub const MAX_PHONE_LEN: usize = 8;

/// Maximum length of a national identifier.
pub const MAX_NATIONAL_ID_LEN: usize = 10;

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{1,8}$").expect("valid phone regex");
    static ref NATIONAL_ID_RE: Regex =
        Regex::new(r"^[0-9A-Za-z]{1,10}$").expect("valid national id regex");
}

/// Validates a phone number: digits only, at most 8 characters.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must be 1-8 digits".into());
        Err(err)
    }
}

/// Validates a national identifier: alphanumeric, at most 10 characters.
pub fn validate_national_id(national_id: &str) -> Result<(), ValidationError> {
    if NATIONAL_ID_RE.is_match(national_id) {
        Ok(())
    } else {
        let mut err = ValidationError::new("national_id_format");
        err.message = Some("National id must be 1-10 alphanumeric characters".into());
        Err(err)
    }
}

/// Validates a city name: non-empty after trimming, at most 100 characters.
pub fn validate_city(city: &str) -> Result<(), ValidationError> {
    let trimmed = city.trim();
    if trimmed.is_empty() || trimmed.len() > 100 {
        let mut err = ValidationError::new("city_format");
        err.message = Some("City must be 1-100 characters".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_local_numbers() {
        assert!(validate_phone("22334455").is_ok());
        assert!(validate_phone("4455").is_ok());
    }

    #[test]
    fn phone_rejects_too_long() {
        assert!(validate_phone("223344556").is_err());
    }

    #[test]
    fn phone_rejects_non_digits() {
        assert!(validate_phone("22-33-44").is_err());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("+2233445").is_err());
    }

    #[test]
    fn national_id_accepts_up_to_ten_chars() {
        assert!(validate_national_id("1234567890").is_ok());
        assert!(validate_national_id("AB12").is_ok());
    }

    #[test]
    fn national_id_rejects_too_long() {
        assert!(validate_national_id("12345678901").is_err());
    }

    #[test]
    fn national_id_rejects_symbols() {
        assert!(validate_national_id("12-34").is_err());
        assert!(validate_national_id("").is_err());
    }

    #[test]
    fn city_rejects_blank() {
        assert!(validate_city("").is_err());
        assert!(validate_city("   ").is_err());
        assert!(validate_city("Nouakchott").is_ok());
    }

    #[test]
    fn phone_error_message() {
        let err = validate_phone("not-a-phone").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Phone must be 1-8 digits");
    }
}
