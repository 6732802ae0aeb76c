//! Validation of incoming booking requests, mirroring the rules of the booking form.

use chrono::NaiveDate;
use hallbook_api_types::{BookingRequest, RequesterType};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex should be valid");
}

/// Check a booking request for completeness before it is handed to the store.
///
/// Slot availability and room existence are checked by the store itself; this only covers the
/// field-level rules: required contact fields, the requester-type-specific fields and a sane
/// date.
pub fn validate_booking_request(
    request: &BookingRequest,
    today: NaiveDate,
) -> Result<(), String> {
    if request.activity_name.trim().is_empty() {
        return Err("Activity name must not be empty".to_string());
    }
    if request.requester_name.trim().is_empty() {
        return Err("Requester name must not be empty".to_string());
    }
    if request.university_id.trim().is_empty() {
        return Err("University id must not be empty".to_string());
    }
    if request.contact_number.trim().is_empty() {
        return Err("Contact number must not be empty".to_string());
    }
    if !EMAIL_REGEX.is_match(request.email.trim()) {
        return Err("Email address is not valid".to_string());
    }
    match request.requester_type {
        RequesterType::ClubPresident => {
            if request.club_name.trim().is_empty() {
                return Err("Club name must not be empty for club presidents".to_string());
            }
        }
        RequesterType::Student => {
            if !request
                .reason
                .as_ref()
                .is_some_and(|r| !r.trim().is_empty())
            {
                return Err("A reason must be given for student bookings".to_string());
            }
        }
    }
    if request.date < today {
        return Err("Booking date must not lie in the past".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::uuid;

    fn request() -> BookingRequest {
        BookingRequest {
            room_id: uuid!("0195a000-0000-7000-8000-0000000000aa"),
            date: NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
            requester_type: RequesterType::ClubPresident,
            club_name: "Programming club".to_string(),
            activity_name: "Rust workshop".to_string(),
            reason: None,
            requester_name: "Alex Carter".to_string(),
            university_id: "44100123".to_string(),
            email: "alex@example.com".to_string(),
            contact_number: "0501234567".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_booking_request(&request(), today()).is_ok());
    }

    #[test]
    fn test_club_president_needs_club_name() {
        let mut r = request();
        r.club_name = "  ".to_string();
        assert!(validate_booking_request(&r, today()).is_err());
    }

    #[test]
    fn test_student_needs_reason() {
        let mut r = request();
        r.requester_type = RequesterType::Student;
        r.club_name = String::new();
        assert!(validate_booking_request(&r, today()).is_err());
        r.reason = Some("Exam preparation".to_string());
        assert!(validate_booking_request(&r, today()).is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let mut r = request();
        r.email = "not-an-email".to_string();
        assert!(validate_booking_request(&r, today()).is_err());
    }

    #[test]
    fn test_date_in_past() {
        let mut r = request();
        r.date = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert!(validate_booking_request(&r, today()).is_err());
    }

    #[test]
    fn test_missing_contact_fields() {
        let mut r = request();
        r.requester_name = String::new();
        assert!(validate_booking_request(&r, today()).is_err());
        let mut r = request();
        r.contact_number = String::new();
        assert!(validate_booking_request(&r, today()).is_err());
    }
}
