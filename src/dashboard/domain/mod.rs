//! Input validation for dashboard records.

pub mod customers;
pub mod inventory;
pub mod reminders;
pub mod sales;
pub mod salesmen;

/// Largest amount a single price, sale, payment or opening balance may carry,
/// in minor currency units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

const MIN_MOBILE_DIGITS: usize = 7;
const MAX_MOBILE_DIGITS: usize = 15;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MobileInvalidity {
    /// Only digits, spaces, dashes and a leading `+` are allowed.
    InvalidCharacters,
    DigitCount { min: usize, max: usize },
}

/// Validate a phone number the way it is typed at the counter, for example
/// `+91 98765-43210`.
pub fn check_mobile(mobile: &str) -> Option<MobileInvalidity> {
    let body = mobile.trim().strip_prefix('+').unwrap_or_else(|| mobile.trim());

    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Some(MobileInvalidity::InvalidCharacters);
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(MIN_MOBILE_DIGITS..=MAX_MOBILE_DIGITS).contains(&digits) {
        return Some(MobileInvalidity::DigitCount {
            min: MIN_MOBILE_DIGITS,
            max: MAX_MOBILE_DIGITS,
        });
    }

    None
}

impl MobileInvalidity {
    pub fn message(&self) -> String {
        match self {
            Self::InvalidCharacters => {
                "Mobile numbers may only contain digits, spaces, dashes and a leading '+'."
                    .to_owned()
            }
            Self::DigitCount { min, max } => {
                format!("Mobile numbers must contain {} to {} digits.", min, max)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_common_formats() {
        for mobile in ["9876543210", "+91 98765-43210", "555 0100"] {
            assert_eq!(None, check_mobile(mobile), "{:?} should be valid", mobile);
        }
    }

    #[test]
    fn rejects_letters() {
        assert_eq!(
            Some(MobileInvalidity::InvalidCharacters),
            check_mobile("98765abc10")
        );
    }

    #[test]
    fn rejects_short_numbers() {
        assert!(matches!(
            check_mobile("12345"),
            Some(MobileInvalidity::DigitCount { .. })
        ));
    }
}
