use semval::prelude::*;
use serde::Deserialize;

use crate::validation::Describe;

use super::{check_mobile, MobileInvalidity, MAX_AMOUNT};

pub const MAX_DELIVERY_FREQUENCY_DAYS: u32 = 365;

/// Editable customer details.
#[derive(Clone, Debug, Deserialize)]
pub struct CustomerData {
    pub name: String,
    pub address: String,
    pub mobile: String,
    pub delivery_frequency_days: u32,
}

/// Details for a customer being added to the books.
#[derive(Clone, Debug, Deserialize)]
pub struct NewCustomerData {
    #[serde(flatten)]
    pub details: CustomerData,
    /// Balance carried over from before the customer was entered.
    #[serde(default)]
    pub opening_balance: i64,
    #[serde(default)]
    pub empty_bottles_held: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CustomerInvalidity {
    BlankName,
    BlankAddress,
    Mobile(MobileInvalidity),
    /// Deliveries must be at least one day apart.
    DeliveryFrequency,
    DeliveryFrequencyTooLong(u32),
    OpeningBalanceTooLarge(i64),
}

impl Validate for CustomerData {
    type Invalidity = CustomerInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let mut context = ValidationContext::new()
            .invalidate_if(self.name.trim().is_empty(), CustomerInvalidity::BlankName)
            .invalidate_if(
                self.address.trim().is_empty(),
                CustomerInvalidity::BlankAddress,
            )
            .invalidate_if(
                self.delivery_frequency_days == 0,
                CustomerInvalidity::DeliveryFrequency,
            )
            .invalidate_if(
                self.delivery_frequency_days > MAX_DELIVERY_FREQUENCY_DAYS,
                CustomerInvalidity::DeliveryFrequencyTooLong(MAX_DELIVERY_FREQUENCY_DAYS),
            );

        if let Some(invalidity) = check_mobile(&self.mobile) {
            context = context.invalidate(CustomerInvalidity::Mobile(invalidity));
        }

        context.into()
    }
}

impl Validate for NewCustomerData {
    type Invalidity = CustomerInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .validate_with(&self.details, |invalidity| invalidity)
            .invalidate_if(
                self.opening_balance.checked_abs().map_or(true, |b| b > MAX_AMOUNT),
                CustomerInvalidity::OpeningBalanceTooLarge(MAX_AMOUNT),
            )
            .into()
    }
}

impl Describe for CustomerInvalidity {
    fn field(&self) -> &'static str {
        match self {
            Self::BlankName => "name",
            Self::BlankAddress => "address",
            Self::Mobile(_) => "mobile",
            Self::DeliveryFrequency | Self::DeliveryFrequencyTooLong(_) => {
                "delivery_frequency_days"
            }
            Self::OpeningBalanceTooLarge(_) => "opening_balance",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BlankName => "Name is required.".to_owned(),
            Self::BlankAddress => "Address is required.".to_owned(),
            Self::Mobile(invalidity) => invalidity.message(),
            Self::DeliveryFrequency => "Delivery frequency must be at least one day.".to_owned(),
            Self::DeliveryFrequencyTooLong(max) => {
                format!("Delivery frequency may not exceed {} days.", max)
            }
            Self::OpeningBalanceTooLarge(max) => {
                format!("Opening balance must be between -{} and {}.", max, max)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_customer() {
        let data = CustomerData {
            name: "Green Valley Cafe".to_owned(),
            address: "12 Market Road".to_owned(),
            mobile: "9876543210".to_owned(),
            delivery_frequency_days: 3,
        };

        data.validate().expect("customer should be valid");
    }

    #[test]
    fn everything_missing() {
        let data = CustomerData {
            name: " ".to_owned(),
            address: "".to_owned(),
            mobile: "call me".to_owned(),
            delivery_frequency_days: 0,
        };

        let invalidities = data
            .validate()
            .expect_err("customer should be invalid")
            .into_iter()
            .collect::<Vec<_>>();

        assert_eq!(
            vec![
                CustomerInvalidity::BlankName,
                CustomerInvalidity::BlankAddress,
                CustomerInvalidity::DeliveryFrequency,
                CustomerInvalidity::Mobile(MobileInvalidity::InvalidCharacters),
            ],
            invalidities
        );
    }

    #[test]
    fn delivery_frequency_is_capped() {
        let data = CustomerData {
            name: "Green Valley Cafe".to_owned(),
            address: "12 Market Road".to_owned(),
            mobile: "9876543210".to_owned(),
            delivery_frequency_days: u32::MAX,
        };

        let invalidities = data
            .validate()
            .expect_err("customer should be invalid")
            .into_iter()
            .collect::<Vec<_>>();

        assert_eq!(
            vec![CustomerInvalidity::DeliveryFrequencyTooLong(
                MAX_DELIVERY_FREQUENCY_DAYS
            )],
            invalidities
        );
    }

    #[test]
    fn opening_balance_is_bounded() {
        let details = CustomerData {
            name: "Green Valley Cafe".to_owned(),
            address: "12 Market Road".to_owned(),
            mobile: "9876543210".to_owned(),
            delivery_frequency_days: MAX_DELIVERY_FREQUENCY_DAYS,
        };

        for opening_balance in [MAX_AMOUNT, -MAX_AMOUNT] {
            NewCustomerData {
                details: details.clone(),
                opening_balance,
                empty_bottles_held: 0,
            }
            .validate()
            .expect("bound should be accepted");
        }

        for opening_balance in [MAX_AMOUNT + 1, i64::MIN] {
            let invalidities = NewCustomerData {
                details: details.clone(),
                opening_balance,
                empty_bottles_held: 0,
            }
            .validate()
            .expect_err("opening balance should be rejected")
            .into_iter()
            .collect::<Vec<_>>();

            assert_eq!(
                vec![CustomerInvalidity::OpeningBalanceTooLarge(MAX_AMOUNT)],
                invalidities
            );
        }
    }

    #[test]
    fn new_customer_flattens_details() {
        let data: NewCustomerData = serde_json::from_str(
            r#"{
                "name": "Green Valley Cafe",
                "address": "12 Market Road",
                "mobile": "9876543210",
                "delivery_frequency_days": 3,
                "opening_balance": 1500
            }"#,
        )
        .expect("should deserialize");

        assert_eq!("Green Valley Cafe", data.details.name);
        assert_eq!(1500, data.opening_balance);
        assert_eq!(0, data.empty_bottles_held);
    }
}
