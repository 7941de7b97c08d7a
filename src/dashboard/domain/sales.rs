use chrono::{DateTime, Utc};
use semval::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

use crate::{dashboard::models::PaymentMethod, validation::Describe};

use super::MAX_AMOUNT;

/// A product sale entered at the counter or by a salesman.
#[derive(Clone, Debug, Deserialize)]
pub struct SaleData {
    pub customer_id: Uuid,
    pub salesman_id: Option<Uuid>,
    pub inventory_item_id: Uuid,
    pub quantity: u32,
    /// The amount charged. Defaults to the item's unit price times the
    /// quantity.
    pub amount: Option<i64>,
    #[serde(default)]
    pub amount_received: i64,
    #[serde(default)]
    pub empties_collected: u32,
    pub date: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
}

/// A payment received without a sale.
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentData {
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub salesman_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Replacement values for an existing sale or payment.
#[derive(Clone, Debug, Deserialize)]
pub struct SaleUpdateData {
    pub salesman_id: Option<Uuid>,
    pub quantity: u32,
    pub amount: i64,
    pub amount_received: i64,
    #[serde(default)]
    pub empties_collected: u32,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmptiesCollectionData {
    pub count: u32,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClearBalanceData {
    #[serde(default = "default_payment_method")]
    pub payment_method: PaymentMethod,
    pub date: Option<DateTime<Utc>>,
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Cash
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SaleInvalidity {
    ZeroQuantity,
    NegativeAmount,
    NegativeAmountReceived,
    /// An amount above [`MAX_AMOUNT`], including a default amount computed
    /// from the item's price.
    AmountTooLarge(i64),
    AmountReceivedTooLarge(i64),
    /// The entry would push the customer's balance out of range.
    BalanceOutOfRange,
    /// A payment must receive a positive amount.
    NonPositivePayment,
    ZeroEmpties,
    /// More was sold than is in stock. The value is the available stock.
    InsufficientStock(i64),
}

impl Validate for SaleData {
    type Invalidity = SaleInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.quantity == 0, SaleInvalidity::ZeroQuantity)
            .invalidate_if(
                self.amount.map(|a| a < 0).unwrap_or(false),
                SaleInvalidity::NegativeAmount,
            )
            .invalidate_if(
                self.amount.map(|a| a > MAX_AMOUNT).unwrap_or(false),
                SaleInvalidity::AmountTooLarge(MAX_AMOUNT),
            )
            .invalidate_if(
                self.amount_received < 0,
                SaleInvalidity::NegativeAmountReceived,
            )
            .invalidate_if(
                self.amount_received > MAX_AMOUNT,
                SaleInvalidity::AmountReceivedTooLarge(MAX_AMOUNT),
            )
            .into()
    }
}

impl Validate for PaymentData {
    type Invalidity = SaleInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.amount <= 0, SaleInvalidity::NonPositivePayment)
            .invalidate_if(
                self.amount > MAX_AMOUNT,
                SaleInvalidity::AmountTooLarge(MAX_AMOUNT),
            )
            .into()
    }
}

impl Validate for SaleUpdateData {
    type Invalidity = SaleInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.amount < 0, SaleInvalidity::NegativeAmount)
            .invalidate_if(
                self.amount > MAX_AMOUNT,
                SaleInvalidity::AmountTooLarge(MAX_AMOUNT),
            )
            .invalidate_if(
                self.amount_received < 0,
                SaleInvalidity::NegativeAmountReceived,
            )
            .invalidate_if(
                self.amount_received > MAX_AMOUNT,
                SaleInvalidity::AmountReceivedTooLarge(MAX_AMOUNT),
            )
            .into()
    }
}

impl Validate for EmptiesCollectionData {
    type Invalidity = SaleInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.count == 0, SaleInvalidity::ZeroEmpties)
            .into()
    }
}

impl Describe for SaleInvalidity {
    fn field(&self) -> &'static str {
        match self {
            Self::ZeroQuantity | Self::InsufficientStock(_) => "quantity",
            Self::NegativeAmount
            | Self::NonPositivePayment
            | Self::AmountTooLarge(_)
            | Self::BalanceOutOfRange => "amount",
            Self::NegativeAmountReceived | Self::AmountReceivedTooLarge(_) => "amount_received",
            Self::ZeroEmpties => "count",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::ZeroQuantity => "Quantity must be at least one.".to_owned(),
            Self::NegativeAmount => "Amount may not be negative.".to_owned(),
            Self::NegativeAmountReceived => "Amount received may not be negative.".to_owned(),
            Self::AmountTooLarge(max) => format!("Amount may not exceed {}.", max),
            Self::AmountReceivedTooLarge(max) => {
                format!("Amount received may not exceed {}.", max)
            }
            Self::BalanceOutOfRange => {
                "This entry would take the customer's balance out of range.".to_owned()
            }
            Self::NonPositivePayment => "Payments must be greater than zero.".to_owned(),
            Self::ZeroEmpties => "At least one empty must be collected.".to_owned(),
            Self::InsufficientStock(available) => {
                format!("Only {} left in stock.", available)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sale_with_zero_quantity() {
        let data = SaleData {
            customer_id: Uuid::new_v4(),
            salesman_id: None,
            inventory_item_id: Uuid::new_v4(),
            quantity: 0,
            amount: Some(-5),
            amount_received: 0,
            empties_collected: 0,
            date: None,
            payment_method: PaymentMethod::Cash,
            description: None,
        };

        let invalidities = data
            .validate()
            .expect_err("sale should be invalid")
            .into_iter()
            .collect::<Vec<_>>();

        assert_eq!(
            vec![SaleInvalidity::ZeroQuantity, SaleInvalidity::NegativeAmount],
            invalidities
        );
    }

    #[test]
    fn payment_must_be_positive() {
        let data = PaymentData {
            amount: 0,
            payment_method: PaymentMethod::Bank,
            salesman_id: None,
            date: None,
            description: None,
        };

        assert!(data.validate().is_err());
    }

    #[test]
    fn amounts_are_bounded() {
        let data = SaleUpdateData {
            salesman_id: None,
            quantity: 1,
            amount: MAX_AMOUNT + 1,
            amount_received: i64::MAX,
            empties_collected: 0,
            date: Utc::now(),
            payment_method: PaymentMethod::Cash,
            description: None,
        };

        let invalidities = data
            .validate()
            .expect_err("update should be invalid")
            .into_iter()
            .collect::<Vec<_>>();

        assert_eq!(
            vec![
                SaleInvalidity::AmountTooLarge(MAX_AMOUNT),
                SaleInvalidity::AmountReceivedTooLarge(MAX_AMOUNT),
            ],
            invalidities
        );
    }

    #[test]
    fn clear_balance_defaults_to_cash() {
        let data: ClearBalanceData = serde_json::from_str("{}").expect("should deserialize");

        assert_eq!(PaymentMethod::Cash, data.payment_method);
    }
}
