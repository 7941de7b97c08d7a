use semval::prelude::*;
use serde::Deserialize;

use crate::validation::Describe;

use super::MAX_AMOUNT;

pub const MAX_STOCK: i64 = 1_000_000_000;

#[derive(Clone, Debug, Deserialize)]
pub struct InventoryItemData {
    pub name: String,
    pub unit_price: i64,
    pub stock: i64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InventoryItemInvalidity {
    BlankName,
    NegativePrice,
    PriceTooLarge(i64),
    NegativeStock,
    StockTooLarge(i64),
}

impl Validate for InventoryItemData {
    type Invalidity = InventoryItemInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.name.trim().is_empty(),
                InventoryItemInvalidity::BlankName,
            )
            .invalidate_if(self.unit_price < 0, InventoryItemInvalidity::NegativePrice)
            .invalidate_if(
                self.unit_price > MAX_AMOUNT,
                InventoryItemInvalidity::PriceTooLarge(MAX_AMOUNT),
            )
            .invalidate_if(self.stock < 0, InventoryItemInvalidity::NegativeStock)
            .invalidate_if(
                self.stock > MAX_STOCK,
                InventoryItemInvalidity::StockTooLarge(MAX_STOCK),
            )
            .into()
    }
}

impl Describe for InventoryItemInvalidity {
    fn field(&self) -> &'static str {
        match self {
            Self::BlankName => "name",
            Self::NegativePrice | Self::PriceTooLarge(_) => "unit_price",
            Self::NegativeStock | Self::StockTooLarge(_) => "stock",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BlankName => "Name is required.".to_owned(),
            Self::NegativePrice => "Price may not be negative.".to_owned(),
            Self::PriceTooLarge(max) => format!("Price may not exceed {}.", max),
            Self::NegativeStock => "Stock may not be negative.".to_owned(),
            Self::StockTooLarge(max) => format!("Stock may not exceed {}.", max),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn price_and_stock_are_bounded() {
        let data = InventoryItemData {
            name: "20L Water Can".to_owned(),
            unit_price: i64::MAX / 2,
            stock: i64::MAX,
        };

        let invalidities = data
            .validate()
            .expect_err("item should be invalid")
            .into_iter()
            .collect::<Vec<_>>();

        assert_eq!(
            vec![
                InventoryItemInvalidity::PriceTooLarge(MAX_AMOUNT),
                InventoryItemInvalidity::StockTooLarge(MAX_STOCK),
            ],
            invalidities
        );
    }
}
