use semval::prelude::*;
use serde::Deserialize;

use crate::validation::Describe;

use super::{check_mobile, MobileInvalidity};

#[derive(Clone, Debug, Deserialize)]
pub struct SalesmanData {
    pub name: String,
    pub mobile: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SalesmanInvalidity {
    BlankName,
    Mobile(MobileInvalidity),
}

impl Validate for SalesmanData {
    type Invalidity = SalesmanInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let mut context = ValidationContext::new()
            .invalidate_if(self.name.trim().is_empty(), SalesmanInvalidity::BlankName);

        if let Some(invalidity) = check_mobile(&self.mobile) {
            context = context.invalidate(SalesmanInvalidity::Mobile(invalidity));
        }

        context.into()
    }
}

impl Describe for SalesmanInvalidity {
    fn field(&self) -> &'static str {
        match self {
            Self::BlankName => "name",
            Self::Mobile(_) => "mobile",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BlankName => "Name is required.".to_owned(),
            Self::Mobile(invalidity) => invalidity.message(),
        }
    }
}
