use semval::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

use crate::validation::Describe;

const MAX_MESSAGE_LENGTH: usize = 500;

#[derive(Clone, Debug, Deserialize)]
pub struct ReminderData {
    pub customer_id: Uuid,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReminderInvalidity {
    BlankMessage,
    MessageLength(usize),
}

impl Validate for ReminderData {
    type Invalidity = ReminderInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.message.trim().is_empty(),
                ReminderInvalidity::BlankMessage,
            )
            .invalidate_if(
                self.message.chars().count() > MAX_MESSAGE_LENGTH,
                ReminderInvalidity::MessageLength(MAX_MESSAGE_LENGTH),
            )
            .into()
    }
}

impl Describe for ReminderInvalidity {
    fn field(&self) -> &'static str {
        "message"
    }

    fn message(&self) -> String {
        match self {
            Self::BlankMessage => "Message is required.".to_owned(),
            Self::MessageLength(max) => {
                format!("Messages may not be longer than {} characters.", max)
            }
        }
    }
}
