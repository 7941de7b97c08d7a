use crate::authentication::models::{CounterSession, CurrentAdmin};

/// Who is currently using the console.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveRole {
    Admin(CurrentAdmin),
    Counter(CounterSession),
    /// Nobody is logged in; the client should fall back to role selection.
    None,
}

impl ActiveRole {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Admin(_) => Some("admin"),
            Self::Counter(_) => Some("counter"),
            Self::None => None,
        }
    }
}
