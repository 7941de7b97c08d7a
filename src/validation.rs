use std::{collections::BTreeMap, fmt::Debug};

use semval::context::Context;
use serde::Serialize;

/// An invalidity that can be reported against a named input field.
pub trait Describe {
    /// The input field the invalidity belongs to.
    fn field(&self) -> &'static str;

    /// A human readable explanation.
    fn message(&self) -> String;
}

/// Validation messages grouped by input field.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn from_context<V>(context: Context<V>) -> Self
    where
        V: Describe + Debug + 'static,
    {
        let mut errors = Self::new();

        for invalidity in context.into_iter() {
            errors.push(invalidity.field(), invalidity.message());
        }

        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl From<(&'static str, &str)> for FieldErrors {
    fn from((field, message): (&'static str, &str)) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);

        errors
    }
}
