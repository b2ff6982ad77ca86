//! Declarative validation for the two bizcard forms.
//!
//! `rules` holds the reusable field checks; `card` and `signup` install the
//! per-entity schemas onto a form controller. Both schemas support partial
//! (per-field) and whole-form validation through the controller.

pub mod rules;

mod card;
mod signup;

pub use card::apply_card_schema;
pub use signup::apply_signup_schema;

use crate::form::ValidationError;

/// A schema rule rejection with its user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleError(String);

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl ValidationError for RuleError {
    fn message(&self) -> String {
        self.0.clone()
    }
}
