//! The two form workflows the bizcard client ships. Both are instances of
//! the same pattern: a controller carrying the entity schema, gated
//! submission, and success/failure side effects at the boundary.

mod card;
mod signup;

#[cfg(test)]
mod tests;

pub use card::{CARD_CREATE_FAILED_MESSAGE, CARD_CREATED_MESSAGE, CardForm};
pub use signup::{SIGNUP_COMPLETED_MESSAGE, SIGNUP_FAILED_MESSAGE, SignupForm};
