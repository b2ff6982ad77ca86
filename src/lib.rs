pub mod api;
pub mod feedback;
pub mod form;
pub mod model;
pub mod schema;
pub mod workflow;

pub use workflow::{CardForm, SignupForm};
