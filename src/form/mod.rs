mod binding;
mod controller;
mod validation;


pub use bizcard_form_derive::FormModel;
pub use binding::EmptyValue;
pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormOptions, FormResult, FormSnapshot,
    SubmitOutcome, SubmitState, ValidationMode,
};
pub use validation::{FieldLens, FieldValidator, FormModel, FormValidator, NestedLens, ValidationError};
