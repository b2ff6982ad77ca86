use super::controller::{FieldKey, FormController, FormResult, SubmitState, read_lock};
use super::validation::{FieldLens, ValidationError};

/// Raw emptiness check used for the `*Required` hint. This is deliberately
/// independent of schema validation: the hint clears the moment the raw
/// value is non-empty, whether or not the schema error has cleared.
pub trait EmptyValue {
    fn is_empty_value(&self) -> bool;
}

impl EmptyValue for String {
    fn is_empty_value(&self) -> bool {
        self.trim().is_empty()
    }
}

impl EmptyValue for u32 {
    fn is_empty_value(&self) -> bool {
        *self == 0
    }
}

impl EmptyValue for bool {
    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl<T> EmptyValue for Option<T>
where
    T: EmptyValue,
{
    fn is_empty_value(&self) -> bool {
        self.as_ref().is_none_or(EmptyValue::is_empty_value)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Error message a field should render right now. Errors stay hidden
    /// until the field was touched or a submit was attempted.
    pub fn field_error<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<T>,
    {
        self.display_error_message(lens.key())
    }

    /// Whether the `*Required` hint should render for a field: the field is
    /// registered as required and its raw value is empty or zero.
    pub fn shows_required_hint<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
        L::Value: EmptyValue,
    {
        if !self.is_required(lens)? {
            return Ok(false);
        }
        let state = read_lock(&self.state, "reading value for required hint")?;
        Ok(lens.get(&state.model).is_empty_value())
    }

    /// Current value of a field, for rendering.
    pub fn value<L>(&self, lens: L) -> FormResult<L::Value>
    where
        L: FieldLens<T>,
    {
        let state = read_lock(&self.state, "reading field value")?;
        Ok(lens.get(&state.model).clone())
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading submitting flag")?.submit_state
            == SubmitState::Submitting)
    }

    /// Whether the submit trigger should be enabled. This mirrors the guard
    /// inside `submit_async`; the two checks are layered on purpose.
    pub fn submit_allowed(&self) -> FormResult<bool> {
        if self.is_submitting()? {
            return Ok(false);
        }
        self.check_form()
    }

    fn display_error_message(&self, key: FieldKey) -> FormResult<Option<String>> {
        let state = read_lock(&self.state, "reading display error message")?;
        let Some(meta) = state.field_meta.get(&key) else {
            return Ok(None);
        };
        if !meta.touched && state.submit_count == 0 {
            return Ok(None);
        }
        Ok(meta.errors.first().map(ValidationError::message))
    }
}
