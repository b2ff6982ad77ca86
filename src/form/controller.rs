use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::validation::ValidationError;

/// Path of one draft field, using wire naming: a flat key (`title`) or a
/// single-level dotted key (`address.city`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey {
    group: Option<&'static str>,
    name: &'static str,
}

impl FieldKey {
    pub const fn new(name: &'static str) -> Self {
        Self { group: None, name }
    }

    pub const fn nested(group: &'static str, name: &'static str) -> Self {
        Self {
            group: Some(group),
            name,
        }
    }

    pub const fn leaf(self) -> &'static str {
        self.name
    }

    pub const fn group(self) -> Option<&'static str> {
        self.group
    }

    pub fn path(self) -> String {
        self.to_string()
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(group) = self.group {
            f.write_str(group)?;
            f.write_str(".")?;
        }
        f.write_str(self.name)
    }
}

/// Lifecycle of one submission attempt. The draft itself is never dropped on
/// failure; only a completed submit resets it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// What a call to [`FormController::submit_async`] did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Whole-form validation failed; nothing was sent and the submit state
    /// did not move.
    Blocked,
    /// Another submission is still in flight; this call was a no-op.
    AlreadyInFlight,
    /// The submit action resolved successfully and the draft was reset.
    Completed,
    /// The submit action failed; the draft is retained for retry.
    Rejected(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub validate_first_error_only: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnChange,
            validate_first_error_only: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMeta<E> {
    pub dirty: bool,
    pub touched: bool,
    pub errors: Vec<E>,
}

impl<E> Default for FieldMeta<E> {
    fn default() -> Self {
        Self {
            dirty: false,
            touched: false,
            errors: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    InvalidStateTransition { from: SubmitState, to: SubmitState },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::InvalidStateTransition { from, to } => {
                write!(f, "invalid submit state transition: {from:?} -> {to:?}")
            }
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type SyncFieldValidatorFn<T, E> = Arc<dyn Fn(&T) -> Result<(), E> + Send + Sync>;
pub(super) type SyncFormValidatorFn<T, E> = Arc<dyn Fn(&T) -> Vec<(FieldKey, E)> + Send + Sync>;

pub(super) struct FormState<T, E> {
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) dirty_fields: BTreeSet<FieldKey>,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
    pub(super) first_error: Option<FieldKey>,
}

impl<T, E> FormState<T, E> {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta<E> {
        self.field_meta.entry(key).or_default()
    }
}

/// Owns one draft and its submission lifecycle. Cloning shares the same
/// underlying state, so a UI shell can hand handles to individual inputs.
#[derive(Clone)]
pub struct FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) field_validators: Arc<RwLock<BTreeMap<FieldKey, Vec<SyncFieldValidatorFn<T, E>>>>>,
    pub(super) form_validators: Arc<RwLock<Vec<SyncFormValidatorFn<T, E>>>>,
    pub(super) dependencies: Arc<RwLock<BTreeMap<FieldKey, BTreeSet<FieldKey>>>>,
    pub(super) required_fields: Arc<RwLock<BTreeSet<FieldKey>>>,
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn new(initial: T, options: FormOptions) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                initial_model: initial.clone(),
                model: initial,
                submit_state: SubmitState::Idle,
                submit_count: 0,
                dirty_fields: BTreeSet::new(),
                field_meta: BTreeMap::new(),
                first_error: None,
            })),
            field_validators: Arc::new(RwLock::new(BTreeMap::new())),
            form_validators: Arc::new(RwLock::new(Vec::new())),
            dependencies: Arc::new(RwLock::new(BTreeMap::new())),
            required_fields: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    pub fn register_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: super::validation::FieldLens<T>,
    {
        let mut required = write_lock(&self.required_fields, "registering required field")?;
        required.insert(lens.key());
        Ok(())
    }

    pub fn unregister_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: super::validation::FieldLens<T>,
    {
        let mut required = write_lock(&self.required_fields, "unregistering required field")?;
        required.remove(&lens.key());
        Ok(())
    }

    pub fn is_required<L>(&self, lens: L) -> FormResult<bool>
    where
        L: super::validation::FieldLens<T>,
    {
        Ok(read_lock(&self.required_fields, "reading required fields")?.contains(&lens.key()))
    }

    /// Runs one submission attempt end to end.
    ///
    /// Whole-form validation gates the attempt: an invalid draft issues no
    /// request and leaves the submit state untouched. While a previous
    /// attempt is still in flight the call is a no-op. The submit action
    /// receives a snapshot of the draft; on success the draft resets to its
    /// initial shape, on rejection it is retained so the user can retry.
    pub async fn submit_async<F, Fut>(&self, f: F) -> FormResult<SubmitOutcome>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.submit_state == SubmitState::Submitting {
                return Ok(SubmitOutcome::AlreadyInFlight);
            }
            state.submit_count = state.submit_count.saturating_add(1);
        }

        if !self.validate_form()? {
            return Ok(SubmitOutcome::Blocked);
        }

        let model = {
            let mut state = write_lock(&self.state, "moving submit state to submitting")?;
            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.model.clone()
        };

        match f(model).await {
            Ok(()) => {
                let mut state = write_lock(&self.state, "completing submit")?;
                transition_submit_state(&mut state, SubmitState::Succeeded)?;
                reset_draft(&mut state);
                Ok(SubmitOutcome::Completed)
            }
            Err(reason) => {
                let mut state = write_lock(&self.state, "recording submit rejection")?;
                transition_submit_state(&mut state, SubmitState::Failed(reason.clone()))?;
                Ok(SubmitOutcome::Rejected(reason))
            }
        }
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?
            .submit_state
            .clone())
    }

    pub fn reset_to_initial(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.submit_state = SubmitState::Idle;
        reset_draft(&mut state);
        Ok(())
    }

    pub fn reset_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: super::validation::FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "resetting field")?;
        let initial_value = lens.get(&state.initial_model).clone();
        lens.set(&mut state.model, initial_value);
        state.dirty_fields.remove(&key);
        let meta = state.ensure_meta(key);
        meta.dirty = false;
        meta.touched = false;
        meta.errors.clear();
        state.first_error = first_error_key(&state.field_meta);
        Ok(())
    }

    pub fn clear_errors(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "clearing all field errors")?;
        for meta in state.field_meta.values_mut() {
            meta.errors.clear();
        }
        state.first_error = None;
        Ok(())
    }

    pub fn clear_field_errors<L>(&self, lens: L) -> FormResult<()>
    where
        L: super::validation::FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "clearing field errors")?;
        if let Some(meta) = state.field_meta.get_mut(&key) {
            meta.errors.clear();
        }
        state.first_error = first_error_key(&state.field_meta);
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        let is_valid = state.field_meta.values().all(|meta| meta.errors.is_empty());
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state.clone(),
            submit_count: state.submit_count,
            is_dirty: !state.dirty_fields.is_empty(),
            is_valid,
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<Option<FieldMeta<E>>>
    where
        L: super::validation::FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&lens.key())
            .cloned())
    }
}

fn reset_draft<T, E>(state: &mut FormState<T, E>)
where
    T: Clone,
{
    state.model = state.initial_model.clone();
    state.dirty_fields.clear();
    state.first_error = None;
    for meta in state.field_meta.values_mut() {
        meta.dirty = false;
        meta.touched = false;
        meta.errors.clear();
    }
}

pub(super) fn transition_submit_state<T, E>(
    state: &mut FormState<T, E>,
    next: SubmitState,
) -> FormResult<()> {
    let allowed = matches!(
        (&state.submit_state, &next),
        (SubmitState::Idle, SubmitState::Submitting)
            | (SubmitState::Succeeded, SubmitState::Submitting)
            | (SubmitState::Failed(_), SubmitState::Submitting)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed(_))
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: state.submit_state.clone(),
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

pub(super) fn first_error_key<E>(
    field_meta: &BTreeMap<FieldKey, FieldMeta<E>>,
) -> Option<FieldKey> {
    field_meta
        .iter()
        .find_map(|(key, meta)| (!meta.errors.is_empty()).then_some(*key))
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
