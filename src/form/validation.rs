use std::collections::{BTreeMap, BTreeSet};

use super::controller::{
    FieldKey, FormController, FormResult, SyncFieldValidatorFn, SyncFormValidatorFn,
    ValidationMode, first_error_key, read_lock, write_lock,
};

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> String;
}

/// Typed access to one field of a draft. Lens keys double as wire paths, so
/// a lens over `address.city` reports errors under that exact key.
pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);

    /// Composes this lens with a lens over its value, producing a dotted
    /// key such as `address.city`.
    fn then<I>(self, inner: I) -> NestedLens<Self, I>
    where
        I: FieldLens<Self::Value>,
    {
        NestedLens { outer: self, inner }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct NestedLens<O, I> {
    outer: O,
    inner: I,
}

impl<T, O, I> FieldLens<T> for NestedLens<O, I>
where
    O: FieldLens<T>,
    I: FieldLens<O::Value>,
{
    type Value = I::Value;

    fn key(self) -> FieldKey {
        FieldKey::nested(self.outer.key().leaf(), self.inner.key().leaf())
    }

    fn get<'a>(self, model: &'a T) -> &'a Self::Value {
        self.inner.get(self.outer.get(model))
    }

    fn set(self, model: &mut T, value: Self::Value) {
        let mut group = self.outer.get(model).clone();
        self.inner.set(&mut group, value);
        self.outer.set(model, group);
    }
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

pub trait FormValidator<T, E>: Send + Sync
where
    E: ValidationError,
{
    fn validate(&self, model: &T) -> Vec<(FieldKey, E)>;
}

impl<T, E, F> FormValidator<T, E> for F
where
    E: ValidationError,
    F: Fn(&T) -> Vec<(FieldKey, E)> + Send + Sync,
{
    fn validate(&self, model: &T) -> Vec<(FieldKey, E)> {
        (self)(model)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let key = lens.key();
        let validator = std::sync::Arc::new(validator);
        let wrapped: SyncFieldValidatorFn<T, E> =
            std::sync::Arc::new(move |model: &T| validator.validate(model, lens.get(model)));
        let mut validators = write_lock(&self.field_validators, "registering field validator")?;
        validators.entry(key).or_default().push(wrapped);
        Ok(())
    }

    pub fn register_form_validator<V>(&self, validator: V) -> FormResult<()>
    where
        V: FormValidator<T, E> + 'static,
    {
        let validator = std::sync::Arc::new(validator);
        let wrapped: SyncFormValidatorFn<T, E> =
            std::sync::Arc::new(move |model: &T| validator.validate(model));
        let mut validators = write_lock(&self.form_validators, "registering form validator")?;
        validators.push(wrapped);
        Ok(())
    }

    /// Declares that editing `source` must revalidate `dependent`, e.g.
    /// changing the password re-checks the confirmation field.
    pub fn register_dependency<S, D>(&self, source: S, dependent: D) -> FormResult<()>
    where
        S: FieldLens<T>,
        D: FieldLens<T>,
    {
        let mut dependencies = write_lock(&self.dependencies, "registering dependency")?;
        dependencies
            .entry(source.key())
            .or_default()
            .insert(dependent.key());
        Ok(())
    }

    /// Writes one field of the draft. In `OnChange` mode the field and its
    /// registered dependents revalidate immediately, so validation results
    /// are always current relative to the latest draft.
    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "writing form model")?;
            lens.set(&mut state.model, value);
            let is_dirty = lens.get(&state.model) != lens.get(&state.initial_model);
            if is_dirty {
                state.dirty_fields.insert(key);
            } else {
                state.dirty_fields.remove(&key);
            }
            state.ensure_meta(key).dirty = is_dirty;
        }

        if self.options.validate_mode == ValidationMode::OnChange {
            let _ = self.validate_field_by_key(key)?;
            self.revalidate_dependents(key)?;
        }
        Ok(())
    }

    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "touching field")?;
        state.ensure_meta(key).touched = true;
        Ok(())
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        self.validate_field_by_key(lens.key())
    }

    /// Runs every registered validator and records the per-field results.
    /// Returns whether the whole draft passed.
    pub fn validate_form(&self) -> FormResult<bool> {
        let model = {
            read_lock(&self.state, "reading model for form validation")?
                .model
                .clone()
        };
        let field_validators = read_lock(
            &self.field_validators,
            "reading field validators for form validation",
        )?
        .clone();
        let form_validators = read_lock(
            &self.form_validators,
            "reading form validators for form validation",
        )?
        .clone();

        let mut field_errors = BTreeMap::<FieldKey, Vec<E>>::new();
        for (key, validators) in field_validators {
            let mut errors = Vec::new();
            for validator in validators {
                if let Err(error) = validator(&model) {
                    errors.push(error);
                    if self.options.validate_first_error_only {
                        break;
                    }
                }
            }
            field_errors.insert(key, errors);
        }

        for validator in form_validators {
            for (key, error) in validator(&model) {
                field_errors.entry(key).or_default().push(error);
            }
        }

        {
            let mut state = write_lock(&self.state, "applying form validation result")?;
            let mut keys = state
                .field_meta
                .keys()
                .copied()
                .collect::<BTreeSet<FieldKey>>();
            keys.extend(field_errors.keys().copied());
            for key in keys {
                let meta = state.ensure_meta(key);
                meta.errors = field_errors.remove(&key).unwrap_or_default();
            }
            state.first_error = first_error_key(&state.field_meta);
        }

        Ok(self.snapshot()?.is_valid)
    }

    /// Non-mutating whole-form check: runs every validator against the
    /// current draft without recording results. This backs the submit
    /// trigger's disabled state, independent of the guard inside submit.
    pub fn check_form(&self) -> FormResult<bool> {
        let model = {
            read_lock(&self.state, "reading model for form check")?
                .model
                .clone()
        };
        let field_validators =
            read_lock(&self.field_validators, "reading field validators for check")?.clone();
        for validators in field_validators.values() {
            for validator in validators {
                if validator(&model).is_err() {
                    return Ok(false);
                }
            }
        }
        let form_validators =
            read_lock(&self.form_validators, "reading form validators for check")?.clone();
        for validator in form_validators {
            if !validator(&model).is_empty() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<bool> {
        let model = {
            read_lock(&self.state, "reading model for field validation")?
                .model
                .clone()
        };
        let validators = {
            read_lock(
                &self.field_validators,
                "reading field validators for key validation",
            )?
            .get(&key)
            .cloned()
            .unwrap_or_default()
        };

        let mut errors = Vec::new();
        for validator in validators {
            if let Err(error) = validator(&model) {
                errors.push(error);
                if self.options.validate_first_error_only {
                    break;
                }
            }
        }

        let mut state = write_lock(&self.state, "writing field validation result")?;
        let meta = state.ensure_meta(key);
        meta.errors = errors;
        state.first_error = first_error_key(&state.field_meta);
        Ok(state
            .field_meta
            .get(&key)
            .is_none_or(|m| m.errors.is_empty()))
    }

    pub(super) fn revalidate_dependents(&self, source: FieldKey) -> FormResult<()> {
        let dependents = read_lock(&self.dependencies, "reading field dependencies")?
            .get(&source)
            .cloned()
            .unwrap_or_default();
        for dependent in dependents {
            let _ = self.validate_field_by_key(dependent)?;
        }
        Ok(())
    }
}
