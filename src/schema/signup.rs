use super::{RuleError, rules};
use crate::form::{FieldLens, FormController, FormModel, FormResult};
use crate::model::{AddressDraft, ImageDraft, NameDraft, SignupDraft};

/// Installs the signup schema, including the cross-field rule that the
/// confirmation must match the password; editing the password re-checks the
/// confirmation through a registered dependency.
pub fn apply_signup_schema(form: &FormController<SignupDraft, RuleError>) -> FormResult<()> {
    let fields = SignupDraft::fields();
    let name = NameDraft::fields();
    let image = ImageDraft::fields();
    let address = AddressDraft::fields();

    form.register_field_validator(
        fields.name().then(name.first()),
        |_: &SignupDraft, value: &String| rules::length_between(value, "First name", 2, 256),
    )?;
    form.register_field_validator(
        fields.name().then(name.middle()),
        |_: &SignupDraft, value: &String| {
            rules::optional_length_between(value, "Middle name", 2, 256)
        },
    )?;
    form.register_field_validator(
        fields.name().then(name.last()),
        |_: &SignupDraft, value: &String| rules::length_between(value, "Last name", 2, 256),
    )?;
    form.register_field_validator(fields.phone(), |_: &SignupDraft, value: &String| {
        rules::phone(value)
    })?;
    form.register_field_validator(fields.email(), |_: &SignupDraft, value: &String| {
        rules::email(value)
    })?;
    form.register_field_validator(fields.password(), |_: &SignupDraft, value: &String| {
        rules::password(value)
    })?;
    form.register_field_validator(
        fields.confirm_password(),
        |model: &SignupDraft, value: &String| {
            rules::matches_other(value, &model.password, "Passwords do not match")
        },
    )?;
    form.register_dependency(fields.password(), fields.confirm_password())?;

    form.register_field_validator(
        fields.image().then(image.url()),
        |_: &SignupDraft, value: &String| rules::optional_uri(value, "Image URL"),
    )?;
    form.register_field_validator(
        fields.image().then(image.alt()),
        |_: &SignupDraft, value: &String| {
            rules::optional_length_between(value, "Image alt", 2, 256)
        },
    )?;
    form.register_field_validator(
        fields.address().then(address.state()),
        |_: &SignupDraft, value: &String| rules::optional_length_between(value, "State", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.country()),
        |_: &SignupDraft, value: &String| rules::length_between(value, "Country", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.city()),
        |_: &SignupDraft, value: &String| rules::length_between(value, "City", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.street()),
        |_: &SignupDraft, value: &String| rules::length_between(value, "Street", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.house_number()),
        |_: &SignupDraft, value: &u32| rules::min_number(*value, 1, "House number"),
    )?;
    form.register_field_validator(
        fields.address().then(address.zip()),
        |_: &SignupDraft, value: &u32| rules::min_number(*value, 1, "Zip code"),
    )?;

    form.register_required_field(fields.name().then(name.first()))?;
    form.register_required_field(fields.name().then(name.last()))?;
    form.register_required_field(fields.phone())?;
    form.register_required_field(fields.email())?;
    form.register_required_field(fields.password())?;
    form.register_required_field(fields.confirm_password())?;
    form.register_required_field(fields.address().then(address.country()))?;
    form.register_required_field(fields.address().then(address.city()))?;
    form.register_required_field(fields.address().then(address.street()))?;
    form.register_required_field(fields.address().then(address.house_number()))?;
    form.register_required_field(fields.address().then(address.zip()))?;

    Ok(())
}
