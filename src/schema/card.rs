use super::{RuleError, rules};
use crate::form::{FieldLens, FormController, FormModel, FormResult};
use crate::model::{AddressDraft, CardDraft, ImageDraft};

/// Installs the card schema: validators for every field plus the set of
/// fields that render the `*Required` hint.
pub fn apply_card_schema(form: &FormController<CardDraft, RuleError>) -> FormResult<()> {
    let fields = CardDraft::fields();
    let image = ImageDraft::fields();
    let address = AddressDraft::fields();

    form.register_field_validator(fields.title(), |_: &CardDraft, value: &String| {
        rules::length_between(value, "Title", 2, 256)
    })?;
    form.register_field_validator(fields.subtitle(), |_: &CardDraft, value: &String| {
        rules::length_between(value, "Subtitle", 2, 256)
    })?;
    form.register_field_validator(fields.description(), |_: &CardDraft, value: &String| {
        rules::length_between(value, "Description", 2, 1024)
    })?;
    form.register_field_validator(fields.phone(), |_: &CardDraft, value: &String| {
        rules::phone(value)
    })?;
    form.register_field_validator(fields.email(), |_: &CardDraft, value: &String| {
        rules::email(value)
    })?;
    form.register_field_validator(fields.web(), |_: &CardDraft, value: &String| {
        rules::optional_uri(value, "Web")
    })?;
    form.register_field_validator(
        fields.image().then(image.url()),
        |_: &CardDraft, value: &String| rules::optional_uri(value, "Image URL"),
    )?;
    form.register_field_validator(
        fields.image().then(image.alt()),
        |_: &CardDraft, value: &String| rules::optional_length_between(value, "Image alt", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.state()),
        |_: &CardDraft, value: &String| rules::optional_length_between(value, "State", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.country()),
        |_: &CardDraft, value: &String| rules::length_between(value, "Country", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.city()),
        |_: &CardDraft, value: &String| rules::length_between(value, "City", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.street()),
        |_: &CardDraft, value: &String| rules::length_between(value, "Street", 2, 256),
    )?;
    form.register_field_validator(
        fields.address().then(address.house_number()),
        |_: &CardDraft, value: &u32| rules::min_number(*value, 1, "House number"),
    )?;
    form.register_field_validator(
        fields.address().then(address.zip()),
        |_: &CardDraft, value: &u32| rules::min_number(*value, 1, "Zip code"),
    )?;

    form.register_required_field(fields.title())?;
    form.register_required_field(fields.subtitle())?;
    form.register_required_field(fields.description())?;
    form.register_required_field(fields.phone())?;
    form.register_required_field(fields.email())?;
    form.register_required_field(fields.address().then(address.country()))?;
    form.register_required_field(fields.address().then(address.city()))?;
    form.register_required_field(fields.address().then(address.street()))?;
    form.register_required_field(fields.address().then(address.house_number()))?;
    form.register_required_field(fields.address().then(address.zip()))?;

    Ok(())
}
