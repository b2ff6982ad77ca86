//! Wire-shaped drafts and payloads for the bizcard REST API.
//!
//! Drafts are what the forms edit; payloads are what goes on the wire. For
//! cards the two coincide. For signup they differ: the draft carries the
//! password confirmation and the admin flag, which must never be sent, so
//! the payload type simply does not have those fields.

use serde::{Deserialize, Serialize};

use crate::form::FormModel;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FormModel)]
pub struct ImageDraft {
    pub url: String,
    pub alt: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FormModel)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub state: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub house_number: u32,
    pub zip: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FormModel)]
pub struct NameDraft {
    pub first: String,
    pub middle: String,
    pub last: String,
}

/// Draft and wire payload of a business card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FormModel)]
pub struct CardDraft {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub web: String,
    pub image: ImageDraft,
    pub address: AddressDraft,
}

/// Everything the signup form edits, including the two fields that exist
/// only client-side.
#[derive(Clone, Debug, Default, PartialEq, Eq, FormModel)]
pub struct SignupDraft {
    pub name: NameDraft,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub image: ImageDraft,
    pub address: AddressDraft,
    pub is_business: bool,
    pub is_admin: bool,
}

/// Wire payload for user creation. Built from a [`SignupDraft`] by dropping
/// `confirmPassword` and `isAdmin`; since the type has no such fields they
/// cannot serialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub name: NameDraft,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub image: ImageDraft,
    pub address: AddressDraft,
    pub is_business: bool,
}

impl From<&SignupDraft> for SignupPayload {
    fn from(draft: &SignupDraft) -> Self {
        Self {
            name: draft.name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            password: draft.password.clone(),
            image: draft.image.clone(),
            address: draft.address.clone(),
            is_business: draft.is_business,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_payload_never_carries_client_only_fields() {
        let draft = SignupDraft {
            confirm_password: "secret".to_string(),
            is_admin: true,
            ..SignupDraft::default()
        };
        let body = serde_json::to_value(SignupPayload::from(&draft))
            .expect("signup payload serializes");
        let object = body.as_object().expect("payload is a json object");
        assert!(!object.contains_key("confirmPassword"));
        assert!(!object.contains_key("isAdmin"));
        assert!(object.contains_key("isBusiness"));
    }

    #[test]
    fn address_serializes_with_wire_names() {
        let address = AddressDraft {
            house_number: 12,
            zip: 12345,
            ..AddressDraft::default()
        };
        let body = serde_json::to_value(&address).expect("address serializes");
        assert_eq!(body["houseNumber"], 12);
        assert_eq!(body["zip"], 12345);
    }
}
