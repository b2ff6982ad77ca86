use bizcard::form::{FieldLens, FormModel};

#[derive(Clone, PartialEq, FormModel)]
struct Contact {
    email: String,
    phone_number: String,
}

#[derive(Clone, FormModel)]
struct Card {
    title: String,
    contact: Contact,
}

fn main() {
    let fields = Card::fields();
    assert_eq!(fields.title().key().leaf(), "title");
    assert_eq!(fields.title().key().to_string(), "title");

    let nested = fields.contact().then(Contact::fields().phone_number());
    assert_eq!(nested.key().to_string(), "contact.phoneNumber");

    let mut card = Card {
        title: String::new(),
        contact: Contact {
            email: String::new(),
            phone_number: String::new(),
        },
    };
    nested.set(&mut card, "0501234567".to_string());
    assert_eq!(nested.get(&card), "0501234567");
}
