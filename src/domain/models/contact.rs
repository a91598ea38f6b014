use serde::{Deserialize, Serialize};

/// Remote contact, keyed by phone number on the provider side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
}

/// Channel identifiers stored on a newly created contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactAttributes {
    pub sms: String,
    pub whatsapp: String,
}

impl ContactAttributes {
    pub fn for_number(number: &str) -> Self {
        Self {
            sms: number.to_string(),
            whatsapp: number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContactList {
    pub name: String,
    pub folder_id: i64,
}

impl NewContactList {
    /// A list named after its members, e.g. `+4179_+4178`.
    pub fn for_numbers(numbers: &[String], folder_id: i64) -> Self {
        Self {
            name: numbers.join("_"),
            folder_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactList {
    pub id: i64,
}
