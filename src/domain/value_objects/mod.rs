use serde::{Deserialize, Serialize};

/// Destination phone numbers of a message, in `+xxxxxxxxxxx` form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    /// Normalizes the recipients into a sequence, wrapping a single number.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Recipients::One(number) => vec![number.clone()],
            Recipients::Many(numbers) => numbers.clone(),
        }
    }
}

impl Default for Recipients {
    fn default() -> Self {
        Recipients::Many(Vec::new())
    }
}

impl From<&str> for Recipients {
    fn from(value: &str) -> Self {
        Recipients::One(value.to_string())
    }
}

impl From<String> for Recipients {
    fn from(value: String) -> Self {
        Recipients::One(value)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(value: Vec<String>) -> Self {
        Recipients::Many(value)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(value: Vec<&str>) -> Self {
        Recipients::Many(value.into_iter().map(str::to_string).collect())
    }
}
