use serde::{Deserialize, Serialize};

/// A single key/value audit record. This is the engine's entire logging story: rather than
/// pulling in a logging crate, every handler returns these on its outcome, built up with a
/// chained `.add_attribute(...)` call for a host's indexer to read. A host that wants
/// `tracing`/`log` output can trivially forward these.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

pub fn attr(key: impl Into<String>, value: impl ToString) -> Attribute {
    Attribute {
        key: key.into(),
        value: value.to_string(),
    }
}

/// A named group of attributes, used for milestone audit events (e.g. "Stake-Complete") as
/// opposed to the per-action attribute list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Event {
            kind: kind.into(),
            attributes: vec![],
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(attr(key, value));
        self
    }
}
