use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fully qualified entity handle, written `collection/key` on the wire
/// (e.g. `users/alice`). The key part may itself contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DocumentId {
    pub collection: String,
    pub key: String,
}

impl DocumentId {
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

#[derive(Debug, Error)]
#[error("malformed document id {0:?}, expected collection/key")]
pub struct ParseDocumentIdError(String);

impl FromStr for DocumentId {
    type Err = ParseDocumentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((collection, key)) if !collection.is_empty() && !key.is_empty() => {
                Ok(Self::new(collection, key))
            }
            _ => Err(ParseDocumentIdError(s.to_string())),
        }
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DocumentId {
    type Error = ParseDocumentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Collection kind as encoded in the `type` field of a collection descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionType {
    Document,
    Edge,
}

impl CollectionType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            2 => Some(Self::Document),
            3 => Some(Self::Edge),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Document => 2,
            Self::Edge => 3,
        }
    }
}

/// Collection lifecycle state as encoded in the `status` field of a
/// collection descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Corrupted,
    New,
    Unloaded,
    Loaded,
    Unloading,
    Deleted,
}

impl CollectionStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Corrupted),
            1 => Some(Self::New),
            2 => Some(Self::Unloaded),
            3 => Some(Self::Loaded),
            4 => Some(Self::Unloading),
            5 => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Corrupted => 0,
            Self::New => 1,
            Self::Unloaded => 2,
            Self::Loaded => 3,
            Self::Unloading => 4,
            Self::Deleted => 5,
        }
    }
}
