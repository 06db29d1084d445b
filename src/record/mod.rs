//! Bulletin records
//!
//! A listing page yields [`ContentStub`]s; hydrating a stub with its detail
//! table produces a [`Content`] that owns its ordered [`Item`]s.

use crate::channel::{Channel, Field};
use serde::{Deserialize, Serialize};

/// A listing entry that has not been hydrated yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStub {
    pub channel: Channel,
    /// Document id, the basename of the URL path without extension
    pub id: String,
    pub title: String,
    /// Normalised URL: relative to the section base or fully qualified
    pub url: String,
    /// Raw publish date label
    pub date: String,
}

/// One published bulletin with its approval records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub channel: Channel,
    pub id: String,
    pub title: String,
    pub url: String,
    pub date: String,
    /// Rows of the approval table in source order
    pub items: Vec<Item>,
}

impl Content {
    /// Attaches extracted items to a stub
    pub fn from_stub(stub: ContentStub, items: Vec<Item>) -> Self {
        Self {
            channel: stub.channel,
            id: stub.id,
            title: stub.title,
            url: stub.url,
            date: stub.date,
            items,
        }
    }

    /// Returns the listing view of this content
    pub fn stub(&self) -> ContentStub {
        ContentStub {
            channel: self.channel,
            id: self.id.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
            date: self.date.clone(),
        }
    }

    /// Returns true if both contents carry the same item sequence
    pub fn same_items(&self, other: &Content) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.same_values(b))
    }

    /// Builds the flat-file document for this content
    pub fn to_document(&self) -> ContentDocument {
        ContentDocument {
            title: self.title.clone(),
            url: self.url.clone(),
            date: self.date.clone(),
            items: self.items.clone(),
        }
    }
}

/// One row of a bulletin's approval table
///
/// Which optional fields are populated is decided by the parent channel's
/// layout; fields the channel does not define stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Sequence label exactly as printed
    pub seq: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default)]
    pub approval_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoke_info: Option<String>,
}

impl Item {
    /// Assigns a value to the given field
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Seq => self.seq = value,
            Field::Name => self.name = value,
            Field::Catalog => self.catalog = Some(value),
            Field::Publisher => self.publisher = Some(value),
            Field::Operator => self.operator = Some(value),
            Field::ApprovalNumber => self.approval_number = value,
            Field::Isbn => self.isbn = Some(value),
            Field::ChangeInfo => self.change_info = Some(value),
            Field::RevokeInfo => self.revoke_info = Some(value),
            Field::Date => self.date = value,
        }
    }

    /// Compares two rows field by field; an absent field equals an empty one
    ///
    /// Documents written by older collectors drop empty values entirely, so
    /// `None` and `Some("")` must not count as a change.
    pub fn same_values(&self, other: &Item) -> bool {
        Field::ALL.iter().all(|&field| {
            self.get(field).unwrap_or_default() == other.get(field).unwrap_or_default()
        })
    }

    /// Returns the value of the given field, if set
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Seq => Some(self.seq.as_str()),
            Field::Name => Some(self.name.as_str()),
            Field::Catalog => self.catalog.as_deref(),
            Field::Publisher => self.publisher.as_deref(),
            Field::Operator => self.operator.as_deref(),
            Field::ApprovalNumber => Some(self.approval_number.as_str()),
            Field::Isbn => self.isbn.as_deref(),
            Field::ChangeInfo => self.change_info.as_deref(),
            Field::RevokeInfo => self.revoke_info.as_deref(),
            Field::Date => Some(self.date.as_str()),
        }
    }
}

/// Flat-file shape of a stored content
///
/// Channel and document id are not stored; they are derived from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub title: String,
    pub url: String,
    pub date: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl ContentDocument {
    /// Rebuilds a content using the identity of the stub it was stored for
    pub fn into_content(self, channel: Channel, id: String) -> Content {
        Content {
            channel,
            id,
            title: self.title,
            url: self.url,
            date: self.date,
            items: self.items,
        }
    }
}
