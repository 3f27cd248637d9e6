//! Wire models for the bookstore resources.
//!
//! Plain data carriers matching the FakeRestAPI camelCase schema. Every
//! field defaults when absent from the payload, mirroring the lenient
//! binding the service's own clients use; a book body with no `pageCount`
//! deserializes with `page_count == 0` rather than failing. An `id` of `0`
//! conventionally means "not yet assigned" on create.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub page_count: i32,
    pub excerpt: Option<String>,
    /// ISO-8601 timestamp, carried verbatim.
    pub publish_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Author {
    pub id: i32,
    /// The book this author is attached to.
    pub id_book: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
