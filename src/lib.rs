//! # bookstore-conformance
//!
//! A resilient HTTP client and conformance harness for the FakeRestAPI
//! bookstore service (Books and Authors CRUD). The client layer centralizes
//! request execution, retries transient failures with linear backoff, times
//! and logs every call, and exposes typed resource operations over a shared
//! base client. The conformance suite itself lives under `tests/`.
//!
//! ## Quick start
//!
//! ```no_run
//! use bookstore_conformance::{logging, Book, BooksClient, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bookstore_conformance::Error> {
//!     let settings = Settings::load()?;
//!     logging::init(&settings.logging);
//!
//!     let books = BooksClient::from_settings(settings.api)?;
//!
//!     // Envelope access: status and raw body are always available.
//!     let response = books.get_by_id(1).await?;
//!     println!("status {}, took {:?}", response.status, response.elapsed);
//!
//!     // Typed access: require success, get the entity.
//!     let created = books
//!         .create_and_return(&Book {
//!             id: 0, // not yet assigned
//!             title: Some("The Test Pyramid".to_string()),
//!             page_count: 172,
//!             ..Book::default()
//!         })
//!         .await?;
//!     println!("created book {}", created.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failure handling
//!
//! Transport errors and 5xx statuses are retried per the configured policy
//! (`retry_delay_ms * attempt`, up to `max_retry_attempts` retries); a 5xx
//! that survives every attempt is returned as a normal envelope so tests can
//! assert on it. 4xx statuses are never retried and never errors. Only
//! deserialization and configuration failures are raised.

mod client;
mod error;
mod models;
mod resources;
mod response;

pub mod logging;
pub mod retry;
pub mod settings;

pub use client::{ApiClient, ClientBuilder};
pub use error::{Error, Result};
pub use models::{Author, Book};
pub use resources::{AuthorsClient, BooksClient};
pub use response::ApiResponse;
pub use retry::{RetryOnTransient, RetryPolicy, RetryPredicate};
pub use settings::{ApiSettings, LoggingSettings, Settings};
