//! Typed resource façades over the base client.
//!
//! Each client binds one REST resource path to CRUD operations. These are
//! pure compositions: build the path, delegate to the base client's verb,
//! hand back whatever came out. Resilience, timing and logging all live in
//! the base client.

mod authors;
mod books;

pub use authors::AuthorsClient;
pub use books::BooksClient;
