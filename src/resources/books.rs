//! The Books resource client.

use crate::client::ApiClient;
use crate::models::Book;
use crate::settings::ApiSettings;
use crate::{ApiResponse, Result};

const BOOKS_ENDPOINT: &str = "/api/v1/Books";

/// CRUD operations over `/api/v1/Books`.
///
/// # Examples
///
/// ```no_run
/// use bookstore_conformance::{ApiSettings, BooksClient};
///
/// # async fn example() -> Result<(), bookstore_conformance::Error> {
/// let books = BooksClient::from_settings(ApiSettings::default())?;
/// let response = books.get_by_id(1).await?;
/// assert!(response.is_success());
/// println!("{:?}", response.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BooksClient {
    api: ApiClient,
}

impl BooksClient {
    /// Wraps an existing base client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Builds a dedicated base client from settings.
    pub fn from_settings(settings: ApiSettings) -> Result<Self> {
        Ok(Self::new(ApiClient::new(settings)?))
    }

    /// Lists every book.
    pub async fn list_all(&self) -> Result<ApiResponse<Vec<Book>>> {
        self.api.get_json(BOOKS_ENDPOINT).await
    }

    /// Fetches one book by id. Whatever status the server assigns to the id
    /// (including 0, negative or out-of-range ids) comes back unchanged.
    pub async fn get_by_id(&self, id: i32) -> Result<ApiResponse<Book>> {
        self.api
            .get_json(&format!("{}/{}", BOOKS_ENDPOINT, id))
            .await
    }

    /// Creates a book and returns the server's response envelope.
    pub async fn create(&self, book: &Book) -> Result<ApiResponse<Book>> {
        self.api.post(BOOKS_ENDPOINT, book).await
    }

    /// Updates the book with the given id.
    pub async fn update(&self, id: i32, book: &Book) -> Result<ApiResponse<Book>> {
        self.api
            .put(&format!("{}/{}", BOOKS_ENDPOINT, id), book)
            .await
    }

    /// Deletes the book with the given id.
    pub async fn delete(&self, id: i32) -> Result<ApiResponse> {
        self.api
            .delete(&format!("{}/{}", BOOKS_ENDPOINT, id))
            .await
    }

    /// [`create`](Self::create), but requires success and returns the
    /// created book.
    pub async fn create_and_return(&self, book: &Book) -> Result<Book> {
        self.create(book).await?.require_success()
    }

    /// [`update`](Self::update), but requires success and returns the
    /// updated book.
    pub async fn update_and_return(&self, id: i32, book: &Book) -> Result<Book> {
        self.update(id, book).await?.require_success()
    }
}
