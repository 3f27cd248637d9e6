//! The Authors resource client.

use crate::client::ApiClient;
use crate::models::Author;
use crate::settings::ApiSettings;
use crate::{ApiResponse, Result};

const AUTHORS_ENDPOINT: &str = "/api/v1/Authors";

/// CRUD operations over `/api/v1/Authors`, plus the nested by-book read.
#[derive(Clone)]
pub struct AuthorsClient {
    api: ApiClient,
}

impl AuthorsClient {
    /// Wraps an existing base client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Builds a dedicated base client from settings.
    pub fn from_settings(settings: ApiSettings) -> Result<Self> {
        Ok(Self::new(ApiClient::new(settings)?))
    }

    /// Lists every author.
    pub async fn list_all(&self) -> Result<ApiResponse<Vec<Author>>> {
        self.api.get_json(AUTHORS_ENDPOINT).await
    }

    /// Fetches one author by id.
    pub async fn get_by_id(&self, id: i32) -> Result<ApiResponse<Author>> {
        self.api
            .get_json(&format!("{}/{}", AUTHORS_ENDPOINT, id))
            .await
    }

    /// Lists the authors attached to a book, via the service's nested
    /// `/authors/books/{bookId}` path.
    pub async fn list_by_book_id(&self, book_id: i32) -> Result<ApiResponse<Vec<Author>>> {
        self.api
            .get_json(&format!("{}/authors/books/{}", AUTHORS_ENDPOINT, book_id))
            .await
    }

    /// Creates an author and returns the server's response envelope.
    pub async fn create(&self, author: &Author) -> Result<ApiResponse<Author>> {
        self.api.post(AUTHORS_ENDPOINT, author).await
    }

    /// Updates the author with the given id.
    pub async fn update(&self, id: i32, author: &Author) -> Result<ApiResponse<Author>> {
        self.api
            .put(&format!("{}/{}", AUTHORS_ENDPOINT, id), author)
            .await
    }

    /// Deletes the author with the given id.
    pub async fn delete(&self, id: i32) -> Result<ApiResponse> {
        self.api
            .delete(&format!("{}/{}", AUTHORS_ENDPOINT, id))
            .await
    }

    /// [`create`](Self::create), but requires success and returns the
    /// created author.
    pub async fn create_and_return(&self, author: &Author) -> Result<Author> {
        self.create(author).await?.require_success()
    }

    /// [`update`](Self::update), but requires success and returns the
    /// updated author.
    pub async fn update_and_return(&self, id: i32, author: &Author) -> Result<Author> {
        self.update(id, author).await?.require_success()
    }
}
