//! Thin REST client for server reconciliation.
//!
//! The store's invariants never depend on this client: it exists so an
//! embedder can push catalog mutations to a backend and fold responses back
//! into the store through the normal `set_state` path. Auth endpoints are
//! out of scope.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use tamarind_core::{NewProduct, Product, ProductId};

/// Errors raised by the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, body decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {path}")]
    Status {
        /// Response status code.
        status: StatusCode,
        /// Request path, for log context.
        path: String,
    },

    /// The configured base URL cannot be joined with a request path.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Product CRUD client mirroring the backend's `/products` surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl ApiClient {
    /// Create a client against `base_url` (e.g. `https://api.example.com/api/`).
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.base_url.join(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// `GET /products`
    ///
    /// # Errors
    ///
    /// [`ApiError`] on transport failure or a non-success status.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.request(reqwest::Method::GET, "products")?.send().await?;
        Self::check(&response, "products")?;
        Ok(response.json().await?)
    }

    /// `GET /products/{id}`
    ///
    /// Returns `None` on a 404.
    ///
    /// # Errors
    ///
    /// [`ApiError`] on transport failure or an unexpected status.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, ApiError> {
        let path = format!("products/{id}");
        let response = self.request(reqwest::Method::GET, &path)?.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check(&response, &path)?;
        Ok(Some(response.json().await?))
    }

    /// `POST /products`
    ///
    /// # Errors
    ///
    /// [`ApiError`] on transport failure or a non-success status.
    pub async fn create_product(&self, input: &NewProduct) -> Result<Product, ApiError> {
        let response = self
            .request(reqwest::Method::POST, "products")?
            .json(input)
            .send()
            .await?;
        Self::check(&response, "products")?;
        Ok(response.json().await?)
    }

    /// `PUT /products/{id}`
    ///
    /// # Errors
    ///
    /// [`ApiError`] on transport failure or a non-success status.
    pub async fn update_product(&self, product: &Product) -> Result<Product, ApiError> {
        let path = format!("products/{}", product.id);
        let response = self
            .request(reqwest::Method::PUT, &path)?
            .json(product)
            .send()
            .await?;
        Self::check(&response, &path)?;
        Ok(response.json().await?)
    }

    /// `DELETE /products/{id}`
    ///
    /// # Errors
    ///
    /// [`ApiError`] on transport failure or a non-success status.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        let path = format!("products/{id}");
        let response = self.request(reqwest::Method::DELETE, &path)?.send().await?;
        Self::check(&response, &path)
    }

    fn check(response: &reqwest::Response, path: &str) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status,
                path: path.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_paths_join_against_base() {
        let client = ApiClient::new(Url::parse("https://api.example.com/api/").expect("url"));
        let builder = client
            .request(reqwest::Method::GET, "products/5")
            .expect("join");
        let request = builder.build().expect("build");
        assert_eq!(request.url().as_str(), "https://api.example.com/api/products/5");
    }

    #[test]
    fn test_bearer_token_attached() {
        let client = ApiClient::new(Url::parse("https://api.example.com/api/").expect("url"))
            .with_token(SecretString::from("tok-abc"));
        let request = client
            .request(reqwest::Method::GET, "products")
            .expect("join")
            .build()
            .expect("build");
        let auth = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        assert_eq!(auth, Some("Bearer tok-abc"));
    }
}
