//! Remote song store abstraction and its HTTP implementation
//!
//! The editor core only sees the [`SongStore`] trait; the service is one
//! implementation, reached over HTTP with the session cookie attached.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use setlist_common::model::{Song, SongOrder};
use setlist_common::{Error, Result};
use uuid::Uuid;

/// Remote persistence collaborator. All operations are scoped to the
/// authenticated owner on the server side; an invalid session surfaces as
/// [`Error::Unauthorized`].
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Owner's songs, ordered by collection position ascending
    async fn list(&self) -> Result<Vec<Song>>;

    /// Create a song; the server assigns the next collection position
    async fn create(&self, title: &str, key: Option<&str>) -> Result<Song>;

    /// Persist the full current song state (title, key, sequence)
    async fn update(&self, song: &Song) -> Result<Song>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Persist a collection reorder as one transactional batch
    async fn reorder_batch(&self, orders: &[SongOrder]) -> Result<()>;
}

/// [`SongStore`] over the setlist web service
pub struct HttpSongStore {
    http: reqwest::Client,
    base_url: String,
    session_cookie: String,
}

impl HttpSongStore {
    /// `base_url` without trailing slash, e.g. `http://127.0.0.1:5740`
    pub fn new(base_url: impl Into<String>, session_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session_cookie: format!("setlist_session={}", session_token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the server's debounce tunable so all clients coalesce writes
    /// over the same window.
    pub async fn fetch_save_debounce_ms(&self) -> Result<u64> {
        let response = self
            .http
            .get(self.url("/api/settings"))
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .send()
            .await
            .map_err(request_error)?;
        let body: serde_json::Value = check(response).await?.json().await.map_err(request_error)?;
        body["save_debounce_ms"]
            .as_u64()
            .ok_or_else(|| Error::Remote("Malformed settings response".to_string()))
    }
}

/// Map a non-success status to the matching error variant
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(Error::Unauthorized("No valid session".to_string())),
        StatusCode::NOT_FOUND => Err(Error::NotFound("Song not found".to_string())),
        status => Err(Error::Remote(format!("Server returned {}", status))),
    }
}

fn request_error(e: reqwest::Error) -> Error {
    Error::Remote(e.to_string())
}

#[async_trait]
impl SongStore for HttpSongStore {
    async fn list(&self) -> Result<Vec<Song>> {
        let response = self
            .http
            .get(self.url("/api/songs"))
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .send()
            .await
            .map_err(request_error)?;
        check(response).await?.json().await.map_err(request_error)
    }

    async fn create(&self, title: &str, key: Option<&str>) -> Result<Song> {
        let response = self
            .http
            .post(self.url("/api/songs"))
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .json(&json!({ "title": title, "key": key, "sequence": [] }))
            .send()
            .await
            .map_err(request_error)?;
        check(response).await?.json().await.map_err(request_error)
    }

    async fn update(&self, song: &Song) -> Result<Song> {
        let response = self
            .http
            .put(self.url(&format!("/api/songs/{}", song.id)))
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .json(song)
            .send()
            .await
            .map_err(request_error)?;
        check(response).await?.json().await.map_err(request_error)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/songs/{}", id)))
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .send()
            .await
            .map_err(request_error)?;
        check(response).await?;
        Ok(())
    }

    async fn reorder_batch(&self, orders: &[SongOrder]) -> Result<()> {
        let response = self
            .http
            .put(self.url("/api/songs/reorder"))
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .json(&json!({ "songs": orders }))
            .send()
            .await
            .map_err(request_error)?;
        check(response).await?;
        Ok(())
    }
}
