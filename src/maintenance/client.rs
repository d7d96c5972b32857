use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

use crate::error::{Result, TransportSnafu};
use crate::http::{JSON_CONTENT_TYPE, execute_json, join_url};

use super::model::{DeleteOutcome, ListingResult};

/// Remote operations the listing and delete workflows depend on.
pub trait DatasetDirectory {
    /// List the direct children of `path`.
    async fn list_children(&self, path: &str) -> Result<ListingResult>;

    /// Delete every version of the dataset at `path`. With `dry_run` the remote
    /// side only reports what it would delete.
    async fn delete_versions(&self, path: &str, dry_run: bool) -> Result<DeleteOutcome>;
}

/// Facade against the data-maintenance API.
#[derive(Clone)]
pub struct MaintenanceClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl MaintenanceClient {
    pub fn new(http: Client, base_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token,
        }
    }

    fn list_request(&self, path: &str) -> Result<Request> {
        let url = join_url(
            &self.base_url,
            &format!("api/v1/list/{}", path.trim_start_matches('/')),
        );
        self.authorized(self.http.get(&url))
            .build()
            .context(TransportSnafu { url })
    }

    fn delete_request(&self, path: &str, dry_run: bool) -> Result<Request> {
        let url = join_url(
            &self.base_url,
            &format!("api/v1/delete/{}", path.trim_start_matches('/')),
        );
        self.authorized(self.http.delete(&url))
            .query(&[("dry-run", dry_run.to_string())])
            .build()
            .context(TransportSnafu { url })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
    }
}

impl DatasetDirectory for MaintenanceClient {
    async fn list_children(&self, path: &str) -> Result<ListingResult> {
        log::debug!("list_children base_url={} path={}", self.base_url, path);
        let request = self.list_request(path)?;
        let listing: ListingResult = execute_json(&self.http, request).await?;
        log::debug!("list_children path={} entries={}", path, listing.len());
        Ok(listing)
    }

    async fn delete_versions(&self, path: &str, dry_run: bool) -> Result<DeleteOutcome> {
        log::debug!(
            "delete_versions base_url={} path={} dry_run={}",
            self.base_url,
            path,
            dry_run
        );
        let request = self.delete_request(path, dry_run)?;
        execute_json(&self.http, request).await
    }
}
