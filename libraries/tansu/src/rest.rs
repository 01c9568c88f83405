//! HTTP backend speaking the hosted realtime-database REST dialect: every
//! node is addressable as `<base>/<path>.json`, reads of absent nodes return
//! the JSON literal `null`, and an `auth` query parameter carries the
//! credential when one is configured.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::{DocumentStore, StoreError};

/// Budget for one request before it counts as timed out.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestStore {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl RestStore {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
            client,
        })
    }

    fn node_url(&self, path: &str) -> Result<reqwest::Url, StoreError> {
        let node = format!("{}/{}.json", self.base_url, path.trim_matches('/'));
        match &self.auth_token {
            // parse_with_params form-encodes the token, so credentials with
            // reserved characters survive the query string
            Some(token) => reqwest::Url::parse_with_params(&node, [("auth", token.as_str())]),
            None => reqwest::Url::parse(&node),
        }
        .map_err(|e| StoreError::Unavailable(format!("bad store url {node:?}: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Unavailable(e.to_string())
    }
}

async fn read_body(response: reqwest::Response) -> Result<Value, StoreError> {
    response
        .error_for_status()
        .map_err(transport_error)?
        .json::<Value>()
        .await
        .map_err(transport_error)
}

impl DocumentStore for RestStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        log::debug!("GET {path}");
        let response = self
            .client
            .get(self.node_url(path)?)
            .send()
            .await
            .map_err(transport_error)?;
        let body = read_body(response).await?;
        Ok(if body.is_null() { None } else { Some(body) })
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        log::debug!("PUT {path}");
        let response = self
            .client
            .put(self.node_url(path)?)
            .json(&value)
            .send()
            .await
            .map_err(transport_error)?;
        read_body(response).await?;
        Ok(())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        log::debug!("PATCH {path}");
        let response = self
            .client
            .patch(self.node_url(path)?)
            .json(&Value::Object(fields))
            .send()
            .await
            .map_err(transport_error)?;
        read_body(response).await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        log::debug!("DELETE {path}");
        let response = self
            .client
            .delete(self.node_url(path)?)
            .send()
            .await
            .map_err(transport_error)?;
        read_body(response).await?;
        Ok(())
    }
}
