//! Blocking HTTP client for the file API

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::json;

use super::errors::{CliError, CliResult};
use crate::http_server::storage_routes::{ErrorResponse, GetResponse, ViewResponse};
use crate::http_server::API_BASE_PATH;

/// Operations the shell needs from the service
pub trait FileApi {
    fn upload(&self, owner: &str, file_name: &str, content: &[u8]) -> CliResult<()>;

    fn view(&self, owner: &str) -> CliResult<Vec<String>>;

    /// `None` when the file is not in the owner's listing
    fn download_url(&self, owner: &str, file_name: &str) -> CliResult<Option<String>>;

    /// Follow a download link
    fn fetch(&self, url: &str) -> CliResult<Vec<u8>>;
}

/// reqwest-backed [`FileApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    /// `gateway` is the service root, e.g. `http://localhost:54321`
    pub fn new(gateway: &str) -> Self {
        Self {
            base: format!("{}{}", gateway.trim_end_matches('/'), API_BASE_PATH),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base, name)
    }

    fn failure(response: Response) -> CliError {
        let status = response.status();
        let detail = response
            .json::<ErrorResponse>()
            .map(|e| e.error)
            .unwrap_or_else(|_| status.to_string());
        CliError::request_failed(format!("{} ({})", detail, status.as_u16()))
    }
}

impl FileApi for ApiClient {
    fn upload(&self, owner: &str, file_name: &str, content: &[u8]) -> CliResult<()> {
        let body = json!({
            "owner": owner,
            "file_name": file_name,
            "file": STANDARD.encode(content),
        });
        let response = self.http.put(self.endpoint("put")).json(&body).send()?;
        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(Self::failure(response))
        }
    }

    fn view(&self, owner: &str) -> CliResult<Vec<String>> {
        let response = self
            .http
            .get(self.endpoint("view"))
            .json(&json!({ "owner": owner }))
            .send()?;
        if response.status() != StatusCode::OK {
            return Err(Self::failure(response));
        }
        Ok(response.json::<ViewResponse>()?.files)
    }

    fn download_url(&self, owner: &str, file_name: &str) -> CliResult<Option<String>> {
        let response = self
            .http
            .get(self.endpoint("get"))
            .json(&json!({ "owner": owner, "file_name": file_name }))
            .send()?;
        match response.status() {
            StatusCode::OK => Ok(Some(response.json::<GetResponse>()?.file_url)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(Self::failure(response)),
        }
    }

    fn fetch(&self, url: &str) -> CliResult<Vec<u8>> {
        let response = self.http.get(url).send()?;
        if response.status() != StatusCode::OK {
            return Err(Self::failure(response));
        }
        Ok(response.bytes()?.to_vec())
    }
}
