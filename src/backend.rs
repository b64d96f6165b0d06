//! HTTP client for the sheet backend.

use reqwest::blocking::{Client, multipart};
use sheetdesk_core::storage::XLSX_MIME;
use sheetdesk_core::{Result, SheetBackend, SheetRecord, SheetdeskError};
use std::time::Duration;

/// Multipart field the upload endpoint reads the file from.
const UPLOAD_FIELD: &str = "uploadfile";

/// Talks to the backend over blocking HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

fn backend_error(action: &'static str) -> impl Fn(reqwest::Error) -> SheetdeskError {
    move |e| SheetdeskError::Backend {
        action,
        message: e.to_string(),
    }
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        // `None` disables reqwest's default 30s timeout for the blocking client.
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(backend_error("client"))?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `deleteFile/<id>` with the id as one percent-encoded path segment.
    fn delete_url(&self, id: &str) -> Result<reqwest::Url> {
        let invalid = |message: String| SheetdeskError::Backend {
            action: "delete",
            message,
        };
        let mut url = reqwest::Url::parse(&self.endpoint("deleteFile"))
            .map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("cannot append a path to {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    /// Resolve a record URL; relative URLs are taken against the base URL.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.endpoint(url.trim_start_matches('/'))
        }
    }
}

impl SheetBackend for HttpBackend {
    fn list_sheets(&self) -> Result<Vec<SheetRecord>> {
        let err = backend_error("list");
        self.client
            .get(self.endpoint("excelsheets"))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<Vec<SheetRecord>>())
            .map_err(err)
    }

    fn delete_sheet(&self, id: &str) -> Result<serde_json::Value> {
        let err = backend_error("delete");
        let url = self.delete_url(id)?;
        self.client
            .delete(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<serde_json::Value>())
            .map_err(err)
    }

    fn upload_sheet(&self, file_name: &str, bytes: Vec<u8>) -> Result<serde_json::Value> {
        let err = backend_error("upload");
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(XLSX_MIME)
            .map_err(&err)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);
        self.client
            .post(self.endpoint("uploadExcelFile"))
            .multipart(form)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<serde_json::Value>())
            .map_err(err)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let err = backend_error("download");
        self.client
            .get(self.resolve(url))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map(|b| b.to_vec())
            .map_err(err)
    }
}
