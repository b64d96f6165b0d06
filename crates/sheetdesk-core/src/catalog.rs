//! Sheet records stored on the backend, and the list screen's state.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A spreadsheet file persisted by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub filename: String,
    #[serde(default)]
    pub url: String,
}

/// Operations the sheet backend offers.
///
/// The HTTP client lives in the binary; tests drive the list and editor with
/// an in-memory implementation.
pub trait SheetBackend {
    /// Fetch every stored sheet record.
    fn list_sheets(&self) -> Result<Vec<SheetRecord>>;

    /// Delete the stored sheet with `id`. Returns the backend's acknowledgement.
    fn delete_sheet(&self, id: &str) -> Result<serde_json::Value>;

    /// Upload an encoded workbook under `file_name`. Returns the backend's acknowledgement.
    fn upload_sheet(&self, file_name: &str, bytes: Vec<u8>) -> Result<serde_json::Value>;

    /// Fetch the raw bytes behind a record's download URL.
    fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// State of the sheet list screen.
#[derive(Debug)]
pub struct SheetList {
    records: Vec<SheetRecord>,
    loading: bool,
}

impl Default for SheetList {
    fn default() -> Self {
        SheetList::new()
    }
}

impl SheetList {
    /// A list that has not fetched yet; shows as loading.
    pub fn new() -> Self {
        SheetList {
            records: Vec::new(),
            loading: true,
        }
    }

    pub fn records(&self) -> &[SheetRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark the list as pending a fetch (the screen is being activated).
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Fetch all records. On failure the error is logged and the list is left empty.
    pub fn refresh(&mut self, backend: &dyn SheetBackend) {
        self.loading = true;
        match backend.list_sheets() {
            Ok(records) => {
                log::info!("fetched {} sheet records", records.len());
                self.records = records;
            }
            Err(e) => {
                log::error!("Error fetching sheets: {}", e);
                self.records.clear();
            }
        }
        self.loading = false;
    }

    /// Delete the record with `id` on the backend, then locally.
    ///
    /// Issues exactly one request. Local state only changes once the backend
    /// confirmed; on failure the error is logged and `false` is returned.
    pub fn delete(&mut self, id: &str, backend: &dyn SheetBackend) -> bool {
        match backend.delete_sheet(id) {
            Ok(ack) => {
                log::info!("sheet {} deleted: {}", id, ack);
                self.records.retain(|r| r.id != id);
                true
            }
            Err(e) => {
                log::error!("Error deleting sheet {}: {}", id, e);
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use crate::error::SheetdeskError;
    use std::cell::RefCell;

    /// In-memory backend recording every request it receives.
    #[derive(Default)]
    pub struct FakeBackend {
        pub records: RefCell<Vec<SheetRecord>>,
        pub fail: bool,
        pub deletes: RefCell<Vec<String>>,
        pub uploads: RefCell<Vec<(String, Vec<u8>)>>,
        pub list_calls: RefCell<usize>,
    }

    impl FakeBackend {
        pub fn with_records(ids: &[&str]) -> Self {
            let records = ids
                .iter()
                .map(|id| SheetRecord {
                    id: id.to_string(),
                    filename: format!("{}.xlsx", id),
                    url: format!("http://files/{}.xlsx", id),
                })
                .collect();
            FakeBackend {
                records: RefCell::new(records),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            FakeBackend {
                fail: true,
                ..Default::default()
            }
        }

        fn check(&self, action: &'static str) -> Result<()> {
            if self.fail {
                return Err(SheetdeskError::Backend {
                    action,
                    message: "connection refused".to_string(),
                });
            }
            Ok(())
        }
    }

    impl SheetBackend for FakeBackend {
        fn list_sheets(&self) -> Result<Vec<SheetRecord>> {
            *self.list_calls.borrow_mut() += 1;
            self.check("list")?;
            Ok(self.records.borrow().clone())
        }

        fn delete_sheet(&self, id: &str) -> Result<serde_json::Value> {
            self.deletes.borrow_mut().push(id.to_string());
            self.check("delete")?;
            self.records.borrow_mut().retain(|r| r.id != id);
            Ok(serde_json::json!({ "message": "deleted" }))
        }

        fn upload_sheet(&self, file_name: &str, bytes: Vec<u8>) -> Result<serde_json::Value> {
            self.uploads.borrow_mut().push((file_name.to_string(), bytes));
            self.check("upload")?;
            Ok(serde_json::json!({ "message": "uploaded" }))
        }

        fn download(&self, url: &str) -> Result<Vec<u8>> {
            self.check("download")?;
            Ok(url.as_bytes().to_vec())
        }
    }
}
