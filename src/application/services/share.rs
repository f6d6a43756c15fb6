//! Shared-link snapshot store
//!
//! A shared link names a snapshot of all regions stored under
//! `<shared_dir>/<share-id>.json`. There is no merging: whoever saves last wins.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::snapshot::read_json;
use crate::application::{ApplicationError, ApplicationResult, StoreResultExt};
use crate::domain::id::timestamped_id;
use crate::domain::RegionList;
use crate::infrastructure::traits::FileSystem;

/// Prefix of generated share ids.
pub const SHARE_ID_PREFIX: &str = "share-";

/// Stored form of a shared snapshot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SharedRecord {
    data: RegionList,
    /// Unix milliseconds of the last save
    updated_at: i64,
}

/// A loaded shared snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedSnapshot {
    pub regions: RegionList,
    pub updated_at: DateTime<Utc>,
}

/// Service for saving and loading shared snapshots.
pub struct ShareService {
    fs: Arc<dyn FileSystem>,
    shared_dir: PathBuf,
}

impl ShareService {
    pub fn new(fs: Arc<dyn FileSystem>, shared_dir: PathBuf) -> Self {
        Self { fs, shared_dir }
    }

    /// New share id: `share-<unix-millis>-<9 chars>`.
    pub fn generate_share_id() -> String {
        timestamped_id(SHARE_ID_PREFIX)
    }

    /// Store `regions` under `share_id`, overwriting any previous snapshot.
    #[instrument(level = "debug", skip(self, regions))]
    pub fn save(&self, share_id: &str, regions: &RegionList) -> ApplicationResult<DateTime<Utc>> {
        let path = self.record_path(share_id)?;
        let now = Utc::now();
        let record = SharedRecord {
            data: regions.clone(),
            updated_at: now.timestamp_millis(),
        };
        let json =
            serde_json::to_string_pretty(&record).with_path_context("serialize share", &path)?;
        self.fs
            .write_atomic(&path, &json)
            .with_path_context("write share", &path)?;
        debug!(share_id, regions = regions.len(), "saved shared snapshot");
        Ok(now)
    }

    /// Load the snapshot stored under `share_id`, `None` if there is none.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, share_id: &str) -> ApplicationResult<Option<SharedSnapshot>> {
        let path = self.record_path(share_id)?;
        let Some(content) = self
            .fs
            .read_if_exists(&path)
            .with_path_context("read share", &path)?
        else {
            return Ok(None);
        };
        let record = read_json::<SharedRecord>(content.as_bytes())
            .with_path_context("parse share", &path)?;
        let updated_at = Utc
            .timestamp_millis_opt(record.updated_at)
            .single()
            .unwrap_or_default();
        Ok(Some(SharedSnapshot {
            regions: record.data,
            updated_at,
        }))
    }

    fn record_path(&self, share_id: &str) -> ApplicationResult<PathBuf> {
        let valid = !share_id.is_empty()
            && share_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ApplicationError::InvalidInput(format!(
                "invalid share id: {share_id}"
            )));
        }
        Ok(self.shared_dir.join(format!("{share_id}.json")))
    }
}
