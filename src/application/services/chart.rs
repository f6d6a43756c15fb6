//! Org chart service
//!
//! Owns the local region store (a JSON file) and runs engine operations
//! against a region's tree, persisting after every successful mutation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::snapshot::read_json;
use crate::application::{ApplicationError, ApplicationResult, StoreResultExt};
use crate::domain::id::timestamped_id;
use crate::domain::region::{initial_chart, DEFAULT_REGION_NAME};
use crate::domain::{
    DomainError, Engine, IdGenerator, NodeDraft, Operation, OrgNode, OrgTree, Region, RegionList,
};
use crate::infrastructure::traits::FileSystem;
use crate::tree_traits::TreeNodeConvert;

/// Result of running one operation against a region.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// Tree after the operation (the previous one when rejected)
    pub tree: OrgTree,
    /// Whether a new snapshot was produced and stored
    pub changed: bool,
    /// Why the engine refused the operation
    pub rejection: Option<DomainError>,
}

/// Service for region management and tree edits.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
    ids: Arc<dyn IdGenerator>,
    engine: Engine,
    regions_path: PathBuf,
}

impl ChartService {
    /// Create a new chart service backed by `regions_path`.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
        engine: Engine,
        regions_path: PathBuf,
    ) -> Self {
        Self {
            fs,
            ids,
            engine,
            regions_path,
        }
    }

    pub fn regions_path(&self) -> &Path {
        &self.regions_path
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Load all regions, seeding the default region on first use.
    #[instrument(level = "debug", skip(self))]
    pub fn regions(&self) -> ApplicationResult<RegionList> {
        let stored = self
            .fs
            .read_if_exists(&self.regions_path)
            .with_path_context("read regions", &self.regions_path)?;
        if let Some(content) = stored {
            let regions = read_json::<RegionList>(content.as_bytes())
                .with_path_context("parse regions", &self.regions_path)?;
            debug!(count = regions.len(), "loaded regions");
            return Ok(regions);
        }

        info!(path = %self.regions_path.display(), "no region store, seeding default region");
        let chart = initial_chart().map_err(|e| ApplicationError::Store {
            context: "parse bundled chart".into(),
            source: Box::new(e),
        })?;
        let default = Region {
            id: timestamped_id(""),
            name: DEFAULT_REGION_NAME.to_string(),
            org_data: chart,
        };
        let regions = RegionList::default().add(default);
        self.save(&regions)?;
        Ok(regions)
    }

    /// Persist all regions (last write wins).
    #[instrument(level = "debug", skip(self, regions))]
    pub fn save(&self, regions: &RegionList) -> ApplicationResult<()> {
        let json = serde_json::to_string_pretty(regions)
            .with_path_context("serialize regions", &self.regions_path)?;
        self.fs
            .write_atomic(&self.regions_path, &json)
            .with_path_context("write regions", &self.regions_path)?;
        debug!(count = regions.len(), "saved regions");
        Ok(())
    }

    /// Find a region by id or name.
    pub fn region(&self, key: &str) -> ApplicationResult<Region> {
        self.regions()?
            .resolve(key)
            .cloned()
            .ok_or_else(|| ApplicationError::RegionNotFound(key.to_string()))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_region(&self, name: &str) -> ApplicationResult<Region> {
        let name = valid_region_name(name)?;
        let region = Region::new(timestamped_id(""), name);
        let regions = self.regions()?.add(region.clone());
        self.save(&regions)?;
        info!(id = %region.id, name = %region.name, "added region");
        Ok(region)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn rename_region(&self, key: &str, name: &str) -> ApplicationResult<Region> {
        let name = valid_region_name(name)?;
        let region = self.region(key)?;
        let regions = self.regions()?.rename(&region.id, name);
        self.save(&regions)?;
        Ok(Region {
            name: name.to_string(),
            ..region
        })
    }

    /// Delete a region; refused while it still has employees.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_region(&self, key: &str) -> ApplicationResult<Region> {
        let region = self.region(key)?;
        if region.has_employees() {
            warn!(id = %region.id, "refusing to delete staffed region");
            return Err(ApplicationError::RegionNotEmpty(region.name));
        }
        let regions = self.regions()?.remove(&region.id);
        self.save(&regions)?;
        Ok(region)
    }

    /// Replace the whole store, e.g. from an imported snapshot.
    pub fn replace_all(&self, regions: &RegionList) -> ApplicationResult<()> {
        self.save(regions)
    }

    /// Build a new leaf node from user input with a fresh id.
    pub fn new_node(&self, draft: NodeDraft) -> ApplicationResult<OrgNode> {
        Ok(draft.into_node(self.ids.next_id())?)
    }

    /// Pre-flight check without touching the store.
    pub fn check(&self, key: &str, op: &Operation) -> ApplicationResult<()> {
        let region = self.region(key)?;
        Ok(self.engine.check(&region.org_data, op)?)
    }

    /// Run `op` against a region's tree and store the result if it changed.
    #[instrument(level = "debug", skip(self, op), fields(kind = op.kind()))]
    pub fn apply(&self, key: &str, op: Operation) -> ApplicationResult<ApplyOutcome> {
        let regions = self.regions()?;
        let region = regions
            .resolve(key)
            .ok_or_else(|| ApplicationError::RegionNotFound(key.to_string()))?;
        let before = region.org_data.clone();

        match self.engine.try_apply(&before, op) {
            Ok(after) if !OrgTree::ptr_eq(&before, &after) => {
                let updated = regions.update_org_data(&region.id, after.clone());
                self.save(&updated)?;
                Ok(ApplyOutcome {
                    tree: after,
                    changed: true,
                    rejection: None,
                })
            }
            Ok(after) => Ok(ApplyOutcome {
                tree: after,
                changed: false,
                rejection: None,
            }),
            Err(reason) => {
                debug!(%reason, "operation rejected");
                Ok(ApplyOutcome {
                    tree: before,
                    changed: false,
                    rejection: Some(reason),
                })
            }
        }
    }

    /// Text tree of a region, annotated with subordinate counts.
    pub fn render(&self, key: &str) -> ApplicationResult<String> {
        let region = self.region(key)?;
        Ok(region.org_data.to_tree_string().to_string())
    }
}

fn valid_region_name(name: &str) -> ApplicationResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApplicationError::InvalidInput(
            "region name must not be empty".into(),
        ));
    }
    Ok(name)
}
