//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ChartService, ShareService};
use crate::config::Settings;
use crate::domain::{Engine, IdGenerator, UuidGenerator};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Region store and tree edits
    pub chart: ChartService,

    /// Shared-link snapshots
    pub share: ShareService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(UuidGenerator))
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// The data directory is created if it does not exist yet.
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
    ) -> InfraResult<Self> {
        fs.create_dir_all(&settings.data_dir)
            .map_err(|e| InfraError::data_dir(&settings.data_dir, e))?;
        let settings = Arc::new(settings);
        let chart = ChartService::new(
            Arc::clone(&fs),
            ids,
            Engine::new(settings.zoning),
            settings.regions_path(),
        );
        let share = ShareService::new(Arc::clone(&fs), settings.shared_path());

        Ok(Self {
            settings,
            fs,
            chart,
            share,
        })
    }
}
