//! High-level service facade combining all sources.

use std::sync::Arc;

use tracing::debug;

use crate::location::Location;
use crate::model::RegionId;
use crate::plugin::SourceRegistry;
use crate::ports::PortError;

/// Public entry point for listing regions and loading their centers.
pub struct RecyclingService {
    registry: Arc<SourceRegistry>,
}

impl RecyclingService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self { registry }
    }

    /// List all available regions and their display names.
    #[must_use]
    pub fn regions(&self) -> Vec<(RegionId, String)> {
        self.registry
            .regions()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Load every center of a region, parsing schedules up front.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the region is unsupported, the source cannot
    /// be read, or any record is malformed. A single bad record fails the whole
    /// load.
    pub fn load_centers(&self, region: &RegionId) -> Result<Vec<Location>, PortError> {
        let plugin = self.registry.plugin(region)?;
        let centers = plugin
            .center_port
            .centers()?
            .into_iter()
            .map(Location::new)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(%region, count = centers.len(), "loaded recycling centers");
        Ok(centers)
    }
}
