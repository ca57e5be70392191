//! Registry for all region sources.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{RegionId, RegionMeta};
use crate::ports::{CenterPort, PortError};

/// Source bundle serving a single region.
pub struct RegionPlugin {
    /// Static metadata describing the region.
    pub meta: RegionMeta,
    /// Implementation for loading centers.
    pub center_port: Arc<dyn CenterPort>,
}

/// Registry that resolves plugins by region identifier.
pub struct SourceRegistry {
    plugins: BTreeMap<RegionId, RegionPlugin>,
}

impl SourceRegistry {
    /// Build a registry from the provided plugin list.
    ///
    /// A later plugin replaces an earlier one with the same region id.
    #[must_use]
    pub fn new(plugins: Vec<RegionPlugin>) -> Self {
        let plugins = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self { plugins }
    }

    /// Return metadata for all registered regions, ordered by id.
    #[must_use]
    pub fn regions(&self) -> Vec<RegionMeta> {
        self.plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect()
    }

    /// Look up a plugin for the given region.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnsupportedRegion`] when no plugin is registered.
    pub fn plugin(&self, region: &RegionId) -> Result<&RegionPlugin, PortError> {
        self.plugins.get(region).ok_or(PortError::UnsupportedRegion)
    }
}
