//! Inventory configuration
//!
//! A configuration file lists locker groups and, optionally, a package
//! workload. Groups may repeat a size in any orientation; the inventory merges
//! them.
//!
//! ```toml
//! [[lockers]]
//! length = 4
//! width = 1
//! height = 1
//! count = 10
//!
//! [[packages]]
//! id = "parcel-1"
//! length = 1
//! width = 2
//! height = 1
//! ```
//!
//! Any key can be overridden from the environment with the `LOCKERBANK__`
//! prefix, using `__` as the path separator.

use crate::error::{Error, Result};
use crate::inventory::{IdGenerator, Inventory, Package, SizeSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "LOCKERBANK";

/// A group of identical lockers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerGroup {
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub count: i64,
}

impl LockerGroup {
    pub fn size(&self) -> SizeSpec {
        SizeSpec::new(self.length, self.width, self.height)
    }
}

/// A package to deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub id: String,
    pub length: i32,
    pub width: i32,
    pub height: i32,
}

impl PackageSpec {
    pub fn to_package(&self) -> Package {
        Package::new(self.id.as_str(), (self.length, self.width, self.height))
    }
}

/// Locker layout plus an optional package workload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub lockers: Vec<LockerGroup>,
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

impl InventoryConfig {
    /// Load from a file (format chosen by extension) with environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading inventory configuration");

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse an inline TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self =
            toml::from_str(s).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(group) = self.lockers.iter().find(|g| g.count < 0) {
            return Err(Error::Config(format!(
                "Locker group {} has negative count {}",
                group.size(),
                group.count
            )));
        }
        if self.packages.iter().any(|p| p.id.is_empty()) {
            return Err(Error::Config("Package with empty id".to_string()));
        }
        Ok(())
    }

    /// Construction input for [`Inventory::new`]. Repeated sizes are kept as is.
    pub fn size_counts(&self) -> Vec<(SizeSpec, usize)> {
        self.lockers
            .iter()
            .map(|g| (g.size(), g.count.max(0) as usize))
            .collect()
    }

    /// Configured workload, in file order
    pub fn packages(&self) -> Vec<Package> {
        self.packages.iter().map(PackageSpec::to_package).collect()
    }

    pub fn build_inventory(&self) -> Inventory {
        Inventory::new(self.size_counts())
    }

    pub fn build_inventory_with<G: IdGenerator + ?Sized>(&self, ids: &mut G) -> Inventory {
        Inventory::with_generator(self.size_counts(), ids)
    }
}
