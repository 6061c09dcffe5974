//! Lockers, packages and the put/fetch state machine

use super::size::SizeSpec;
use super::size_class::SizeClassId;
use crate::error::{Error, Refused, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a locker. Expected to be unique within an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LockerId(String);

impl LockerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LockerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LockerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a package. Expected to be unique within an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A package of arbitrary size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    /// Requested size, normalized or not
    pub size: SizeSpec,
    /// Locker currently holding this package
    stored_in: Option<LockerId>,
}

impl Package {
    /// Create a package that is not stored anywhere
    pub fn new(id: impl Into<PackageId>, size: impl Into<SizeSpec>) -> Self {
        Self {
            id: id.into(),
            size: size.into(),
            stored_in: None,
        }
    }

    pub fn stored_in(&self) -> Option<&LockerId> {
        self.stored_in.as_ref()
    }

    pub fn is_stored(&self) -> bool {
        self.stored_in.is_some()
    }
}

/// A single locker. Lockers come in discrete sizes and never change size.
#[derive(Debug, Clone)]
pub struct Locker {
    pub id: LockerId,
    pub size_class: SizeClassId,
    contents: Option<Package>,
}

impl Locker {
    /// Create an empty locker
    pub fn new(id: LockerId, size_class: SizeClassId) -> Self {
        Self {
            id,
            size_class,
            contents: None,
        }
    }

    /// Package currently in this locker
    pub fn contents(&self) -> Option<&Package> {
        self.contents.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    /// Put a package into this locker.
    ///
    /// Fails if the locker is occupied or the package is already stored
    /// elsewhere. The package is handed back on failure.
    pub fn put(&mut self, mut package: Package) -> std::result::Result<(), Refused> {
        if self.contents.is_some() {
            return Err(Refused::new(Error::LockerNotEmpty, package));
        }
        if package.stored_in.is_some() {
            return Err(Refused::new(Error::AlreadyStored, package));
        }

        package.stored_in = Some(self.id.clone());
        self.contents = Some(package);
        Ok(())
    }

    /// Take the package out of this locker
    pub fn fetch(&mut self) -> Result<Package> {
        let mut package = self.contents.take().ok_or(Error::EmptyLocker)?;
        package.stored_in = None;
        Ok(package)
    }
}
