// Lockerbank - locker allocation engine
// Places packages of any size into the best-fitting locker size class

#![warn(rust_2018_idioms)]

pub mod config;
pub mod inventory;
pub mod shared;
pub mod telemetry;

// Re-exports for convenience
pub use self::config::InventoryConfig;
pub use inventory::{Inventory, Locker, LockerId, Package, PackageId, SizeClassId, SizeSpec};
pub use shared::SharedInventory;

/// Lockerbank error types
pub mod error {
    use crate::inventory::{Package, PackageId, SizeSpec};
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        #[error("Duplicate package ID: {0}")]
        DuplicateId(PackageId),

        #[error("No available lockers which can fit package of size {0}")]
        NoAvailableLocker(SizeSpec),

        #[error("Unknown ID: {0}")]
        UnknownId(String),

        #[error("Locker is not empty")]
        LockerNotEmpty,

        #[error("Package already in locker")]
        AlreadyStored,

        #[error("Tried to fetch from empty locker")]
        EmptyLocker,

        #[error("Configuration error: {0}")]
        Config(String),

        #[error("Invariant violated: {0}")]
        Invariant(String),
    }

    /// A package that could not be placed, handed back with the reason
    #[derive(Error, Debug)]
    #[error("{reason}")]
    pub struct Refused {
        pub reason: Error,
        pub package: Package,
    }

    impl Refused {
        pub fn new(reason: Error, package: Package) -> Self {
            Self { reason, package }
        }

        /// Take the package back
        pub fn into_package(self) -> Package {
            self.package
        }
    }

    impl From<Refused> for Error {
        fn from(refused: Refused) -> Self {
            refused.reason
        }
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::error::{Error, Refused};
    use super::*;

    #[test]
    fn test_version_format() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_refused_converts_to_error() {
        fn deposit(inv: &mut Inventory, pkg: Package) -> error::Result<LockerId> {
            Ok(inv.deposit(pkg)?)
        }

        let mut inv = Inventory::new(vec![(SizeSpec::new(1, 1, 1), 1)]);
        let err = deposit(&mut inv, Package::new("P1", (2, 2, 2))).unwrap_err();
        assert_eq!(err, Error::NoAvailableLocker(SizeSpec::new(2, 2, 2)));

        let refused = Refused::new(Error::EmptyLocker, Package::new("P2", (1, 1, 1)));
        assert_eq!(refused.to_string(), "Tried to fetch from empty locker");
        assert_eq!(refused.into_package().id, PackageId::new("P2"));
    }
}
