//! Thread-safe handle around an [`Inventory`]
//!
//! The inventory itself is single-writer. Selection reads the free lists and
//! placement then mutates them, so the pair has to run under one exclusive lock
//! or two callers could race for the same locker. Every method here holds the
//! lock for the whole operation.

use crate::error::{Refused, Result};
use crate::inventory::{
    Inventory, InventoryStats, LockerId, Package, PackageId, SizeClassSnapshot, SizeSpec,
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Cloneable, lock-protected inventory handle
#[derive(Debug, Clone)]
pub struct SharedInventory {
    inner: Arc<Mutex<Inventory>>,
}

impl SharedInventory {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inventory)),
        }
    }

    /// Build an inventory from a size → count table and wrap it
    pub fn from_counts<I>(locker_counts: I) -> Self
    where
        I: IntoIterator<Item = (SizeSpec, usize)>,
    {
        Self::new(Inventory::new(locker_counts))
    }

    pub fn deposit(&self, package: Package) -> std::result::Result<LockerId, Refused> {
        self.inner.lock().deposit(package)
    }

    pub fn retrieve_by_package_id(&self, id: &PackageId) -> Result<Package> {
        self.inner.lock().retrieve_by_package_id(id)
    }

    pub fn retrieve_by_locker_id(&self, id: &LockerId) -> Result<Package> {
        self.inner.lock().retrieve_by_locker_id(id)
    }

    pub fn snapshot(&self) -> Vec<SizeClassSnapshot> {
        self.inner.lock().snapshot()
    }

    pub fn stats(&self) -> InventoryStats {
        self.inner.lock().stats()
    }

    /// Exclusive access for multi-step operations
    pub fn lock(&self) -> MutexGuard<'_, Inventory> {
        self.inner.lock()
    }
}

impl From<Inventory> for SharedInventory {
    fn from(inventory: Inventory) -> Self {
        Self::new(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_concurrent_deposits_never_share_a_locker() {
        let shared = SharedInventory::from_counts(vec![
            (SizeSpec::new(1, 1, 1), 20),
            (SizeSpec::new(4, 4, 4), 20),
        ]);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..10)
                        .map(|i| {
                            let pkg = Package::new(format!("t{}-p{}", t, i), (1, 1, 1));
                            shared.deposit(pkg).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut lockers = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(lockers.insert(id), "locker handed out twice");
            }
        }

        assert_eq!(lockers.len(), 40);
        assert_eq!(shared.stats().occupied_lockers, 40);
        shared.lock().check_invariants().unwrap();
    }

    #[test]
    fn test_round_trip_through_handle() {
        let shared = SharedInventory::from(Inventory::new(vec![(SizeSpec::new(2, 2, 2), 1)]));
        let locker = shared.deposit(Package::new("P1", (2, 1, 1))).unwrap();

        let pkg = shared.retrieve_by_locker_id(&locker).unwrap();
        assert_eq!(pkg.id, PackageId::new("P1"));
        assert!(shared.retrieve_by_package_id(&pkg.id).is_err());
        assert_eq!(shared.snapshot()[0].free_lockers, 1);
    }
}
