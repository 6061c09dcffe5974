//! Locker inventory: construction, allocation and package placement

use super::containment::ContainmentRelation;
use super::ids::{IdGenerator, UuidGenerator};
use super::locker::{Locker, LockerId, Package, PackageId};
use super::selection;
use super::size::SizeSpec;
use super::size_class::{SizeClass, SizeClassId};
use crate::error::{Error, Refused, Result};
use crate::telemetry;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Inventory of lockers grouped into size classes
///
/// Lockers live in one flat array for the life of the inventory and are
/// referred to by their position in it. Each size class keeps a stack of its
/// free positions plus a virtual capacity: its own free lockers plus the free
/// lockers of every strictly smaller class.
///
/// The inventory is not synchronized. Wrap it in
/// [`SharedInventory`](crate::shared::SharedInventory) to share it between threads.
#[derive(Debug, Default)]
pub struct Inventory {
    /// Every locker, indexed by position
    lockers: Vec<Locker>,
    /// Control blocks, indexed by size class id
    classes: Vec<SizeClass>,
    /// Normalized size → size class
    sizes: HashMap<SizeSpec, SizeClassId>,
    /// Which classes fit inside which
    containment: ContainmentRelation,
    lockers_by_id: HashMap<LockerId, usize>,
    lockers_by_package_id: HashMap<PackageId, usize>,
}

impl Inventory {
    /// Create an inventory with random UUID locker ids.
    ///
    /// Pass the desired locker sizes with a locker count for each.
    /// Denormalized and duplicate sizes are merged, so
    /// `[((1,2,3), 5), ((3,2,1), 5)]` is the same as `[((3,2,1), 10)]`.
    /// An empty input gives a valid, empty inventory.
    pub fn new<I>(locker_counts: I) -> Self
    where
        I: IntoIterator<Item = (SizeSpec, usize)>,
    {
        Self::with_generator(locker_counts, &mut UuidGenerator)
    }

    /// Create an inventory, drawing locker ids from `ids`
    ///
    /// # Panics
    ///
    /// Panics if `ids` hands out the same identifier twice.
    pub fn with_generator<I, G>(locker_counts: I, ids: &mut G) -> Self
    where
        I: IntoIterator<Item = (SizeSpec, usize)>,
        G: IdGenerator + ?Sized,
    {
        let locker_counts: Vec<(SizeSpec, usize)> = locker_counts.into_iter().collect();
        let total: usize = locker_counts.iter().map(|(_, count)| count).sum();

        let mut inv = Self {
            lockers: Vec::with_capacity(total),
            classes: Vec::with_capacity(locker_counts.len()),
            sizes: HashMap::with_capacity(locker_counts.len()),
            containment: ContainmentRelation::default(),
            lockers_by_id: HashMap::with_capacity(total),
            lockers_by_package_id: HashMap::with_capacity(total),
        };

        // O(n + L) for L lockers of n distinct sizes
        for (size, count) in locker_counts {
            let size = size.normalize();
            let class_id = match inv.sizes.get(&size) {
                Some(&id) => id,
                None => {
                    let id = SizeClassId(inv.classes.len() as u32);
                    inv.sizes.insert(size, id);
                    inv.classes.push(SizeClass::new(id, size, count));
                    id
                }
            };

            for _ in 0..count {
                let index = inv.lockers.len();
                let id = ids.next_id();
                if inv.lockers_by_id.insert(id.clone(), index).is_some() {
                    panic!("identifier generator returned duplicate locker id {}", id);
                }
                inv.lockers.push(Locker::new(id, class_id));
                inv.classes[class_id.index()].push_free(index);
            }
        }

        let sizes: Vec<SizeSpec> = inv.classes.iter().map(|c| c.size).collect();
        inv.containment = ContainmentRelation::build(&sizes);

        // O(n²): the relation already lists every smaller class directly
        for i in 0..inv.classes.len() {
            let smaller: usize = inv
                .containment
                .smaller_than(SizeClassId(i as u32))
                .iter()
                .map(|s| inv.classes[s.index()].free_count())
                .sum();
            let own = inv.classes[i].free_count();
            inv.classes[i].set_virtual_capacity(own + smaller);
        }

        info!(
            size_classes = inv.classes.len(),
            lockers = inv.lockers.len(),
            "Initialized locker inventory"
        );
        for class in &inv.classes {
            telemetry::record_class(class);
        }

        inv
    }

    /// Control block of a size class
    pub fn size_class(&self, id: SizeClassId) -> Option<&SizeClass> {
        self.classes.get(id.index())
    }

    /// Size class holding lockers of exactly this (normalized) size
    pub fn size_class_of(&self, size: &SizeSpec) -> Option<SizeClassId> {
        self.sizes.get(&size.normalize()).copied()
    }

    /// All size classes, in id order
    pub fn size_classes(&self) -> &[SizeClass] {
        &self.classes
    }

    pub fn containment(&self) -> &ContainmentRelation {
        &self.containment
    }

    /// All lockers, in index order
    pub fn lockers(&self) -> &[Locker] {
        &self.lockers
    }

    pub fn locker(&self, id: &LockerId) -> Option<&Locker> {
        self.lockers_by_id.get(id).map(|&i| &self.lockers[i])
    }

    /// Locker currently holding a package
    pub fn locker_of_package(&self, id: &PackageId) -> Option<&Locker> {
        self.lockers_by_package_id.get(id).map(|&i| &self.lockers[i])
    }

    /// A stored package, without removing it
    pub fn package(&self, id: &PackageId) -> Option<&Package> {
        self.locker_of_package(id).and_then(Locker::contents)
    }

    /// Total number of lockers
    pub fn len(&self) -> usize {
        self.lockers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lockers.is_empty()
    }

    /// Number of free lockers across all size classes
    pub fn free_count(&self) -> usize {
        self.classes.iter().map(SizeClass::free_count).sum()
    }

    /// Number of stored packages
    pub fn occupied_count(&self) -> usize {
        self.lockers_by_package_id.len()
    }

    /// Pick the size class a package of this (normalized) size should go to.
    ///
    /// O(n) for n size classes.
    pub fn most_suitable_size(&self, package_size: &SizeSpec) -> Result<SizeClassId> {
        selection::most_suitable(&self.classes, package_size)
    }

    /// Place a package into the inventory. O(n) for n size classes.
    ///
    /// Returns the id of the locker it went into. On failure nothing is
    /// changed and the package is handed back inside [`Refused`].
    pub fn deposit(&mut self, package: Package) -> std::result::Result<LockerId, Refused> {
        if self.lockers_by_package_id.contains_key(&package.id) {
            telemetry::record_deposit("duplicate");
            warn!(package = %package.id, "Refused deposit: duplicate package id");
            let reason = Error::DuplicateId(package.id.clone());
            return Err(Refused::new(reason, package));
        }

        let class_id = match self.most_suitable_size(&package.size.normalize()) {
            Ok(id) => id,
            Err(reason) => {
                telemetry::record_deposit("no_fit");
                warn!(package = %package.id, size = %package.size, "Refused deposit: {}", reason);
                return Err(Refused::new(reason, package));
            }
        };

        let index = self.classes[class_id.index()]
            .peek_free()
            .expect("selected size class has a free locker");
        let package_id = package.id.clone();
        if let Err(refused) = self.lockers[index].put(package) {
            telemetry::record_deposit("rejected");
            warn!(package = %package_id, "Refused deposit: {}", refused.reason);
            return Err(refused);
        }

        let allocated = self.allocate_locker(class_id);
        debug_assert_eq!(allocated, index);
        self.lockers_by_package_id.insert(package_id.clone(), index);
        telemetry::record_deposit("stored");

        let locker_id = self.lockers[index].id.clone();
        debug!(package = %package_id, locker = %locker_id, class = %class_id, "Deposited package");
        Ok(locker_id)
    }

    /// Remove a package from the inventory
    pub fn retrieve(&mut self, package: &Package) -> Result<Package> {
        self.retrieve_by_package_id(&package.id)
    }

    /// Remove a package from the inventory, looked up by its own id
    pub fn retrieve_by_package_id(&mut self, id: &PackageId) -> Result<Package> {
        let index = self.lookup(self.lockers_by_package_id.get(id).copied(), id.as_str())?;
        self.retrieve_at(index)
    }

    /// Remove the package held by a locker
    pub fn retrieve_by_locker_id(&mut self, id: &LockerId) -> Result<Package> {
        let index = self.lookup(self.lockers_by_id.get(id).copied(), id.as_str())?;
        self.retrieve_at(index)
    }

    fn lookup(&self, index: Option<usize>, id: &str) -> Result<usize> {
        index.ok_or_else(|| {
            telemetry::record_retrieval("unknown_id");
            Error::UnknownId(id.to_string())
        })
    }

    /// O(n) for n size classes
    fn retrieve_at(&mut self, index: usize) -> Result<Package> {
        let package = self.lockers[index].fetch().inspect_err(|_| {
            telemetry::record_retrieval("empty");
        })?;

        self.deallocate_locker(index);
        self.lockers_by_package_id.remove(&package.id);
        telemetry::record_retrieval("retrieved");

        debug!(package = %package.id, locker = %self.lockers[index].id, "Retrieved package");
        Ok(package)
    }

    /// Reserve a locker of the given size class and return its index.
    ///
    /// The locker leaves the free list immediately and the virtual capacities
    /// of the class and every class containing it drop by one.
    ///
    /// # Panics
    ///
    /// Panics if the class does not exist or has no free locker. Callers are
    /// expected to have picked the class with [`Inventory::most_suitable_size`].
    pub fn allocate_locker(&mut self, id: SizeClassId) -> usize {
        let class = self
            .classes
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("allocate from unknown size class {}", id));
        let index = class
            .pop_free()
            .unwrap_or_else(|| panic!("allocate from full size class {}", id));

        self.adjust_virtual_capacity(id, -1);
        debug!(class = %id, locker = index, "Allocated locker");
        index
    }

    /// Return a locker to its size class's free list.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn deallocate_locker(&mut self, index: usize) {
        let id = self.lockers[index].size_class;
        self.classes[id.index()].push_free(index);
        self.adjust_virtual_capacity(id, 1);
        debug!(class = %id, locker = index, "Freed locker");
    }

    /// Add `delta` to the virtual capacity of a class and of every class that contains it
    ///
    /// # Panics
    ///
    /// Panics if the class does not exist.
    pub fn adjust_virtual_capacity(&mut self, id: SizeClassId, delta: isize) {
        assert!(
            id.index() < self.classes.len(),
            "adjust virtual capacity of unknown size class {}",
            id
        );

        self.classes[id.index()].adjust_virtual_capacity(delta);
        telemetry::record_class(&self.classes[id.index()]);
        for &other in self.containment.larger_than(id) {
            self.classes[other.index()].adjust_virtual_capacity(delta);
            telemetry::record_class(&self.classes[other.index()]);
        }
    }

    /// Capacity report for every size class
    pub fn snapshot(&self) -> Vec<SizeClassSnapshot> {
        let mut totals = vec![0usize; self.classes.len()];
        for locker in &self.lockers {
            totals[locker.size_class.index()] += 1;
        }

        self.classes
            .iter()
            .map(|c| SizeClassSnapshot {
                id: c.id,
                size: c.size,
                volume: c.size.volume(),
                total_lockers: totals[c.id.index()],
                free_lockers: c.free_count(),
                virtual_capacity: c.virtual_capacity(),
                contains: self.containment.smaller_than(c.id).to_vec(),
                contained_by: self.containment.larger_than(c.id).to_vec(),
            })
            .collect()
    }

    /// Get statistics about the inventory
    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            size_classes: self.classes.len(),
            total_lockers: self.lockers.len(),
            free_lockers: self.free_count(),
            occupied_lockers: self.occupied_count(),
        }
    }

    /// Verify the internal bookkeeping.
    ///
    /// Walks every structure, so it is O(n² + L); meant for tests and health checks.
    pub fn check_invariants(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::Invariant(msg));

        // Size table and control table agree
        if self.sizes.len() != self.classes.len() {
            return fail(format!(
                "{} sizes but {} size classes",
                self.sizes.len(),
                self.classes.len()
            ));
        }
        for (i, class) in self.classes.iter().enumerate() {
            if class.id.index() != i {
                return fail(format!("size class at {} has id {}", i, class.id));
            }
            if self.sizes.get(&class.size) != Some(&class.id) {
                return fail(format!("size {} does not map back to {}", class.size, class.id));
            }
        }

        // Free lists only hold empty lockers of their own class, each once
        let mut seen = HashSet::new();
        for class in &self.classes {
            for &index in class.free_lockers() {
                let Some(locker) = self.lockers.get(index) else {
                    return fail(format!("{} lists out-of-range locker {}", class.id, index));
                };
                if locker.size_class != class.id {
                    return fail(format!("{} lists locker {} of {}", class.id, index, locker.size_class));
                }
                if !locker.is_empty() {
                    return fail(format!("{} lists occupied locker {}", class.id, index));
                }
                if !seen.insert(index) {
                    return fail(format!("locker {} is free more than once", index));
                }
            }
        }

        // Reverse maps
        if self.lockers_by_id.len() != self.lockers.len() {
            return fail(format!(
                "{} locker ids for {} lockers",
                self.lockers_by_id.len(),
                self.lockers.len()
            ));
        }
        for (id, &index) in &self.lockers_by_id {
            if self.lockers.get(index).map(|l| &l.id) != Some(id) {
                return fail(format!("locker id {} maps to wrong index {}", id, index));
            }
        }
        let mut held = HashSet::new();
        for (id, &index) in &self.lockers_by_package_id {
            let stored = self.lockers.get(index).and_then(Locker::contents);
            if stored.map(|p| &p.id) != Some(id) {
                return fail(format!("package {} maps to locker {} which does not hold it", id, index));
            }
            if !held.insert(index) {
                return fail(format!("locker {} holds more than one package id", index));
            }
        }

        // Locker ↔ package references are mutual, and every locker is either free or held
        for (index, locker) in self.lockers.iter().enumerate() {
            match locker.contents() {
                Some(p) if p.stored_in() != Some(&locker.id) => {
                    return fail(format!("package {} does not point back to locker {}", p.id, locker.id));
                }
                Some(_) if !held.contains(&index) => {
                    return fail(format!("locker {} holds an unregistered package", locker.id));
                }
                None if !seen.contains(&index) => {
                    return fail(format!("empty locker {} is not on a free list", locker.id));
                }
                _ => {}
            }
        }

        // Containment is the complete comparability graph
        for a in &self.classes {
            for b in &self.classes {
                let expected = a.id != b.id && a.size.contains(&b.size);
                if self.containment.strictly_contains(a.id, b.id) != expected {
                    return fail(format!("containment edge {} → {} is wrong", a.id, b.id));
                }
                if expected != self.containment.larger_than(b.id).contains(&a.id) {
                    return fail(format!("containment edge {} ← {} is one-sided", b.id, a.id));
                }
            }
        }

        // Virtual capacity matches its definition
        for class in &self.classes {
            let expected = class.free_count()
                + self
                    .containment
                    .smaller_than(class.id)
                    .iter()
                    .map(|s| self.classes[s.index()].free_count())
                    .sum::<usize>();
            if class.virtual_capacity() != expected {
                return fail(format!(
                    "{} has virtual capacity {}, expected {}",
                    class.id,
                    class.virtual_capacity(),
                    expected
                ));
            }
        }

        Ok(())
    }
}

/// Capacity report for one size class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeClassSnapshot {
    pub id: SizeClassId,
    pub size: SizeSpec,
    pub volume: i64,
    pub total_lockers: usize,
    pub free_lockers: usize,
    pub virtual_capacity: usize,
    /// Classes strictly smaller than this one
    pub contains: Vec<SizeClassId>,
    /// Classes strictly larger than this one
    pub contained_by: Vec<SizeClassId>,
}

/// Statistics for the inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub size_classes: usize,
    pub total_lockers: usize,
    pub free_lockers: usize,
    pub occupied_lockers: usize,
}
