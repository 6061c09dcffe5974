//! Locker Inventory
//!
//! Assigns packages of any size to lockers drawn from a fixed pool of
//! discrete locker sizes.
//!
//! # Architecture
//!
//! ```text
//! Inventory
//!   ├─→ SizeClass(1x1x1)  → Free: [0, 1, 2]   VC: 3
//!   ├─→ SizeClass(5x1x1)  → Free: [3]         VC: 4
//!   ├─→ SizeClass(4x4x1)  → Free: []          VC: 3
//!   └─→ SizeClass(5x5x5)  → Free: [7, 8]      VC: 6
//!
//! ContainmentRelation (built once, O(n²))
//!   └─→ 5x5x5 ⊃ {5x1x1, 4x4x1, 1x1x1}
//!   └─→ 5x1x1 ⊃ {1x1x1}
//!   └─→ 4x4x1 ⊃ {1x1x1}
//!
//! Reverse lookups
//!   └─→ LockerId  → locker index
//!   └─→ PackageId → locker index
//! ```
//!
//! The virtual capacity (VC) of a class counts its own free lockers plus the
//! free lockers of every class that fits inside it. A new package goes to the
//! class with the highest VC that can hold it, then the smallest volume.
//! Deposit and retrieve are O(n) for n distinct sizes.

pub mod allocator;
pub mod containment;
pub mod ids;
pub mod locker;
pub mod selection;
pub mod size;
pub mod size_class;

pub use allocator::{Inventory, InventoryStats, SizeClassSnapshot};
pub use containment::ContainmentRelation;
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use locker::{Locker, LockerId, Package, PackageId};
pub use size::SizeSpec;
pub use size_class::{SizeClass, SizeClassId};
