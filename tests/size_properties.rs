//! Property-based tests for size normalization, containment and inventory bookkeeping

use lockerbank::inventory::{Inventory, Package, SequentialIds, SizeSpec};
use proptest::prelude::*;

/// Dimensions away from i32::MIN, which has no absolute value
fn dimension() -> impl Strategy<Value = i32> {
    -10_000i32..=10_000
}

fn size() -> impl Strategy<Value = SizeSpec> {
    (dimension(), dimension(), dimension()).prop_map(|(l, w, h)| SizeSpec::new(l, w, h))
}

/// Small positive sizes so that containment actually happens
fn locker_size() -> impl Strategy<Value = SizeSpec> {
    (1i32..=6, 1i32..=6, 1i32..=6).prop_map(|(l, w, h)| SizeSpec::new(l, w, h))
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in size()) {
        let once = s.normalize();
        prop_assert_eq!(once.normalize(), once);
    }

    #[test]
    fn normalize_is_non_negative_and_descending(s in size()) {
        let n = s.normalize();
        prop_assert!(n.height >= 0);
        prop_assert!(n.length >= n.width && n.width >= n.height);
        prop_assert!(n.is_normalized());
    }

    #[test]
    fn normalize_ignores_orientation_and_sign(l in dimension(), w in dimension(), h in dimension()) {
        let expected = SizeSpec::new(l, w, h).normalize();
        for (a, b, c) in [(l, w, h), (w, h, l), (h, l, w), (w, l, h), (-l, h, w), (h, -w, -l)] {
            prop_assert_eq!(SizeSpec::new(a, b, c).normalize(), expected);
        }
    }

    #[test]
    fn volume_is_product_of_raw_dimensions(l in dimension(), w in dimension(), h in dimension()) {
        prop_assert_eq!(SizeSpec::new(l, w, h).volume(), l as i64 * w as i64 * h as i64);
    }

    #[test]
    fn contains_is_reflexive(s in size()) {
        let n = s.normalize();
        prop_assert!(n.contains(&n));
    }

    #[test]
    fn contains_checks_each_axis(a in size(), b in size()) {
        let (a, b) = (a.normalize(), b.normalize());
        let expected = a.length >= b.length && a.width >= b.width && a.height >= b.height;
        prop_assert_eq!(a.contains(&b), expected);
    }

    #[test]
    fn inventory_invariants_hold_through_random_traffic(
        lockers in prop::collection::vec((locker_size(), 0usize..4), 0..6),
        packages in prop::collection::vec(locker_size(), 0..30),
    ) {
        let mut inv = Inventory::with_generator(lockers, &mut SequentialIds::new("L"));
        prop_assert_eq!(inv.size_classes().len(), inv.snapshot().len());
        inv.check_invariants().unwrap();
        let initial: Vec<usize> = inv.size_classes().iter().map(|c| c.virtual_capacity()).collect();

        let mut stored = Vec::new();
        for (i, size) in packages.into_iter().enumerate() {
            let pkg = Package::new(format!("P{}", i), size);
            let free_before = inv.free_count();
            match inv.deposit(pkg.clone()) {
                Ok(locker) => {
                    prop_assert_eq!(inv.free_count(), free_before - 1);
                    stored.push((pkg, locker));
                }
                Err(refused) => {
                    prop_assert_eq!(inv.free_count(), free_before);
                    prop_assert_eq!(refused.package, pkg);
                }
            }
            prop_assert!(inv.free_count() <= inv.len());
            inv.check_invariants().unwrap();
        }

        for (pkg, _) in stored.into_iter().rev() {
            prop_assert_eq!(inv.retrieve_by_package_id(&pkg.id).unwrap(), pkg);
        }
        let after: Vec<usize> = inv.size_classes().iter().map(|c| c.virtual_capacity()).collect();
        prop_assert_eq!(initial, after);
        inv.check_invariants().unwrap();
    }
}
