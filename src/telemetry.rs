//! Inventory metrics
//!
//! Emitted through the `metrics` facade. Nothing is recorded unless the host
//! application installs a recorder.
//!
//! - `lockerbank_deposits_total{outcome}`: stored, duplicate, no_fit, rejected
//! - `lockerbank_retrievals_total{outcome}`: retrieved, unknown_id, empty
//! - `lockerbank_free_lockers{class}` / `lockerbank_virtual_capacity{class}`

use crate::inventory::SizeClass;
use metrics::{counter, describe_counter, describe_gauge, gauge, Unit};

pub const DEPOSITS_TOTAL: &str = "lockerbank_deposits_total";
pub const RETRIEVALS_TOTAL: &str = "lockerbank_retrievals_total";
pub const FREE_LOCKERS: &str = "lockerbank_free_lockers";
pub const VIRTUAL_CAPACITY: &str = "lockerbank_virtual_capacity";

/// Register metric descriptions with the installed recorder
pub fn describe() {
    describe_counter!(DEPOSITS_TOTAL, Unit::Count, "Package deposits by outcome");
    describe_counter!(RETRIEVALS_TOTAL, Unit::Count, "Package retrievals by outcome");
    describe_gauge!(FREE_LOCKERS, Unit::Count, "Free lockers per size class");
    describe_gauge!(
        VIRTUAL_CAPACITY,
        Unit::Count,
        "Free lockers in a size class and every smaller class"
    );
}

pub(crate) fn record_deposit(outcome: &'static str) {
    counter!(DEPOSITS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_retrieval(outcome: &'static str) {
    counter!(RETRIEVALS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_class(class: &SizeClass) {
    let label = class.size.to_string();
    gauge!(FREE_LOCKERS, "class" => label.clone()).set(class.free_count() as f64);
    gauge!(VIRTUAL_CAPACITY, "class" => label).set(class.virtual_capacity() as f64);
}
