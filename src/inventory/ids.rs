//! Locker identifier generation

use super::locker::LockerId;
use uuid::Uuid;

/// Source of globally unique locker identifiers.
///
/// The inventory never inspects the structure of the identifiers it is given.
pub trait IdGenerator {
    fn next_id(&mut self) -> LockerId;
}

/// Random UUIDv4 identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> LockerId {
        LockerId::new(Uuid::new_v4().to_string())
    }
}

/// Predictable identifiers of the form `{prefix}{n}`, counting from 1
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("locker-")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> LockerId {
        let id = LockerId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> LockerId,
{
    fn next_id(&mut self) -> LockerId {
        self()
    }
}
