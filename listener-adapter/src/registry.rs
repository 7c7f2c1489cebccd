// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracking of tests that have failed but not yet ended.
//!
//! The main type here is [`FailureRegistry`], a set of [`FailureKey`]s that can be shared across
//! threads.

use crate::{errors::InvalidStripeCountError, test_unit::TestHandle};
use dashmap::DashMap;
use serde::Deserialize;
use std::{
    fmt,
    hash::{Hash, Hasher},
    thread::ThreadId,
};

/// Identifies a test run: one test instance executing on one thread.
///
/// # Equality
///
/// * The test component is compared by identity, via [`TestHandle::same_instance`]. Two distinct
///   test instances are different keys even if they compare equal as values.
/// * The thread component is compared by value.
///
/// Only the thread contributes to the hash. Concurrently failing tests on the same thread share a
/// hash bucket, which costs lookup time but never correctness.
#[derive(Clone)]
pub struct FailureKey {
    test: TestHandle,
    thread: ThreadId,
}

impl FailureKey {
    /// Creates a new key for the given test on the given thread.
    pub fn new(test: TestHandle, thread: ThreadId) -> Self {
        Self { test, thread }
    }

    /// Creates a new key for the given test on the current thread.
    pub fn current(test: TestHandle) -> Self {
        Self::new(test, std::thread::current().id())
    }

    /// Returns the test this key refers to.
    pub fn test(&self) -> &TestHandle {
        &self.test
    }

    /// Returns the thread this key refers to.
    pub fn thread(&self) -> ThreadId {
        self.thread
    }
}

impl PartialEq for FailureKey {
    fn eq(&self, other: &Self) -> bool {
        self.test.same_instance(&other.test) && self.thread == other.thread
    }
}

impl Eq for FailureKey {}

impl Hash for FailureKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.thread.hash(state);
    }
}

impl fmt::Debug for FailureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureKey")
            .field("test", &self.test)
            .field("thread", &self.thread)
            .finish()
    }
}

/// The number of shards a [`FailureRegistry`] is split into.
///
/// This is always a power of two greater than 1.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "usize")]
pub struct RegistryStripes(usize);

impl RegistryStripes {
    /// The stripe count used by [`FailureRegistry::default`].
    pub const DEFAULT: Self = Self(16);

    /// Validates a stripe count.
    pub fn new(stripes: usize) -> Result<Self, InvalidStripeCountError> {
        if stripes > 1 && stripes.is_power_of_two() {
            Ok(Self(stripes))
        } else {
            Err(InvalidStripeCountError::new(stripes))
        }
    }

    /// Returns the stripe count as a `usize`.
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for RegistryStripes {
    type Error = InvalidStripeCountError;

    fn try_from(stripes: usize) -> Result<Self, Self::Error> {
        Self::new(stripes)
    }
}

impl Default for RegistryStripes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RegistryStripes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A concurrent set of tests that have reported an error or a failure and haven't ended yet.
///
/// Backed by a sharded [`DashMap`]. A key's shard is picked by its thread, so tests running on
/// different threads mostly touch different locks.
pub struct FailureRegistry {
    records: DashMap<FailureKey, ()>,
    stripes: RegistryStripes,
}

impl FailureRegistry {
    /// Creates a new, empty registry with the given number of stripes.
    pub fn new(stripes: RegistryStripes) -> Self {
        Self {
            records: DashMap::with_shard_amount(stripes.get()),
            stripes,
        }
    }

    /// Returns the number of stripes in this registry.
    pub fn stripe_count(&self) -> usize {
        self.stripes.get()
    }

    /// Records a failure for this key.
    ///
    /// Returns true if the key wasn't already present. Inserting a key twice leaves a single
    /// record behind.
    pub fn insert(&self, key: FailureKey) -> bool {
        self.records.insert(key, ()).is_none()
    }

    /// Removes the record for this key.
    ///
    /// Returns true if a record was present.
    pub fn remove(&self, key: &FailureKey) -> bool {
        self.records.remove(key).is_some()
    }

    /// Returns true if a record for this key is present.
    pub fn contains(&self, key: &FailureKey) -> bool {
        self.records.contains_key(key)
    }

    /// Returns the number of records across all stripes.
    ///
    /// Under concurrent mutation this is a best-effort count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for FailureRegistry {
    fn default() -> Self {
        Self::new(RegistryStripes::DEFAULT)
    }
}

impl fmt::Debug for FailureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureRegistry")
            .field("stripes", &self.stripes)
            .field("len", &self.len())
            .finish()
    }
}
