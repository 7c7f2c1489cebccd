// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handles to running tests and to the causes of their failures.

use std::{error::Error, fmt, sync::Arc};

/// A unit of work that a test engine executes: a single test case or a suite of them.
///
/// The adapter only observes tests. It uses the [`Display`](fmt::Display) form as the test's
/// name and [`type_name`](Self::type_name) as its classification.
pub trait TestUnit: fmt::Display + Send + Sync + 'static {
    /// Returns the name of this test's runtime type.
    ///
    /// The default implementation returns the fully qualified Rust type name of the implementor.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A shared handle to a running [`TestUnit`].
///
/// Handles are compared by identity: two handles are the same test if and only if they point to
/// the same allocation. Two tests that happen to render and compare equal as values are still
/// different tests. For that reason `TestHandle` doesn't implement `PartialEq`; use
/// [`same_instance`](Self::same_instance) instead.
#[derive(Clone)]
pub struct TestHandle {
    inner: Arc<dyn TestUnit>,
}

impl TestHandle {
    /// Creates a new handle to a test, taking ownership of it.
    pub fn new(unit: impl TestUnit) -> Self {
        Self {
            inner: Arc::new(unit),
        }
    }

    /// Creates a new handle that shares an existing allocation.
    pub fn from_arc(inner: Arc<dyn TestUnit>) -> Self {
        Self { inner }
    }

    /// Returns the underlying test.
    pub fn unit(&self) -> &dyn TestUnit {
        &*self.inner
    }

    /// Returns the display name of the test.
    pub fn display_name(&self) -> String {
        self.inner.to_string()
    }

    /// Returns the name of the test's runtime type.
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    /// Returns true if both handles point to the same test instance.
    pub fn same_instance(&self, other: &TestHandle) -> bool {
        self.addr() == other.addr()
    }

    // The vtable half of the fat pointer is discarded: the same allocation may be reached through
    // different vtables across codegen units.
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.inner) as *const ()
    }
}

impl fmt::Debug for TestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestHandle")
            .field("name", &format_args!("{}", self.inner))
            .field("type_name", &self.inner.type_name())
            .field("addr", &self.addr())
            .finish()
    }
}

/// The cause of a test error or failure, as passed to `addError` or `addFailure`.
///
/// The string form of the cause doubles as the failure message in report entries.
#[derive(Clone)]
pub struct FailureCause {
    inner: Arc<dyn Error + Send + Sync>,
}

impl FailureCause {
    /// Creates a new failure cause from an error.
    pub fn new(error: impl Error + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Creates a failure cause that shares an existing error.
    pub fn from_arc(inner: Arc<dyn Error + Send + Sync>) -> Self {
        Self { inner }
    }

    /// Returns the underlying error.
    pub fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.inner
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
