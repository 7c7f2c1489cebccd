// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report entries and the reporter they are forwarded to.

use crate::test_unit::{FailureCause, TestHandle};
use std::sync::Arc;

/// An immutable description of a single test lifecycle event.
///
/// Entries are built fresh for every notification and handed over to the [`Reporter`] by value.
#[derive(Clone, Debug)]
pub struct ReportEntry {
    source: TestHandle,
    name: String,
    group: String,
    cause: Option<FailureCause>,
}

impl ReportEntry {
    /// Creates a new entry for a lifecycle event without a failure.
    ///
    /// The group is the test's runtime type name.
    pub fn new(source: TestHandle) -> Self {
        let name = source.display_name();
        let group = source.type_name().to_owned();
        Self {
            source,
            name,
            group,
            cause: None,
        }
    }

    /// Creates a new entry for an error or a failure.
    ///
    /// The group is the cause's own string form, which downstream consumers treat as the failure
    /// message.
    pub fn with_cause(source: TestHandle, cause: FailureCause) -> Self {
        let name = source.display_name();
        let group = cause.to_string();
        Self {
            source,
            name,
            group,
            cause: Some(cause),
        }
    }

    /// Returns the test this entry is about.
    pub fn source(&self) -> &TestHandle {
        &self.source
    }

    /// Returns the display name of the test.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the classification of this entry.
    ///
    /// For entries without a cause this is the test's type name; for errors and failures it's
    /// the failure message.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the cause of the error or failure, if any.
    pub fn cause(&self) -> Option<&FailureCause> {
        self.cause.as_ref()
    }
}

/// The reporting collaborator that report entries are forwarded to.
///
/// Methods take `&self`: the adapter may call into the reporter from several threads at once and
/// doesn't serialize those calls. Reporters that need mutable state must synchronize internally.
pub trait Reporter {
    /// The error returned when an entry can't be reported.
    type Error;

    /// Reports that a test is starting.
    fn test_starting(&self, entry: ReportEntry) -> Result<(), Self::Error>;

    /// Reports that a test finished without errors or failures.
    fn test_succeeded(&self, entry: ReportEntry) -> Result<(), Self::Error>;

    /// Reports that a test failed an assertion.
    fn test_failed(&self, entry: ReportEntry) -> Result<(), Self::Error>;

    /// Reports that a test hit an unexpected error.
    fn test_errored(&self, entry: ReportEntry) -> Result<(), Self::Error>;
}

macro_rules! forward_reporter {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<R: Reporter + ?Sized> Reporter for $ty {
                type Error = R::Error;

                #[inline]
                fn test_starting(&self, entry: ReportEntry) -> Result<(), Self::Error> {
                    (**self).test_starting(entry)
                }

                #[inline]
                fn test_succeeded(&self, entry: ReportEntry) -> Result<(), Self::Error> {
                    (**self).test_succeeded(entry)
                }

                #[inline]
                fn test_failed(&self, entry: ReportEntry) -> Result<(), Self::Error> {
                    (**self).test_failed(entry)
                }

                #[inline]
                fn test_errored(&self, entry: ReportEntry) -> Result<(), Self::Error> {
                    (**self).test_errored(entry)
                }
            }
        )*
    };
}

forward_reporter!(&R, Box<R>, Arc<R>);
