// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test helpers shared by unit tests in this crate.

use crate::{
    report::{ReportEntry, Reporter},
    test_unit::TestUnit,
};
use std::{fmt, sync::Mutex, thread::ThreadId};
use thiserror::Error;

/// A test that is identified by its name only.
///
/// Two `NamedTest`s with the same name compare equal, which makes them handy for checking that
/// the adapter tracks tests by identity rather than by value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct NamedTest {
    name: String,
}

impl NamedTest {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for NamedTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TestUnit for NamedTest {}

#[derive(Clone, Debug, Error)]
#[error("assertion failed: {0}")]
pub(crate) struct AssertionFailed(String);

impl AssertionFailed {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RecordedKind {
    Starting,
    Succeeded,
    Failed,
    Errored,
}

#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub(crate) kind: RecordedKind,
    pub(crate) entry: ReportEntry,
    pub(crate) thread: ThreadId,
}

#[derive(Debug, Error)]
#[error("reporter is closed")]
pub(crate) struct ReporterClosed;

/// A reporter that records every entry it receives.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    recorded: Mutex<Vec<Recorded>>,
    fail_on: Option<RecordedKind>,
}

impl RecordingReporter {
    /// Returns a reporter that fails every call of the given kind without recording it.
    pub(crate) fn failing_on(kind: RecordedKind) -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            fail_on: Some(kind),
        }
    }

    pub(crate) fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub(crate) fn kinds(&self) -> Vec<RecordedKind> {
        self.recorded().into_iter().map(|r| r.kind).collect()
    }

    pub(crate) fn names_and_kinds(&self) -> Vec<(String, RecordedKind)> {
        self.recorded()
            .into_iter()
            .map(|r| (r.entry.name().to_owned(), r.kind))
            .collect()
    }

    fn record(&self, kind: RecordedKind, entry: ReportEntry) -> Result<(), ReporterClosed> {
        if self.fail_on == Some(kind) {
            return Err(ReporterClosed);
        }
        self.recorded.lock().unwrap().push(Recorded {
            kind,
            entry,
            thread: std::thread::current().id(),
        });
        Ok(())
    }
}

impl Reporter for RecordingReporter {
    type Error = ReporterClosed;

    fn test_starting(&self, entry: ReportEntry) -> Result<(), Self::Error> {
        self.record(RecordedKind::Starting, entry)
    }

    fn test_succeeded(&self, entry: ReportEntry) -> Result<(), Self::Error> {
        self.record(RecordedKind::Succeeded, entry)
    }

    fn test_failed(&self, entry: ReportEntry) -> Result<(), Self::Error> {
        self.record(RecordedKind::Failed, entry)
    }

    fn test_errored(&self, entry: ReportEntry) -> Result<(), Self::Error> {
        self.record(RecordedKind::Errored, entry)
    }
}
