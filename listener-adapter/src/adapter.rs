// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwards listener notifications to a reporter.
//!
//! The main type here is [`ListenerAdapter`], which is constructed via a
//! [`ListenerAdapterBuilder`] or [`ListenerAdapter::new`].

use crate::{
    config::AdapterConfig,
    errors::{AdapterArgument, DispatchError, InvalidArgumentError},
    listener::{ListenerArg, TestListener, dispatch},
    registry::{FailureKey, FailureRegistry, RegistryStripes},
    report::{ReportEntry, Reporter},
    test_unit::{FailureCause, TestHandle},
};
use camino::{Utf8Path, Utf8PathBuf};
use std::any::Any;
use tracing::{debug, trace};

/// The context a test binary was loaded in.
///
/// The adapter requires one to be present at construction but doesn't keep it around.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadContext {
    binary_path: Utf8PathBuf,
}

impl LoadContext {
    /// Creates a new load context for the test binary at this path.
    pub fn new(binary_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Returns the path to the test binary.
    pub fn binary_path(&self) -> &Utf8Path {
        &self.binary_path
    }
}

/// Listener adapter builder.
#[derive(Clone, Debug, Default)]
pub struct ListenerAdapterBuilder {
    registry_stripes: Option<RegistryStripes>,
}

impl ListenerAdapterBuilder {
    /// Sets the number of stripes in the failure registry.
    pub fn set_registry_stripes(&mut self, stripes: RegistryStripes) -> &mut Self {
        self.registry_stripes = Some(stripes);
        self
    }

    /// Applies settings from the adapter config.
    ///
    /// Settings that were already set on this builder take precedence.
    pub fn apply_config(&mut self, config: &AdapterConfig) -> &mut Self {
        if self.registry_stripes.is_none() {
            self.registry_stripes = Some(config.registry().stripes());
        }
        self
    }

    /// Creates a new listener adapter.
    ///
    /// All three arguments are required, and are checked in order. The observed test result and
    /// the load context are only checked for presence.
    pub fn build<R: Reporter>(
        &self,
        reporter: Option<R>,
        observed: Option<&dyn Any>,
        load_context: Option<&LoadContext>,
    ) -> Result<ListenerAdapter<R>, InvalidArgumentError> {
        let reporter =
            reporter.ok_or_else(|| InvalidArgumentError::new(AdapterArgument::Reporter))?;
        if observed.is_none() {
            return Err(InvalidArgumentError::new(AdapterArgument::ObservedResult));
        }
        let load_context =
            load_context.ok_or_else(|| InvalidArgumentError::new(AdapterArgument::LoadContext))?;

        let stripes = self.registry_stripes.unwrap_or_default();
        debug!(
            "creating listener adapter for {} ({stripes} registry stripes)",
            load_context.binary_path(),
        );

        Ok(ListenerAdapter {
            reporter,
            failures: FailureRegistry::new(stripes),
        })
    }
}

/// Forwards test listener notifications to a [`Reporter`].
///
/// The adapter keeps track of tests that reported an error or a failure, keyed by the test
/// instance and the thread it was reported on. When such a test ends, the earlier error or failure
/// report stands as its final report. Every other test that ends is reported as succeeded.
///
/// An adapter is meant to observe a single test run and then be dropped.
#[derive(Debug)]
pub struct ListenerAdapter<R> {
    reporter: R,
    failures: FailureRegistry,
}

impl<R: Reporter> ListenerAdapter<R> {
    /// Creates a new listener adapter with default settings.
    ///
    /// See [`ListenerAdapterBuilder::build`].
    pub fn new(
        reporter: Option<R>,
        observed: Option<&dyn Any>,
        load_context: Option<&LoadContext>,
    ) -> Result<Self, InvalidArgumentError> {
        ListenerAdapterBuilder::default().build(reporter, observed, load_context)
    }

    /// Handles a notification by its legacy method name.
    ///
    /// See [`dispatch`] for how names and arguments are interpreted.
    pub fn notify(
        &self,
        method: &str,
        args: &[ListenerArg],
    ) -> Result<(), DispatchError<R::Error>> {
        dispatch(self, method, args)
    }

    /// Returns the reporter.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Returns the number of tests that reported an error or a failure and haven't ended yet.
    pub fn pending_failures(&self) -> usize {
        self.failures.len()
    }

    /// Consumes the adapter, returning the reporter.
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    fn record_failure(&self, test: &TestHandle) {
        let key = FailureKey::current(test.clone());
        if !self.failures.insert(key) {
            trace!(test = %test.display_name(), "failure already recorded");
        }
    }
}

impl<R: Reporter> TestListener for ListenerAdapter<R> {
    type Error = R::Error;

    fn start_test(&self, test: &TestHandle) -> Result<(), Self::Error> {
        trace!(test = %test.display_name(), "test starting");
        self.reporter.test_starting(ReportEntry::new(test.clone()))
    }

    fn add_error(&self, test: &TestHandle, cause: &FailureCause) -> Result<(), Self::Error> {
        trace!(test = %test.display_name(), %cause, "test errored");
        self.reporter
            .test_errored(ReportEntry::with_cause(test.clone(), cause.clone()))?;
        self.record_failure(test);
        Ok(())
    }

    fn add_failure(&self, test: &TestHandle, cause: &FailureCause) -> Result<(), Self::Error> {
        trace!(test = %test.display_name(), %cause, "test failed");
        self.reporter
            .test_failed(ReportEntry::with_cause(test.clone(), cause.clone()))?;
        self.record_failure(test);
        Ok(())
    }

    fn end_test(&self, test: &TestHandle) -> Result<(), Self::Error> {
        let had_failed = self.failures.remove(&FailureKey::current(test.clone()));
        trace!(test = %test.display_name(), had_failed, "test ended");
        if had_failed {
            // The error or failure report already sent is the final word for this test.
            return Ok(());
        }
        self.reporter.test_succeeded(ReportEntry::new(test.clone()))
    }
}
