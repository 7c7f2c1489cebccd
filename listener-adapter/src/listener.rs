// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The legacy four-method test listener protocol.
//!
//! Engines that only know how to invoke listener methods by name can go through [`dispatch`],
//! which decodes the method name and arguments and calls the matching [`TestListener`] method.

use crate::{
    errors::{DispatchError, ListenerArgsError, UnknownListenerMethod},
    test_unit::{FailureCause, TestHandle},
};
use std::{fmt, str::FromStr};
use tracing::trace;

/// A listener for test lifecycle notifications.
///
/// For a single test, the engine calls `start_test` first, then any number of `add_error` and
/// `add_failure`, then `end_test`. Notifications for different tests may arrive concurrently from
/// different threads.
pub trait TestListener {
    /// The error returned when a notification can't be handled.
    type Error;

    /// Called when a test starts.
    fn start_test(&self, test: &TestHandle) -> Result<(), Self::Error>;

    /// Called when a test hits an unexpected error.
    fn add_error(&self, test: &TestHandle, cause: &FailureCause) -> Result<(), Self::Error>;

    /// Called when a test fails an assertion.
    fn add_failure(&self, test: &TestHandle, cause: &FailureCause) -> Result<(), Self::Error>;

    /// Called when a test ends, whether or not it failed.
    fn end_test(&self, test: &TestHandle) -> Result<(), Self::Error>;
}

/// A method of the [`TestListener`] protocol, named as the legacy protocol names it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ListenerMethod {
    /// `startTest(test)`.
    StartTest,

    /// `addError(test, cause)`.
    AddError,

    /// `addFailure(test, cause)`.
    AddFailure,

    /// `endTest(test)`.
    EndTest,
}

impl ListenerMethod {
    /// All listener methods, in lifecycle order.
    pub const ALL: [ListenerMethod; 4] = [
        ListenerMethod::StartTest,
        ListenerMethod::AddError,
        ListenerMethod::AddFailure,
        ListenerMethod::EndTest,
    ];

    /// Returns the method name as the legacy protocol spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            ListenerMethod::StartTest => "startTest",
            ListenerMethod::AddError => "addError",
            ListenerMethod::AddFailure => "addFailure",
            ListenerMethod::EndTest => "endTest",
        }
    }

    /// Returns the number of arguments this method takes.
    pub fn arity(self) -> usize {
        match self {
            ListenerMethod::StartTest | ListenerMethod::EndTest => 1,
            ListenerMethod::AddError | ListenerMethod::AddFailure => 2,
        }
    }
}

impl fmt::Display for ListenerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListenerMethod {
    type Err = UnknownListenerMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListenerMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownListenerMethod::new(s))
    }
}

/// An untyped argument to a listener method.
#[derive(Clone, Debug)]
pub enum ListenerArg {
    /// A test.
    Test(TestHandle),

    /// The cause of an error or failure.
    Cause(FailureCause),
}

impl ListenerArg {
    fn kind(&self) -> &'static str {
        match self {
            ListenerArg::Test(_) => TEST_ARG,
            ListenerArg::Cause(_) => CAUSE_ARG,
        }
    }
}

impl From<TestHandle> for ListenerArg {
    fn from(test: TestHandle) -> Self {
        ListenerArg::Test(test)
    }
}

impl From<FailureCause> for ListenerArg {
    fn from(cause: FailureCause) -> Self {
        ListenerArg::Cause(cause)
    }
}

const TEST_ARG: &str = "a test";
const CAUSE_ARG: &str = "a failure cause";

/// Invokes a listener method by name.
///
/// Method names outside the listener protocol are ignored and return `Ok(())`, so that engines
/// whose protocol has grown extra methods keep working. Arguments beyond the method's arity are
/// ignored as well.
///
/// For a known method, the arguments are decoded before the listener is called. If they don't
/// match the method's signature, [`DispatchError::Arguments`] is returned and the listener isn't
/// called at all.
pub fn dispatch<L>(
    listener: &L,
    method: &str,
    args: &[ListenerArg],
) -> Result<(), DispatchError<L::Error>>
where
    L: TestListener + ?Sized,
{
    let method = match method.parse::<ListenerMethod>() {
        Ok(method) => method,
        Err(error) => {
            trace!("ignoring notification: {error}");
            return Ok(());
        }
    };

    let args = DecodedArgs { method, args };
    let res = match method {
        ListenerMethod::StartTest => listener.start_test(args.test(0)?),
        ListenerMethod::AddError => listener.add_error(args.test(0)?, args.cause(1)?),
        ListenerMethod::AddFailure => listener.add_failure(args.test(0)?, args.cause(1)?),
        ListenerMethod::EndTest => listener.end_test(args.test(0)?),
    };
    res.map_err(DispatchError::Report)
}

struct DecodedArgs<'a> {
    method: ListenerMethod,
    args: &'a [ListenerArg],
}

impl<'a> DecodedArgs<'a> {
    fn test(&self, position: usize) -> Result<&'a TestHandle, ListenerArgsError> {
        match self.get(position, TEST_ARG)? {
            ListenerArg::Test(test) => Ok(test),
            other => Err(self.mismatch(position, TEST_ARG, other)),
        }
    }

    fn cause(&self, position: usize) -> Result<&'a FailureCause, ListenerArgsError> {
        match self.get(position, CAUSE_ARG)? {
            ListenerArg::Cause(cause) => Ok(cause),
            other => Err(self.mismatch(position, CAUSE_ARG, other)),
        }
    }

    fn get(
        &self,
        position: usize,
        expected: &'static str,
    ) -> Result<&'a ListenerArg, ListenerArgsError> {
        self.args
            .get(position)
            .ok_or(ListenerArgsError::Missing {
                method: self.method,
                position,
                expected,
            })
    }

    fn mismatch(
        &self,
        position: usize,
        expected: &'static str,
        found: &ListenerArg,
    ) -> ListenerArgsError {
        ListenerArgsError::Mismatch {
            method: self.method,
            position,
            expected,
            found: found.kind(),
        }
    }
}
