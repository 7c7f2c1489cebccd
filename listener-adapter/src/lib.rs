// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Adapts a legacy test listener protocol onto a report-entry based reporter.
//!
//! Test engines that speak the legacy protocol notify a listener four times per test:
//! `startTest`, `addError`, `addFailure` and `endTest`. Reporters, on the other hand, only
//! understand [`ReportEntry`](report::ReportEntry) values delivered through the
//! [`Reporter`](report::Reporter) trait.
//!
//! The main type here is [`ListenerAdapter`](adapter::ListenerAdapter), which implements
//! [`TestListener`](listener::TestListener) and forwards every notification to a reporter. It
//! remembers which tests have already failed on which thread, so that `endTest` reports a success
//! only for tests that never reported an error or a failure.

pub mod adapter;
pub mod config;
pub mod errors;
pub mod listener;
pub mod registry;
pub mod report;
pub mod test_unit;

#[cfg(test)]
mod test_helpers;
