// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the listener adapter.

use crate::listener::ListenerMethod;
use camino::Utf8PathBuf;
use config::ConfigError;
use std::fmt;
use thiserror::Error;

/// An argument required to construct a [`ListenerAdapter`](crate::adapter::ListenerAdapter).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdapterArgument {
    /// The reporter that receives report entries.
    Reporter,

    /// The test result object whose lifecycle events are observed.
    ObservedResult,

    /// The load context of the test binary.
    LoadContext,
}

impl AdapterArgument {
    pub(crate) fn to_static_str(self) -> &'static str {
        match self {
            AdapterArgument::Reporter => "reporter",
            AdapterArgument::ObservedResult => "observed test result",
            AdapterArgument::LoadContext => "load context",
        }
    }
}

impl fmt::Display for AdapterArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_static_str())
    }
}

/// An error returned while constructing a [`ListenerAdapter`](crate::adapter::ListenerAdapter)
/// with a missing argument.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{argument} is not set")]
pub struct InvalidArgumentError {
    argument: AdapterArgument,
}

impl InvalidArgumentError {
    pub(crate) fn new(argument: AdapterArgument) -> Self {
        Self { argument }
    }

    /// Returns the argument that was missing.
    pub fn argument(&self) -> AdapterArgument {
        self.argument
    }
}

/// An error returned when the arguments passed along with a listener method don't have the shape
/// that method expects.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ListenerArgsError {
    /// An argument was missing.
    #[error("`{method}` expects {expected} at position {position}, but no argument was passed")]
    Missing {
        /// The method that was invoked.
        method: ListenerMethod,
        /// The zero-based position of the missing argument.
        position: usize,
        /// The kind of argument expected at this position.
        expected: &'static str,
    },

    /// An argument had the wrong kind.
    #[error("`{method}` expects {expected} at position {position}, but found {found}")]
    Mismatch {
        /// The method that was invoked.
        method: ListenerMethod,
        /// The zero-based position of the mismatched argument.
        position: usize,
        /// The kind of argument expected at this position.
        expected: &'static str,
        /// The kind of argument that was actually passed.
        found: &'static str,
    },
}

/// An error returned when parsing a method name that isn't part of the listener protocol.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown listener method `{name}`")]
pub struct UnknownListenerMethod {
    name: String,
}

impl UnknownListenerMethod {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An error returned by [`dispatch`](crate::listener::dispatch).
#[derive(Debug, Error)]
pub enum DispatchError<E> {
    /// The arguments didn't match the shape of the invoked method.
    ///
    /// Nothing was reported and no state was changed.
    #[error("invalid arguments for listener method")]
    Arguments(#[from] ListenerArgsError),

    /// The listener failed while handling the notification.
    #[error("listener failed to handle notification")]
    Report(#[source] E),
}

/// An error returned when a failure registry stripe count is out of range.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("registry stripe count must be a power of two greater than 1, found {input}")]
pub struct InvalidStripeCountError {
    input: usize,
}

impl InvalidStripeCountError {
    pub(crate) fn new(input: usize) -> Self {
        Self { input }
    }

    /// Returns the stripe count that was rejected.
    pub fn input(&self) -> usize {
        self.input
    }
}

/// An error that occurred while reading the adapter config.
#[derive(Debug, Error)]
#[error(
    "failed to parse listener adapter config{}",
    .config_file.as_ref().map(|file| format!(" at `{file}`")).unwrap_or_default()
)]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Option<Utf8PathBuf>,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: Option<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self { config_file, kind }
    }

    /// Returns the config file that failed to parse, if one was passed in.
    pub fn config_file(&self) -> Option<&Utf8PathBuf> {
        self.config_file.as_ref()
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing the adapter config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config from its sources.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}
