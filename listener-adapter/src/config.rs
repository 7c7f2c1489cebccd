// Copyright (c) The listener-adapter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the listener adapter.
//!
//! Config is layered from lowest to highest precedence:
//!
//! 1. The defaults embedded from `default-config.toml`.
//! 2. An optional TOML config file.
//! 3. Optionally, environment variables under a prefix chosen by the host, with `__` separating
//!    nested keys.
//!
//! The adapter doesn't read any environment variables of its own. A host that wants operators to
//! tune the adapter from the environment passes a prefix such as `MY_RUNNER_ADAPTER`, after which
//! `MY_RUNNER_ADAPTER_REGISTRY__STRIPES=4` overrides `[registry] stripes`.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    registry::RegistryStripes,
};
use camino::Utf8Path;
use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, builder::DefaultState,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Overall configuration for the listener adapter.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdapterConfig {
    registry: RegistryConfig,
}

impl AdapterConfig {
    /// The default config, embedded at build time.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the default config, the given file if any, and the environment if a
    /// prefix is passed in.
    ///
    /// Unknown keys are logged as warnings and otherwise ignored.
    pub fn from_sources(
        config_file: Option<&Utf8Path>,
        env_prefix: Option<&str>,
    ) -> Result<Self, ConfigParseError> {
        let (config, unknown) = Self::from_sources_with_unknown(config_file, env_prefix)?;
        if !unknown.is_empty() {
            let keys = unknown.iter().map(String::as_str).collect::<Vec<_>>();
            match config_file {
                Some(file) => warn!(
                    "in config file {file}, ignoring unknown configuration keys: {}",
                    keys.join(", "),
                ),
                None => warn!("ignoring unknown configuration keys: {}", keys.join(", ")),
            }
        }
        Ok(config)
    }

    /// Reads the config like [`from_sources`](Self::from_sources), but returns the set of unknown
    /// keys instead of logging them.
    pub fn from_sources_with_unknown(
        config_file: Option<&Utf8Path>,
        env_prefix: Option<&str>,
    ) -> Result<(Self, BTreeSet<String>), ConfigParseError> {
        Self::read_sources(config_file, env_prefix.map(Self::environment))
    }

    fn environment(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn read_sources(
        config_file: Option<&Utf8Path>,
        environment: Option<Environment>,
    ) -> Result<(Self, BTreeSet<String>), ConfigParseError> {
        let mut builder = Self::make_default_config();
        if let Some(file) = config_file {
            builder = builder.add_source(File::new(file.as_str(), FileFormat::Toml));
        }
        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }

        Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(config_file.map(Utf8Path::to_owned), kind))
    }

    /// Returns the failure registry configuration.
    pub fn registry(&self) -> &RegistryConfig {
        &self.registry
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(Self, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: AdapterConfig = serde_path_to_error::deserialize(ignored_de).map_err(|error| {
            // The path is kept alongside the error, so strip the key the config crate wraps
            // around it.
            let path = error.path().clone();
            let error = match error.into_inner() {
                ConfigError::At { error, .. } => *error,
                other => other,
            };
            ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                path, error,
            )))
        })?;

        Ok((config, ignored))
    }
}

/// Configuration for the failure registry.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryConfig {
    stripes: RegistryStripes,
}

impl RegistryConfig {
    /// Returns the number of stripes in the failure registry.
    pub fn stripes(&self) -> RegistryStripes {
        self.stripes
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            stripes: RegistryStripes::DEFAULT,
        }
    }
}
