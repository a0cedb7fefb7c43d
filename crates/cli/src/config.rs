// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Layered settings for `dmsplot`.
//!
//! Sources, lowest precedence first: built-in defaults, the configuration
//! file (`dmsplot.toml` in the working directory, or the one passed with
//! `--config`), then `DMSPLOT_*` environment variables. Command-line flags
//! are applied on top by the caller.

use config::{Config, ConfigError, Environment, File};
use dms_benchmarks::Naming;
use dms_chart::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dmsplot";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "DMSPLOT";

/// Settings shared by all subcommands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How chart rows are named.
    pub naming: Naming,
    /// Number of buses in the simulated network. Accepted but not used yet.
    pub bus_count: Option<usize>,
    /// Directory charts are written to; next to the input when unset.
    pub output_dir: Option<PathBuf>,
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Font family for chart text.
    pub font_family: String,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            naming: Naming::default(),
            bus_count: None,
            output_dir: None,
            width: render.width,
            height: render.height,
            font_family: render.font_family,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file and the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Figure options for the chart renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            font_family: self.font_family.clone(),
        }
    }
}
