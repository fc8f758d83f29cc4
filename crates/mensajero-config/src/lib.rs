// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Mensajero courier tracker.
//!
//! TOML files layered with `MENSAJERO_*` environment overrides, strict
//! unknown-key rejection, semantic validation, and miette diagnostics.
//!
//! ```no_run
//! let config = mensajero_config::load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MensajeroConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<MensajeroConfig, Vec<ConfigError>> {
    finish(loader::load_config(), read_sources(&loader::config_file_candidates()))
}

/// Load configuration from one explicit file and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<MensajeroConfig, Vec<ConfigError>> {
    finish(
        loader::load_config_from_path(path),
        read_sources(&[path.to_path_buf()]),
    )
}

/// Load configuration from an inline TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<MensajeroConfig, Vec<ConfigError>> {
    finish(
        loader::load_config_from_str(toml_content),
        vec![("<inline>".to_string(), toml_content.to_string())],
    )
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<MensajeroConfig, figment::Error>,
    sources: Vec<(String, String)>,
) -> Result<MensajeroConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources)),
    }
}

/// Read whichever candidate files exist, for diagnostic source spans.
fn read_sources(paths: &[std::path::PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| {
            std::fs::read_to_string(path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
