// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/mensajero/mensajero.toml`, then the XDG user config,
//! then `./mensajero.toml`, then `MENSAJERO_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MensajeroConfig;

/// File name looked up in each configuration directory.
pub const CONFIG_FILE_NAME: &str = "mensajero.toml";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "MENSAJERO_";

/// Sections recognised in environment variable names.
const ENV_SECTIONS: [&str; 4] = ["service", "storage", "gateway", "export"];

/// Candidate configuration files, lowest precedence first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/mensajero").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("mensajero").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(MensajeroConfig::default()));
    for path in config_file_candidates() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<MensajeroConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<MensajeroConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MensajeroConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string only.
pub fn load_config_from_str(toml_content: &str) -> Result<MensajeroConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MensajeroConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Environment provider mapping `MENSAJERO_GATEWAY_BEARER_TOKEN` to
/// `gateway.bearer_token`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that themselves contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| env_key_to_path(key.as_str()).into())
}

fn env_key_to_path(key: &str) -> String {
    // Figment hands over the variable name in its original case.
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
