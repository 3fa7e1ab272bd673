/*
 * This file is part of mackerel-plugin-sensors.
 *
 * Copyright (C) 2025 mackerel-plugin-sensors contributors
 *
 * mackerel-plugin-sensors is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * mackerel-plugin-sensors is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with mackerel-plugin-sensors. If not, see <https://www.gnu.org/licenses/>.
 */

use std::env;
use std::path::PathBuf;

use crate::constants::{commands, env as vars, metrics};
use crate::error::{PluginError, Result};
use crate::metrics::ValueFormat;

/// What a single invocation produces
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Metric lines for the current readings
    Metrics,
    /// Graph definitions, requested once by mackerel-agent
    Metadata,
}

impl Mode {
    pub fn from_meta_var(value: Option<&str>) -> Mode {
        match value {
            Some(vars::PLUGIN_META_ENABLED) => Mode::Metadata,
            _ => Mode::Metrics,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Metrics => "metrics",
            Mode::Metadata => "metadata",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub sensors_command: String,
    pub tempered_path: String,
    pub air_format: ValueFormat,
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mode: Mode::Metrics,
            sensors_command: commands::SENSORS.to_string(),
            tempered_path: commands::TEMPERED.to_string(),
            air_format: ValueFormat::Truncate,
            log_path: None,
        }
    }
}

impl Settings {
    /// Read the process environment. Called once, before any I/O.
    pub fn from_env() -> Result<Settings> {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        let air_format = match non_empty(vars::AIR_DECIMALS) {
            Some(raw) => {
                let decimals = raw.trim().parse::<usize>().map_err(|e| PluginError::Config {
                    var: vars::AIR_DECIMALS.to_string(),
                    reason: format!("{:?} is not a decimal count: {}", raw, e),
                })?;
                if decimals > metrics::MAX_AIR_DECIMALS {
                    return Err(PluginError::Config {
                        var: vars::AIR_DECIMALS.to_string(),
                        reason: format!("{} exceeds the maximum of {}", decimals, metrics::MAX_AIR_DECIMALS),
                    });
                }
                if decimals == 0 {
                    ValueFormat::Truncate
                } else {
                    ValueFormat::Fixed(decimals)
                }
            }
            None => defaults.air_format,
        };

        Ok(Settings {
            mode: Mode::from_meta_var(lookup(vars::PLUGIN_META).as_deref()),
            sensors_command: non_empty(vars::SENSORS_COMMAND).unwrap_or(defaults.sensors_command),
            tempered_path: non_empty(vars::TEMPERED_PATH).unwrap_or(defaults.tempered_path),
            air_format,
            log_path: non_empty(vars::LOG_PATH).map(PathBuf::from),
        })
    }
}
