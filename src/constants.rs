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

//! Constants for the sensors plugin
//!
//! Command paths, timeouts, environment variable names and metric prefixes
//! live here so the reader, emitters and settings agree on them.

use std::time::Duration;

/// External commands invoked by the plugin
pub mod commands {
    /// lm-sensors front end; `-j` selects JSON output
    pub const SENSORS: &str = "sensors";
    pub const SENSORS_ARGS: &[&str] = &["-j"];

    /// TEMPered USB thermometer utility. Usually has to run as root.
    pub const TEMPERED: &str = "/home/tanaton/src/TEMPered/utils/tempered";
}

/// Timing values
pub mod timing {
    use super::Duration;

    /// Upper bound for a single external command
    pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

    /// Upper bound for the whole invocation, both commands included
    pub const OVERALL_TIMEOUT: Duration = Duration::from_secs(30);

    /// How often a running child is polled for exit or cancellation
    pub const POLL_INTERVAL: Duration = Duration::from_millis(10);
}

/// Environment variables read at startup
pub mod env {
    /// Set to "1" by mackerel-agent when it wants graph definitions
    pub const PLUGIN_META: &str = "MACKEREL_AGENT_PLUGIN_META";
    pub const PLUGIN_META_ENABLED: &str = "1";

    pub const SENSORS_COMMAND: &str = "MACKEREL_SENSORS_COMMAND";
    pub const TEMPERED_PATH: &str = "MACKEREL_SENSORS_TEMPERED";
    pub const AIR_DECIMALS: &str = "MACKEREL_SENSORS_AIR_DECIMALS";
    pub const LOG_PATH: &str = "MACKEREL_SENSORS_LOG";
}

/// Metric naming and graph definition values
pub mod metrics {
    pub const FAN_PREFIX: &str = "sensors.fan";
    pub const TEMP_PREFIX: &str = "sensors.temp";

    pub const FAN_GRAPH_LABEL: &str = "Fan";
    pub const TEMP_GRAPH_LABEL: &str = "Temp";
    pub const GRAPH_UNIT: &str = "integer";

    /// First line of metadata output
    pub const PLUGIN_MARKER: &str = "# mackerel-agent-plugin";

    pub const AIR_NAME: &str = "air";
    pub const AIR_LABEL: &str = "Air Temp";

    /// Reported when the probe ran but its output could not be parsed
    pub const AIR_FALLBACK_VALUE: i64 = 20;

    /// Space separated field of the probe's first line holding the temperature
    pub const AIR_FIELD_INDEX: usize = 3;

    /// Decimals kept for k10temp die temperatures
    pub const DIE_TEMP_DECIMALS: usize = 3;

    /// Upper bound for the configurable air decimals; an f64 holds about 17 significant digits
    pub const MAX_AIR_DECIMALS: usize = 17;
}

/// `sensors -j` top level keys, one per supported chip
pub mod chips {
    pub const NCT6798: &str = "nct6798-isa-0290";
    pub const IT8686: &str = "it8686-isa-0a40";
    pub const K10TEMP: &str = "k10temp-pci-00c3";
}
