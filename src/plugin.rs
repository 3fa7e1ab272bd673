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

//! One plugin invocation: read the chips, then emit metrics or metadata.

use std::io::Write;

use serde_json::json;

use crate::air;
use crate::command::CommandRunner;
use crate::error::Result;
use crate::graph;
use crate::logger;
use crate::metrics;
use crate::sensors;
use crate::settings::{Mode, Settings};
use crate::system;

pub fn run<W: Write>(settings: &Settings, runner: &dyn CommandRunner, out: &mut W) -> Result<()> {
    run_at(settings, runner, out, system::unix_now())
}

/// Same as [`run`] with a fixed timestamp for every metric line.
pub fn run_at<W: Write>(
    settings: &Settings,
    runner: &dyn CommandRunner,
    out: &mut W,
    timestamp: i64,
) -> Result<()> {
    logger::log_event("startup", json!({ "mode": settings.mode.as_str() }));

    // Metadata mode reads the chips too: the graph list depends on what is installed.
    let report = sensors::read_report(runner, &settings.sensors_command)?;

    match settings.mode {
        Mode::Metadata => graph::emit_metadata(out, &report),
        Mode::Metrics => {
            metrics::emit_metrics(out, &report, timestamp)?;
            air::read_air(out, runner, &settings.tempered_path, settings.air_format, timestamp)
        }
    }
}
