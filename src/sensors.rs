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

use serde_json::json;

use crate::chips::SensorsReport;
use crate::command::CommandRunner;
use crate::constants::commands;
use crate::error::Result;
use crate::logger;

/// Run `sensors -j` and decode its output. Chips missing from the host are
/// simply `None`; only execution and JSON failures are errors.
pub fn read_report(runner: &dyn CommandRunner, program: &str) -> Result<SensorsReport> {
    let args: Vec<String> = commands::SENSORS_ARGS.iter().map(|a| a.to_string()).collect();
    let stdout = runner.run(program, &args)?;
    let report = SensorsReport::from_json(&stdout)?;
    logger::log_event("sensors_read", json!({ "chips": report.detected() }));
    Ok(report)
}
