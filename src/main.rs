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

use std::io::{self, Write};

use anyhow::Context;
use serde_json::json;

use mackerel_plugin_sensors::command::SystemRunner;
use mackerel_plugin_sensors::constants::timing;
use mackerel_plugin_sensors::context::RunContext;
use mackerel_plugin_sensors::error::PluginError;
use mackerel_plugin_sensors::logger;
use mackerel_plugin_sensors::plugin;
use mackerel_plugin_sensors::settings::Settings;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{:#}", err);
        let kind = err.downcast_ref::<PluginError>().map_or("other", PluginError::kind);
        logger::log_event("fatal_error", json!({ "error": format!("{:#}", err), "kind": kind }));
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("invalid plugin settings")?;

    if let Some(path) = &settings.log_path {
        logger::init_logging(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
    }

    let ctx = RunContext::new(timing::OVERALL_TIMEOUT);
    if let Err(e) = ctx.install_signal_handler() {
        // Still bounded by the deadline, just not interruptible.
        logger::log_event("signal_handler_unavailable", json!({ "error": e.to_string() }));
    }
    let runner = SystemRunner::new(ctx, timing::COMMAND_TIMEOUT);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = plugin::run(&settings, &runner, &mut out);
    // Lines written before a failure (the air fallback) must still reach the agent.
    out.flush()?;
    result?;
    Ok(())
}
