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

//! mackerel-agent plugin for lm-sensors readings
//!
//! Reads fan and temperature channels from `sensors -j` plus an external air
//! temperature probe, and prints them as mackerel-agent metric lines or as
//! graph definitions when the agent asks for metadata.

pub mod constants;
pub mod error;
pub mod logger;
pub mod settings;
pub mod context;
pub mod system;
pub mod command;
pub mod chips;
pub mod sensors;
pub mod air;
pub mod metrics;
pub mod graph;
pub mod plugin;

#[cfg(test)]
pub mod test_utils;
