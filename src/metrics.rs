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

use std::fmt;
use std::io::{self, Write};

use crate::chips::{Category, Reading, SensorsReport};

/// How a reading is rendered on a metric line
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueFormat {
    /// Truncated toward zero to an integer
    Truncate,
    /// Fixed-point with this many decimals
    Fixed(usize),
}

impl ValueFormat {
    pub fn render(&self, value: f64) -> String {
        match *self {
            ValueFormat::Truncate => (value as i64).to_string(),
            ValueFormat::Fixed(decimals) => format!("{:.*}", decimals, value),
        }
    }
}

/// `<name>\t<value>\t<timestamp>` as read by mackerel-agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLine {
    pub name: String,
    pub value: String,
    pub timestamp: i64,
}

impl MetricLine {
    pub fn new(name: impl Into<String>, value: impl Into<String>, timestamp: i64) -> Self {
        MetricLine { name: name.into(), value: value.into(), timestamp }
    }

    pub fn from_reading(reading: &Reading, timestamp: i64) -> Self {
        MetricLine::new(reading.metric_name(), reading.format.render(reading.value), timestamp)
    }
}

impl fmt::Display for MetricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.value, self.timestamp)
    }
}

/// Chip-derived metric lines: every fan line, then every temperature line,
/// each group in chip order.
pub fn metric_lines(report: &SensorsReport, timestamp: i64) -> Vec<MetricLine> {
    let readings = report.readings();
    [Category::Fan, Category::Temp]
        .iter()
        .flat_map(|category| readings.iter().filter(move |r| r.category == *category))
        .map(|r| MetricLine::from_reading(r, timestamp))
        .collect()
}

pub fn emit_metrics<W: Write>(out: &mut W, report: &SensorsReport, timestamp: i64) -> io::Result<()> {
    for line in metric_lines(report, timestamp) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
