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

use serde::{Deserialize, Serialize};

use crate::chips::{Category, SensorsReport};
use crate::constants::metrics;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    pub name: String,
    pub label: String,
}

impl MetricDescriptor {
    pub fn new(name: &str, label: &str) -> Self {
        MetricDescriptor { name: name.to_string(), label: label.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    pub label: String,
    pub unit: String,
    pub metrics: Vec<MetricDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphs {
    #[serde(rename = "sensors.fan")]
    pub fan: GraphDescriptor,
    #[serde(rename = "sensors.temp")]
    pub temp: GraphDescriptor,
}

/// Graph definitions handed to mackerel-agent in metadata mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub graphs: Graphs,
}

impl MetadataDocument {
    /// Build the document for the chips present in `report`. The air metric is
    /// always listed since the probe is independent of the chips.
    pub fn for_report(report: &SensorsReport) -> Self {
        // Units stay "integer" even though die temperatures carry decimals.
        let mut fan = GraphDescriptor {
            label: metrics::FAN_GRAPH_LABEL.to_string(),
            unit: metrics::GRAPH_UNIT.to_string(),
            metrics: Vec::new(),
        };
        let mut temp = GraphDescriptor {
            label: metrics::TEMP_GRAPH_LABEL.to_string(),
            unit: metrics::GRAPH_UNIT.to_string(),
            metrics: vec![MetricDescriptor::new(metrics::AIR_NAME, metrics::AIR_LABEL)],
        };

        for reading in report.readings() {
            let descriptor = MetricDescriptor::new(reading.name, reading.label);
            match reading.category {
                Category::Fan => fan.metrics.push(descriptor),
                Category::Temp => temp.metrics.push(descriptor),
            }
        }

        MetadataDocument { graphs: Graphs { fan, temp } }
    }
}

/// Write the plugin marker line followed by the document as one JSON line.
pub fn emit_metadata<W: Write>(out: &mut W, report: &SensorsReport) -> Result<()> {
    writeln!(out, "{}", metrics::PLUGIN_MARKER)?;
    serde_json::to_writer(&mut *out, &MetadataDocument::for_report(report)).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
