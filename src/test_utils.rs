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

//! Fixtures and mock helpers shared by the unit tests

use crate::chips::SensorsReport;
use crate::command::MockCommandRunner;
use crate::error::{PluginError, Result};

pub const IT8686_ONLY_JSON: &str = r#"{
   "it8686-isa-0a40":{
      "Adapter": "ISA adapter",
      "CPU Vcore":{"in0_input": 1.356, "in0_min": 0.000, "in0_max": 3.060},
      "DRAM Channel A/B":{"in6_input": 1.368, "in6_min": 0.000, "in6_max": 3.060},
      "CPU_FAN":{"fan1_input": 1205.000, "fan1_min": 0.000},
      "SYS_FAN1":{"fan2_input": 842.000, "fan2_min": 0.000},
      "SYS_FAN2":{"fan3_input": 0.000, "fan3_min": 0.000},
      "Chipset Temp":{"temp2_input": 48.000, "temp2_max": 127.000, "temp2_type": 4.000},
      "CPU Temp":{"temp3_input": 41.000, "temp3_max": 127.000, "temp3_type": 4.000},
      "PCI-EX16 Temp":{"temp4_input": 35.000, "temp4_max": 127.000},
      "VRM MOS Temp":{"temp5_input": 44.000, "temp5_max": 127.000},
      "vSOC MOS Temp":{"temp6_input": 39.000, "temp6_max": 127.000}
   }
}"#;

pub const K10TEMP_ONLY_JSON: &str = r#"{
   "k10temp-pci-00c3":{
      "Adapter": "PCI adapter",
      "Tctl":{"temp1_input": 45.875},
      "Tdie":{"temp2_input": 45.875},
      "Tccd1":{"temp3_input": 44.250}
   }
}"#;

pub const ALL_CHIPS_JSON: &str = r#"{
   "it8686-isa-0a40":{
      "Adapter": "ISA adapter",
      "CPU_FAN":{"fan1_input": 1205.000},
      "SYS_FAN1":{"fan2_input": 842.000},
      "SYS_FAN2":{"fan3_input": 0.000},
      "Chipset Temp":{"temp2_input": 48.000},
      "CPU Temp":{"temp3_input": 41.000},
      "PCI-EX16 Temp":{"temp4_input": 35.000},
      "VRM MOS Temp":{"temp5_input": 44.000},
      "vSOC MOS Temp":{"temp6_input": 39.000}
   },
   "nct6798-isa-0290":{
      "Adapter": "ISA adapter",
      "fan1":{"fan1_input": 812.000, "fan1_min": 0.000},
      "fan2":{"fan2_input": 1320.000, "fan2_min": 0.000},
      "fan3":{"fan3_input": 655.000},
      "fan4":{"fan4_input": 0.000},
      "fan5":{"fan5_input": 0.000},
      "fan6":{"fan6_input": 0.000},
      "fan7":{"fan7_input": 1275.000},
      "SYSTIN":{"temp1_input": 33.000, "temp1_max": 80.000},
      "CPUTIN":{"temp2_input": 38.500, "temp2_max": 80.000},
      "AUXTIN0":{"temp3_input": 95.000},
      "AUXTIN1":{"temp4_input": -62.000},
      "AUXTIN2":{"temp5_input": 25.000},
      "AUXTIN3":{"temp6_input": 1.000},
      "PECI Agent 0 Calibration":{"temp7_input": 38.000},
      "PCH_CHIP_CPU_MAX_TEMP":{"temp8_input": 0.000},
      "PCH_CHIP_TEMP":{"temp9_input": 0.000}
   },
   "k10temp-pci-00c3":{
      "Adapter": "PCI adapter",
      "Tctl":{"temp1_input": 45.875},
      "Tdie":{"temp2_input": 45.875},
      "Tccd1":{"temp3_input": 44.250}
   }
}"#;

pub const TEST_TIMESTAMP: i64 = 1_700_000_000;

pub fn report(json: &str) -> SensorsReport {
    SensorsReport::from_json(json.as_bytes()).expect("fixture must decode")
}

/// A runner answering `sensors` and the probe with canned results.
/// Programs are matched by name; each may be called at most once.
pub fn mock_runner(
    sensors: Result<Vec<u8>>,
    probe: Option<Result<Vec<u8>>>,
) -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    let mut sensors = Some(sensors);
    runner
        .expect_run()
        .withf(|program, args| program == "sensors" && args.len() == 1 && args[0] == "-j")
        .times(1)
        .returning(move |_, _| sensors.take().unwrap_or_else(|| Ok(Vec::new())));
    match probe {
        Some(probe) => {
            let mut probe = Some(probe);
            runner
                .expect_run()
                .withf(|program, args| program == "tempered" && args.is_empty())
                .times(1)
                .returning(move |_, _| probe.take().unwrap_or_else(|| Ok(Vec::new())));
        }
        None => {
            runner
                .expect_run()
                .withf(|program, _| program == "tempered")
                .never();
        }
    }
    runner
}

pub fn spawn_failure(command: &str) -> PluginError {
    PluginError::Spawn {
        command: command.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    }
}
