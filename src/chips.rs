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

//! Chip layouts as reported by `sensors -j`
//!
//! Each supported chip is decoded into a fixed struct. Feature and subfeature
//! names follow the kernel driver, so they are brittle across driver versions:
//! a missing or `null` feature decodes as 0.0 rather than failing the whole read.

use serde::{Deserialize, Deserializer};

use crate::constants::{chips, metrics};
use crate::metrics::ValueFormat;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Declares a feature object holding a single `<subfeature>_input` value.
macro_rules! input_feature {
    ($name:ident, $key:literal) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        pub struct $name {
            pub input: f64,
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                struct Raw {
                    #[serde(rename = $key, default, deserialize_with = "null_as_default")]
                    input: f64,
                }
                let raw = Option::<Raw>::deserialize(deserializer)?;
                Ok($name { input: raw.map_or(0.0, |r| r.input) })
            }
        }
    };
}

input_feature!(Fan1, "fan1_input");
input_feature!(Fan2, "fan2_input");
input_feature!(Fan3, "fan3_input");
input_feature!(Fan4, "fan4_input");
input_feature!(Fan5, "fan5_input");
input_feature!(Fan6, "fan6_input");
input_feature!(Fan7, "fan7_input");
input_feature!(Temp1, "temp1_input");
input_feature!(Temp2, "temp2_input");
input_feature!(Temp3, "temp3_input");
input_feature!(Temp4, "temp4_input");
input_feature!(Temp5, "temp5_input");
input_feature!(Temp6, "temp6_input");
input_feature!(Temp7, "temp7_input");
input_feature!(Temp8, "temp8_input");
input_feature!(Temp9, "temp9_input");
input_feature!(Temp10, "temp10_input");
input_feature!(In0, "in0_input");
input_feature!(In6, "in6_input");

/// Nuvoton NCT6798D Super I/O
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Nct6798 {
    #[serde(rename = "Adapter", deserialize_with = "null_as_default")]
    pub adapter: String,
    pub fan1: Fan1,
    pub fan2: Fan2,
    pub fan3: Fan3,
    pub fan4: Fan4,
    pub fan5: Fan5,
    pub fan6: Fan6,
    pub fan7: Fan7,
    #[serde(rename = "SYSTIN")]
    pub systin: Temp1,
    #[serde(rename = "CPUTIN")]
    pub cputin: Temp2,
    #[serde(rename = "AUXTIN0")]
    pub auxtin0: Temp3,
    #[serde(rename = "AUXTIN1")]
    pub auxtin1: Temp4,
    #[serde(rename = "AUXTIN2")]
    pub auxtin2: Temp5,
    #[serde(rename = "AUXTIN3")]
    pub auxtin3: Temp6,
    #[serde(rename = "PECI Agent 0 Calibration")]
    pub peci_agent0_calibration: Temp7,
    #[serde(rename = "PCH_CHIP_CPU_MAX_TEMP")]
    pub pch_chip_cpu_max_temp: Temp8,
    #[serde(rename = "PCH_CHIP_TEMP")]
    pub pch_chip_temp: Temp9,
    #[serde(rename = "PCH_CPU_TEMP")]
    pub pch_cpu_temp: Temp10,
}

/// ITE IT8686E Super I/O
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct It8686 {
    #[serde(rename = "CPU Vcore")]
    pub cpu_vcore: In0,
    #[serde(rename = "DRAM Channel A/B")]
    pub dram_v: In6,
    #[serde(rename = "CPU_FAN")]
    pub cpu_fan: Fan1,
    #[serde(rename = "SYS_FAN1")]
    pub sys_fan1: Fan2,
    #[serde(rename = "SYS_FAN2")]
    pub sys_fan2: Fan3,
    #[serde(rename = "Chipset Temp")]
    pub chipset_temp: Temp2,
    #[serde(rename = "CPU Temp")]
    pub cpu_temp: Temp3,
    #[serde(rename = "PCI-EX16 Temp")]
    pub pciex16_temp: Temp4,
    #[serde(rename = "VRM MOS Temp")]
    pub vrm_mos_temp: Temp5,
    #[serde(rename = "vSOC MOS Temp")]
    pub vsoc_mos_temp: Temp6,
}

/// AMD k10temp CPU die sensor
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct K10Temp {
    #[serde(rename = "Tctl")]
    pub tctl: Temp1,
    #[serde(rename = "Tdie")]
    pub tdie: Temp2,
    #[serde(rename = "Tccd1")]
    pub tccd1: Temp3,
}

/// The whole `sensors -j` document. Chips absent from the host stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorsReport {
    #[serde(rename = "nct6798-isa-0290", default)]
    pub nct6798: Option<Nct6798>,
    #[serde(rename = "it8686-isa-0a40", default)]
    pub it8686: Option<It8686>,
    #[serde(rename = "k10temp-pci-00c3", default)]
    pub k10temp: Option<K10Temp>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Fan,
    Temp,
}

impl Category {
    /// Metric name prefix, also the graph key in the metadata document
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Fan => metrics::FAN_PREFIX,
            Category::Temp => metrics::TEMP_PREFIX,
        }
    }
}

/// One chip-derived metric with everything both emitters need.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub category: Category,
    pub name: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub format: ValueFormat,
}

impl Reading {
    fn fan(name: &'static str, label: &'static str, value: f64) -> Self {
        Reading { category: Category::Fan, name, label, value, format: ValueFormat::Truncate }
    }

    fn temp(name: &'static str, label: &'static str, value: f64) -> Self {
        Reading { category: Category::Temp, name, label, value, format: ValueFormat::Truncate }
    }

    fn die_temp(name: &'static str, label: &'static str, value: f64) -> Self {
        Reading {
            category: Category::Temp,
            name,
            label,
            value,
            format: ValueFormat::Fixed(metrics::DIE_TEMP_DECIMALS),
        }
    }

    /// Dotted metric name, e.g. `sensors.fan.cpu`
    pub fn metric_name(&self) -> String {
        format!("{}.{}", self.category.prefix(), self.name)
    }
}

impl It8686 {
    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::fan("cpu", "CPU_FAN", self.cpu_fan.input),
            Reading::fan("sys1", "SYS_FAN1", self.sys_fan1.input),
            Reading::fan("sys2", "SYS_FAN2", self.sys_fan2.input),
            Reading::temp("chipset", "Chipset Temp", self.chipset_temp.input),
            Reading::temp("cpu", "CPU Temp", self.cpu_temp.input),
            Reading::temp("pciex16", "PCI-EX16 Temp", self.pciex16_temp.input),
            Reading::temp("vrm", "VRM MOS Temp", self.vrm_mos_temp.input),
            Reading::temp("vsoc", "vSOC MOS Temp", self.vsoc_mos_temp.input),
        ]
    }
}

impl Nct6798 {
    // Header wiring on the board: fan2 is CPU_FAN, fan7 CPU_OPT, fan1/3/4 the SYS headers.
    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::fan("cpu", "CPU_FAN", self.fan2.input),
            Reading::fan("cpuopt", "CPU_OPT_FAN", self.fan7.input),
            Reading::fan("sys1", "SYS_FAN1", self.fan1.input),
            Reading::fan("sys2", "SYS_FAN2", self.fan3.input),
            Reading::fan("sys3", "SYS_FAN3", self.fan4.input),
            Reading::temp("motherboard", "Motherboard Temp", self.systin.input),
            Reading::temp("cpu", "CPU Temp", self.cputin.input),
        ]
    }
}

impl K10Temp {
    pub fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::die_temp("tctl", "Tctl UEFI CPU Temp", self.tctl.input),
            Reading::die_temp("tdie", "Tdie CPU Temp", self.tdie.input),
            Reading::die_temp("tccd1", "Tccd1 CPU Temp", self.tccd1.input),
        ]
    }
}

impl SensorsReport {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        // Only the first document counts; whatever follows it is ignored.
        match serde_json::Deserializer::from_slice(bytes).into_iter::<Self>().next() {
            Some(result) => result,
            None => serde_json::from_slice(bytes),
        }
    }

    /// Readings of every detected chip: it8686, then nct6798, then k10temp.
    pub fn readings(&self) -> Vec<Reading> {
        let mut out = Vec::new();
        if let Some(chip) = &self.it8686 {
            out.extend(chip.readings());
        }
        if let Some(chip) = &self.nct6798 {
            out.extend(chip.readings());
        }
        if let Some(chip) = &self.k10temp {
            out.extend(chip.readings());
        }
        out
    }

    /// `sensors` keys of the chips present in this report
    pub fn detected(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.it8686.is_some() {
            out.push(chips::IT8686);
        }
        if self.nct6798.is_some() {
            out.push(chips::NCT6798);
        }
        if self.k10temp.is_some() {
            out.push(chips::K10TEMP);
        }
        out
    }
}
