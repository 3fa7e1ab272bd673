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

use std::io::Write;

use serde_json::json;

use crate::command::CommandRunner;
use crate::constants::metrics;
use crate::error::{PluginError, ProbeParseError, Result};
use crate::logger;
use crate::metrics::{MetricLine, ValueFormat};
use crate::system;

/// Full metric name of the air temperature line
pub fn air_metric_name() -> String {
    format!("{}.{}", metrics::TEMP_PREFIX, metrics::AIR_NAME)
}

/// Pull the temperature out of the probe's first line. Fields are separated
/// by single spaces, so repeated spaces produce empty fields.
pub fn parse_air_temperature(output: &[u8]) -> std::result::Result<f64, ProbeParseError> {
    if output.is_empty() {
        return Err(ProbeParseError::EmptyOutput);
    }
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().unwrap_or("");
    let fields: Vec<&str> = line.split(' ').collect();
    let token = fields
        .get(metrics::AIR_FIELD_INDEX)
        .ok_or_else(|| ProbeParseError::MissingField {
            expected: metrics::AIR_FIELD_INDEX + 1,
            found: fields.len(),
            line: line.to_string(),
        })?;
    token
        .parse::<f64>()
        .map_err(|_| ProbeParseError::InvalidNumber { token: token.to_string() })
}

/// Run the probe and write the air temperature line.
///
/// A probe that cannot be run is fatal and writes nothing. A probe that runs
/// but prints something unparseable still gets a line, carrying the fallback
/// value, before the error is returned. Both paths exit non-zero.
pub fn read_air<W: Write>(
    out: &mut W,
    runner: &dyn CommandRunner,
    probe: &str,
    format: ValueFormat,
    timestamp: i64,
) -> Result<()> {
    let stdout = runner.run(probe, &[])?;
    match parse_air_temperature(&stdout) {
        Ok(value) => {
            writeln!(out, "{}", MetricLine::new(air_metric_name(), format.render(value), timestamp))?;
            Ok(())
        }
        Err(source) => {
            let fallback = metrics::AIR_FALLBACK_VALUE.to_string();
            writeln!(out, "{}", MetricLine::new(air_metric_name(), fallback, timestamp))?;
            logger::log_event(
                "air_fallback",
                json!({ "reason": source.to_string(), "root": system::is_root() }),
            );
            Err(PluginError::AirTemperature { source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockCommandRunner;
    use crate::test_utils::{spawn_failure, TEST_TIMESTAMP};

    fn probe_returning(result: Result<Vec<u8>>) -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        let mut result = Some(result);
        runner
            .expect_run()
            .withf(|program, args| program == "tempered" && args.is_empty())
            .times(1)
            .returning(move |_, _| result.take().unwrap_or_else(|| Ok(Vec::new())));
        runner
    }

    fn run_air(result: Result<Vec<u8>>, format: ValueFormat) -> (String, Result<()>) {
        let runner = probe_returning(result);
        let mut out = Vec::new();
        let res = read_air(&mut out, &runner, "tempered", format, TEST_TIMESTAMP);
        (String::from_utf8(out).unwrap(), res)
    }

    #[test]
    fn test_parse_fourth_field() {
        assert_eq!(parse_air_temperature(b"x y z 23.5 w").unwrap(), 23.5);
        assert_eq!(
            parse_air_temperature(b"/dev/hidraw1 0: temperature 24.31 C\nsecond line\n").unwrap(),
            24.31
        );
        assert_eq!(parse_air_temperature(b"a b c -3.25\r\n").unwrap(), -3.25);
    }

    #[test]
    fn test_parse_three_fields_is_missing_field() {
        let err = parse_air_temperature(b"x y z").unwrap_err();
        assert_eq!(
            err,
            ProbeParseError::MissingField { expected: 4, found: 3, line: "x y z".to_string() }
        );
    }

    #[test]
    fn test_parse_non_numeric_field() {
        let err = parse_air_temperature(b"x y z warm w").unwrap_err();
        assert_eq!(err, ProbeParseError::InvalidNumber { token: "warm".to_string() });
    }

    #[test]
    fn test_parse_splits_on_single_spaces() {
        // "a  b c" has an empty second field, so index 3 is "c"
        assert!(matches!(
            parse_air_temperature(b"a  b c"),
            Err(ProbeParseError::InvalidNumber { .. })
        ));
        assert_eq!(
            parse_air_temperature(b"a b c  21.0").unwrap_err(),
            ProbeParseError::InvalidNumber { token: String::new() }
        );
    }

    #[test]
    fn test_parse_empty_output() {
        assert_eq!(parse_air_temperature(b"").unwrap_err(), ProbeParseError::EmptyOutput);
        assert!(matches!(
            parse_air_temperature(b"\n"),
            Err(ProbeParseError::MissingField { found: 1, .. })
        ));
    }

    #[test]
    fn test_success_truncates_by_default() {
        let (out, res) = run_air(Ok(b"x y z 23.5 w\n".to_vec()), ValueFormat::Truncate);
        assert!(res.is_ok());
        assert_eq!(out, "sensors.temp.air\t23\t1700000000\n");
    }

    #[test]
    fn test_success_with_two_decimals() {
        let (out, res) = run_air(Ok(b"x y z 23.5 w\n".to_vec()), ValueFormat::Fixed(2));
        assert!(res.is_ok());
        assert_eq!(out, "sensors.temp.air\t23.50\t1700000000\n");
    }

    #[test]
    fn test_three_fields_writes_fallback_then_fails() {
        let (out, res) = run_air(Ok(b"x y z\n".to_vec()), ValueFormat::Truncate);
        assert_eq!(out, "sensors.temp.air\t20\t1700000000\n");
        let err = res.unwrap_err();
        assert!(matches!(err, PluginError::AirTemperature { .. }));
        assert!(err.to_string().contains("failed to obtain air temperature"));
    }

    #[test]
    fn test_non_numeric_writes_fallback_then_fails() {
        let (out, res) = run_air(Ok(b"x y z n/a w\n".to_vec()), ValueFormat::Fixed(2));
        // fallback is always the bare integer
        assert_eq!(out, "sensors.temp.air\t20\t1700000000\n");
        assert!(res.is_err());
    }

    #[test]
    fn test_execution_failure_writes_nothing() {
        let (out, res) = run_air(Err(spawn_failure("tempered")), ValueFormat::Truncate);
        assert!(out.is_empty());
        let err = res.unwrap_err();
        assert!(err.is_execution());
    }
}
