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

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::timing;
use crate::context::RunContext;
use crate::error::{PluginError, Result};

/// Runs an external program and hands back everything it wrote to stdout.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>>;
}

/// Spawns real processes, bounded by a per-call timeout and the shared run context.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    ctx: RunContext,
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(ctx: RunContext, timeout: Duration) -> Self {
        SystemRunner { ctx, timeout }
    }

    fn budget(&self) -> Duration {
        self.timeout.min(self.ctx.remaining())
    }
}

fn describe(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>> {
        let command = describe(program, args);
        let budget = self.budget();
        let started = Instant::now();

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PluginError::Spawn { command: command.clone(), source })?;

        // Drain stdout while waiting so a chatty child never blocks on a full pipe.
        let mut stdout = match child.stdout.take() {
            Some(s) => s,
            None => {
                kill_and_reap(&mut child);
                return Err(PluginError::Wait {
                    command,
                    source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout not captured"),
                });
            }
        };
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        // Exit alone is not enough: a background grandchild can keep the pipe open.
        let mut exited: Option<ExitStatus> = None;
        let mut output: Option<Vec<u8>> = None;
        let (status, output) = loop {
            if exited.is_none() {
                match child.try_wait() {
                    Ok(status) => exited = status,
                    Err(source) => {
                        kill_and_reap(&mut child);
                        return Err(PluginError::Wait { command, source });
                    }
                }
            }
            if output.is_none() {
                match rx.recv_timeout(timing::POLL_INTERVAL) {
                    Ok(Ok(buf)) => output = Some(buf),
                    Ok(Err(source)) => {
                        kill_and_reap(&mut child);
                        return Err(PluginError::Wait { command, source });
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        kill_and_reap(&mut child);
                        return Err(PluginError::Wait {
                            command,
                            source: std::io::Error::new(std::io::ErrorKind::Other, "stdout reader panicked"),
                        });
                    }
                }
            } else {
                thread::sleep(timing::POLL_INTERVAL);
            }
            if let (Some(status), true) = (exited, output.is_some()) {
                break (status, output.take().unwrap_or_default());
            }
            if self.ctx.is_cancelled() {
                kill_and_reap(&mut child);
                return Err(PluginError::Cancelled { command });
            }
            if started.elapsed() >= budget {
                kill_and_reap(&mut child);
                return Err(PluginError::Timeout { command, timeout: budget });
            }
        };

        if !status.success() {
            return Err(PluginError::ExitStatus { command, status });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(timeout: Duration) -> SystemRunner {
        SystemRunner::new(RunContext::new(Duration::from_secs(30)), timeout)
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_captures_stdout_and_discards_stderr() {
        let out = runner(Duration::from_secs(5))
            .run("sh", &sh("echo out; echo err 1>&2"))
            .unwrap();
        assert_eq!(out, b"out\n");
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let out = runner(Duration::from_secs(5))
            .run("sh", &sh("i=0; while [ $i -lt 20000 ]; do echo 0123456789; i=$((i+1)); done"))
            .unwrap();
        assert_eq!(out.len(), 20000 * 11);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = runner(Duration::from_secs(5))
            .run("/nonexistent/mackerel-sensors-test", &[])
            .unwrap_err();
        assert!(matches!(err, PluginError::Spawn { .. }));
        assert!(err.is_execution());
        assert!(err.to_string().starts_with("failed to execute /nonexistent/mackerel-sensors-test"));
    }

    #[test]
    fn test_non_zero_exit_is_execution_error() {
        let err = runner(Duration::from_secs(5)).run("sh", &sh("echo partial; exit 3")).unwrap_err();
        match err {
            PluginError::ExitStatus { command, status } => {
                assert_eq!(command, "sh -c echo partial; exit 3");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = runner(Duration::from_millis(100)).run("sleep", &["5".to_string()]).unwrap_err();
        assert!(matches!(err, PluginError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_when_background_child_holds_stdout() {
        let started = Instant::now();
        let err = runner(Duration::from_millis(100)).run("sh", &sh("sleep 5 & echo x")).unwrap_err();
        assert!(matches!(err, PluginError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_cancellation_while_background_child_holds_stdout() {
        let ctx = RunContext::new(Duration::from_secs(30));
        let runner = SystemRunner::new(ctx.clone(), Duration::from_secs(10));
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            ctx.cancel();
        });
        let started = Instant::now();
        let err = runner.run("sh", &sh("sleep 5 & echo x")).unwrap_err();
        canceller.join().unwrap();
        assert!(matches!(err, PluginError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_overall_deadline_caps_command_timeout() {
        let ctx = RunContext::new(Duration::from_millis(50));
        let runner = SystemRunner::new(ctx, Duration::from_secs(10));
        let err = runner.run("sleep", &["5".to_string()]).unwrap_err();
        match err {
            PluginError::Timeout { timeout, .. } => assert!(timeout <= Duration::from_millis(50)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cancellation_aborts_running_child() {
        let ctx = RunContext::new(Duration::from_secs(30));
        let runner = SystemRunner::new(ctx.clone(), Duration::from_secs(10));
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            ctx.cancel();
        });
        let started = Instant::now();
        let err = runner.run("sleep", &["5".to_string()]).unwrap_err();
        canceller.join().unwrap();
        assert!(matches!(err, PluginError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
