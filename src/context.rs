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

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Flag of the context that owns the SIGQUIT handler.
static QUIT_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

extern "C" fn on_sigquit(_signum: libc::c_int) {
    if let Some(flag) = QUIT_FLAG.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("cannot install termination handler: {0}")]
    Termination(ctrlc::Error),
    #[error("cannot install SIGQUIT handler: {0}")]
    Quit(io::Error),
}

/// Deadline and cancellation shared by every command of one invocation.
#[derive(Debug, Clone)]
pub struct RunContext {
    cancelled: Arc<AtomicBool>,
    deadline: Instant,
}

impl RunContext {
    pub fn new(overall: Duration) -> Self {
        RunContext {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now() + overall,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Time left before the overall deadline; zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Cancel on SIGINT, SIGTERM, SIGHUP or SIGQUIT. May only be called once per process.
    pub fn install_signal_handler(&self) -> Result<(), SignalError> {
        let cancelled = Arc::clone(&self.cancelled);
        ctrlc::set_handler(move || {
            cancelled.store(true, Ordering::SeqCst);
        })
        .map_err(SignalError::Termination)?;

        QUIT_FLAG.set(Arc::clone(&self.cancelled)).map_err(|_| {
            SignalError::Quit(io::Error::new(io::ErrorKind::AlreadyExists, "handler already installed"))
        })?;
        // SAFETY: the handler only performs an atomic store.
        let previous = unsafe {
            libc::signal(libc::SIGQUIT, on_sigquit as extern "C" fn(libc::c_int) as libc::sighandler_t)
        };
        if previous == libc::SIG_ERR {
            return Err(SignalError::Quit(io::Error::last_os_error()));
        }
        Ok(())
    }
}
