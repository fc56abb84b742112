//! Fire-and-forget launch of the dashboard process.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

pub const DASHBOARD_BIN: &str = "flap_dashboard";

/// A best-effort background command.  `launch` returns once the process
/// has started (or failed to); it never waits for it to finish.
pub trait Launcher {
    fn launch(&mut self) -> io::Result<()>;
}

pub struct DashboardLauncher {
    program: PathBuf,
}

impl DashboardLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        DashboardLauncher {
            program: program.into(),
        }
    }

    /// The dashboard binary installed next to the running executable.
    pub fn beside_current_exe() -> io::Result<Self> {
        let exe = std::env::current_exe()?;
        let name = format!("{}{}", DASHBOARD_BIN, std::env::consts::EXE_SUFFIX);
        Ok(Self::new(exe.with_file_name(name)))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Launcher for DashboardLauncher {
    fn launch(&mut self) -> io::Result<()> {
        // stdio detached: the game owns the terminal.
        let mut command = Command::new(&self.program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        spawn_reaped(&mut command)?;
        Ok(())
    }
}

/// Start `command` and wait for it on a background thread, so a finished
/// child is reaped instead of lingering until the game exits.  The handle
/// may be dropped; the thread still collects the exit status.
pub fn spawn_reaped(command: &mut Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command.spawn()?;
    let pid = child.id();
    info!(pid, program = ?command.get_program(), "process launched");
    Ok(thread::spawn(move || {
        let status = child.wait();
        debug!(pid, ?status, "process exited");
        status
    }))
}
