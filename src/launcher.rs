//! Starting resolved programs as detached processes.
//!
//! The program is executed directly, never through `sh -c` or `cmd /C`, so
//! arguments reach it exactly as typed and shell metacharacters have no meaning.

use crate::command::{ProcessSpawner, ResolvedTarget};
use crate::error::SpawnError;
use std::cell::RefCell;
use std::io;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Starts a [`ResolvedTarget`] through a [`ProcessSpawner`].
#[derive(Debug, Default)]
pub struct Launcher<S = OsSpawner> {
    spawner: S,
}

impl<S: ProcessSpawner> Launcher<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Start `target` without waiting for it.
    ///
    /// Each call starts a new process; identical requests are not merged.
    pub fn spawn(&self, target: &ResolvedTarget) -> Result<(), SpawnError> {
        match self.spawner.spawn(target) {
            Ok(()) => {
                debug!(%target, "launched");
                Ok(())
            }
            Err(e) => {
                warn!(%target, error = %e, "launch failed");
                Err(e)
            }
        }
    }
}

/// [`ProcessSpawner`] that creates real OS processes.
///
/// Standard streams are redirected to the null device and the child is moved
/// out of the caller's process group (Unix) or console (Windows), so it keeps
/// running after the launcher exits. On Unix the [`Child`] is handed to a
/// background thread that only reaps it once it exits, so a long-running
/// prompt does not collect zombies; its exit status is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSpawner;

impl ProcessSpawner for OsSpawner {
    fn spawn(&self, target: &ResolvedTarget) -> Result<(), SpawnError> {
        let mut cmd = Command::new(&target.program);
        cmd.args(&target.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut cmd);

        let child = cmd
            .spawn()
            .map_err(|e| SpawnError::from_io(&target.program, e))?;
        debug!(pid = child.id(), program = %target.program.display(), "process started");
        release(child);
        Ok(())
    }
}

#[cfg(unix)]
fn release(mut child: Child) {
    let pid = child.id();
    let reaper = std::thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || {
            let _ = child.wait();
        });
    if let Err(e) = reaper {
        warn!(pid, error = %e, "could not start reaper thread");
    }
}

#[cfg(not(unix))]
fn release(child: Child) {
    drop(child);
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;

    const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

    cmd.creation_flags(CREATE_NEW_CONSOLE | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_cmd: &mut Command) {}

/// In-memory [`ProcessSpawner`] that records targets instead of starting them.
#[derive(Debug, Default)]
pub struct RecordingSpawner {
    spawned: RefCell<Vec<ResolvedTarget>>,
    fail_with: Option<io::ErrorKind>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spawner whose every attempt fails with an OS error of `kind`.
    pub fn failing(kind: io::ErrorKind) -> Self {
        Self {
            spawned: RefCell::default(),
            fail_with: Some(kind),
        }
    }

    /// Targets passed to [`ProcessSpawner::spawn`], including failed attempts.
    pub fn spawned(&self) -> Vec<ResolvedTarget> {
        self.spawned.borrow().clone()
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, target: &ResolvedTarget) -> Result<(), SpawnError> {
        self.spawned.borrow_mut().push(target.clone());
        match self.fail_with {
            Some(kind) => Err(SpawnError::from_io(&target.program, io::Error::from(kind))),
            None => Ok(()),
        }
    }
}
