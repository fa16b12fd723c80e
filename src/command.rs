use crate::error::SpawnError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A program confirmed to exist, ready to be started.
///
/// Built fresh for every launch and consumed by the [`ProcessSpawner`]; nothing
/// holds on to it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Executable path, absolute or relative as the user gave it.
    pub program: PathBuf,
    /// Arguments passed through untouched.
    pub args: Vec<String>,
}

impl ResolvedTarget {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a filesystem probe found at a candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A regular file that can be executed. Carries the path as it exists on
    /// disk, which may differ from the candidate in the case of its extension.
    Found(PathBuf),
    /// A file exists but cannot be executed.
    NotExecutable(PathBuf),
    /// Nothing usable: no entry, or an entry that is not a file.
    Missing,
}

/// Read-only view of the filesystem used while resolving a command.
///
/// Injected so that search order can be tested against an in-memory tree.
pub trait FileSystem {
    /// Check a single candidate path. Symlinks are followed.
    fn probe(&self, candidate: &Path) -> Probe;

    /// Like [`probe`](FileSystem::probe), but a file whose extension differs
    /// from the candidate's only in letter case also counts as a hit.
    ///
    /// Only called for candidates ending in a recognized executable extension.
    fn probe_ignoring_extension_case(&self, candidate: &Path) -> Probe {
        self.probe(candidate)
    }
}

/// Capability to start a resolved program as a detached process.
pub trait ProcessSpawner {
    /// Start `target` and return as soon as the OS has created the process.
    ///
    /// Implementations must not block on the child or capture its output, and
    /// must not return a handle to it. Reaping the exited child in the
    /// background is allowed.
    fn spawn(&self, target: &ResolvedTarget) -> Result<(), SpawnError>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn probe(&self, candidate: &Path) -> Probe {
        (**self).probe(candidate)
    }

    fn probe_ignoring_extension_case(&self, candidate: &Path) -> Probe {
        (**self).probe_ignoring_extension_case(candidate)
    }
}

impl<T: ProcessSpawner + ?Sized> ProcessSpawner for &T {
    fn spawn(&self, target: &ResolvedTarget) -> Result<(), SpawnError> {
        (**self).spawn(target)
    }
}
