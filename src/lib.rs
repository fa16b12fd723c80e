//! A small command launcher engine.
//!
//! Given one line of user text, the crate works out which executable it refers
//! to and starts it as a detached process. No shell is involved at any point:
//! the program is located by probing the search path (`PATH`, plus `PATHEXT`
//! suffixes for names without an extension) and executed directly with the
//! remaining words as its arguments.
//!
//! The main entry point is [`Runner`], which resolves and launches in one call.
//! [`Resolver`] and [`Launcher`] expose the two halves separately, and the
//! [`FileSystem`] and [`ProcessSpawner`] traits let both be driven by the
//! in-memory [`MemoryFs`] and [`RecordingSpawner`] instead of the real system.

pub mod command;
pub mod env;
pub mod error;
pub mod fs;
pub mod launcher;
mod lexer;
pub mod resolver;
mod runner;

pub use command::{FileSystem, Probe, ProcessSpawner, ResolvedTarget};
pub use env::{Environment, ExtensionList, SearchPath};
pub use error::{ErrorKind, LaunchError, ResolveError, SpawnError};
pub use fs::{MemoryFs, SystemFs};
pub use launcher::{Launcher, OsSpawner, RecordingSpawner};
pub use lexer::CommandLine;
pub use resolver::{Resolver, is_explicit_path};
pub use runner::Runner;
