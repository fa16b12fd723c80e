use crate::command::{FileSystem, Probe};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// [`FileSystem`] backed by the real filesystem.
///
/// A candidate inside a directory the process cannot search is reported as
/// [`Probe::Missing`]; only a regular file without execute permission is
/// [`Probe::NotExecutable`].
///
/// Outside Windows, [`probe_ignoring_extension_case`](FileSystem::probe_ignoring_extension_case)
/// accepts a sibling `tool.exe` when `tool.EXE` is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl FileSystem for SystemFs {
    fn probe(&self, candidate: &Path) -> Probe {
        inspect(candidate).unwrap_or(Probe::Missing)
    }

    fn probe_ignoring_extension_case(&self, candidate: &Path) -> Probe {
        match inspect(candidate) {
            Ok(probe) => probe,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !cfg!(windows) => {
                sibling_with_extension_case(candidate)
            }
            Err(_) => Probe::Missing,
        }
    }
}

fn inspect(path: &Path) -> io::Result<Probe> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Ok(Probe::Missing);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Ok(Probe::NotExecutable(path.to_path_buf()));
        }
    }

    Ok(Probe::Found(path.to_path_buf()))
}

/// Scan the candidate's directory for an entry with the same stem and an
/// extension equal up to ASCII case.
fn sibling_with_extension_case(candidate: &Path) -> Probe {
    let (Some(stem), Some(ext)) = (candidate.file_stem(), candidate.extension()) else {
        return Probe::Missing;
    };
    let parent = candidate.parent().unwrap_or(Path::new(""));
    let listing = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let Ok(entries) = fs::read_dir(listing) else {
        return Probe::Missing;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = Path::new(&name);
        let same_ext = name
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if same_ext && name.file_stem() == Some(stem) {
            return inspect(&parent.join(name)).unwrap_or(Probe::Missing);
        }
    }
    Probe::Missing
}

/// In-memory [`FileSystem`] holding a fixed set of files.
///
/// Records every checked path so tests can assert on search order, and
/// separately the ones checked with extension case ignored.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: HashMap<PathBuf, bool>,
    probed: RefCell<Vec<PathBuf>>,
    case_folded: RefCell<Vec<PathBuf>>,
}

impl MemoryFs {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with execute permission.
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), true);
        self
    }

    /// Add a file without execute permission.
    #[must_use]
    pub fn with_non_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), false);
        self
    }

    /// Every candidate checked so far, in order, by either lookup.
    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.borrow().clone()
    }

    /// Candidates checked through
    /// [`probe_ignoring_extension_case`](FileSystem::probe_ignoring_extension_case).
    pub fn case_folded(&self) -> Vec<PathBuf> {
        self.case_folded.borrow().clone()
    }

    fn exact(&self, candidate: &Path) -> Option<(&PathBuf, bool)> {
        self.files
            .get_key_value(candidate)
            .map(|(path, exec)| (path, *exec))
    }

    fn any_extension_case(&self, candidate: &Path) -> Option<(&PathBuf, bool)> {
        let ext = candidate.extension()?;
        self.files
            .iter()
            .find(|(path, _)| {
                path.parent() == candidate.parent()
                    && path.file_stem() == candidate.file_stem()
                    && path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
            })
            .map(|(path, exec)| (path, *exec))
    }
}

fn to_probe(entry: Option<(&PathBuf, bool)>) -> Probe {
    match entry {
        Some((path, true)) => Probe::Found(path.clone()),
        Some((path, false)) => Probe::NotExecutable(path.clone()),
        None => Probe::Missing,
    }
}

impl FileSystem for MemoryFs {
    fn probe(&self, candidate: &Path) -> Probe {
        self.probed.borrow_mut().push(candidate.to_path_buf());
        to_probe(self.exact(candidate))
    }

    fn probe_ignoring_extension_case(&self, candidate: &Path) -> Probe {
        self.probed.borrow_mut().push(candidate.to_path_buf());
        self.case_folded.borrow_mut().push(candidate.to_path_buf());
        to_probe(
            self.exact(candidate)
                .or_else(|| self.any_extension_case(candidate)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_matches_extension_case_insensitively() {
        let fs = MemoryFs::new().with_executable("/bin/tool.exe");
        assert_eq!(
            fs.probe_ignoring_extension_case(Path::new("/bin/tool.EXE")),
            Probe::Found(PathBuf::from("/bin/tool.exe"))
        );
        assert_eq!(
            fs.probe_ignoring_extension_case(Path::new("/bin/TOOL.exe")),
            Probe::Missing
        );
        assert_eq!(
            fs.probe_ignoring_extension_case(Path::new("/usr/bin/tool.exe")),
            Probe::Missing
        );
        assert_eq!(fs.probed().len(), 3);
        assert_eq!(fs.case_folded().len(), 3);
    }

    #[test]
    fn test_memory_fs_plain_lookup_is_exact() {
        let fs = MemoryFs::new().with_executable("/bin/tool.exe");
        assert_eq!(fs.probe(Path::new("/bin/tool.EXE")), Probe::Missing);
        assert_eq!(
            fs.probe(Path::new("/bin/tool.exe")),
            Probe::Found(PathBuf::from("/bin/tool.exe"))
        );
        assert!(fs.case_folded().is_empty());
    }

    #[test]
    fn test_system_fs_finds_regular_file() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app");
        fs::write(&path, "#!/bin/sh\n")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        }

        assert_eq!(SystemFs.probe(&path), Probe::Found(path.clone()));
        assert_eq!(SystemFs.probe(&dir.path().join("missing")), Probe::Missing);
        Ok(())
    }

    #[test]
    fn test_system_fs_directory_is_missing() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("app.exe"))?;
        assert_eq!(SystemFs.probe(&dir.path().join("app.exe")), Probe::Missing);
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_system_fs_reports_missing_execute_bit() -> Result<(), anyhow::Error> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("notes.sh");
        fs::write(&path, "echo hi\n")?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

        assert_eq!(SystemFs.probe(&path), Probe::NotExecutable(path.clone()));
        Ok(())
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_system_fs_extension_case_fallback() -> Result<(), anyhow::Error> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("setup.exe");
        fs::write(&path, "")?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;

        assert_eq!(
            SystemFs.probe_ignoring_extension_case(&dir.path().join("setup.EXE")),
            Probe::Found(path)
        );
        assert_eq!(
            SystemFs.probe_ignoring_extension_case(&dir.path().join("SETUP.exe")),
            Probe::Missing
        );
        assert_eq!(SystemFs.probe(&dir.path().join("setup.EXE")), Probe::Missing);
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_system_fs_unsearchable_directory_is_missing() -> Result<(), anyhow::Error> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let locked = dir.path().join("locked");
        fs::create_dir(&locked)?;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

        let inside = locked.join("tool");
        let plain = SystemFs.probe(&inside);
        let folded = SystemFs.probe_ignoring_extension_case(&locked.join("tool.EXE"));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        assert_eq!(plain, Probe::Missing);
        assert_eq!(folded, Probe::Missing);
        Ok(())
    }
}
