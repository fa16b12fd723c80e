use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Variable holding the executable search path.
pub const PATH_VAR: &str = "PATH";
/// Variable holding the executable extension list, `;`-separated.
pub const PATHEXT_VAR: &str = "PATHEXT";
/// Extensions tried when `PATHEXT` is absent on Windows.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".COM", ".EXE", ".BAT", ".CMD"];

/// Immutable snapshot of the environment variables resolution depends on.
///
/// A fresh snapshot is taken for every launch, so changes to `PATH` between
/// invocations are always picked up while a single resolution sees one
/// consistent view.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, OsString>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self::from_vars(
            stdenv::vars_os().map(|(k, v)| (k.to_string_lossy().into_owned(), v)),
        )
    }

    /// Build a snapshot from explicit key/value pairs, ignoring the process environment.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<OsString>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Get the value of a variable.
    ///
    /// Names are matched exactly, except on Windows where the lookup ignores case
    /// the way the OS does (`Path` and `PATH` are the same variable).
    pub fn get_var(&self, key: &str) -> Option<&OsStr> {
        if let Some(v) = self.vars.get(key) {
            return Some(v.as_os_str());
        }
        if cfg!(windows) {
            return self
                .vars
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_os_str());
        }
        None
    }

    /// Directories from `PATH`, in order. Unset `PATH` gives an empty list.
    pub fn search_path(&self) -> SearchPath {
        SearchPath::parse(self.get_var(PATH_VAR))
    }

    /// Suffixes from `PATHEXT`, or the platform default when it is unset.
    pub fn extension_list(&self) -> ExtensionList {
        ExtensionList::parse(self.get_var(PATHEXT_VAR))
    }
}

/// Ordered directories consulted for a bare command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath(Vec<PathBuf>);

impl SearchPath {
    /// Use exactly these directories, in the given order.
    pub fn new(dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self(dirs.into_iter().map(Into::into).collect())
    }

    /// Split a `PATH`-style value using the platform separator. Empty entries are dropped.
    pub fn parse(value: Option<&OsStr>) -> Self {
        match value {
            Some(v) => Self(
                stdenv::split_paths(v)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect(),
            ),
            None => Self::default(),
        }
    }

    /// The directories in search order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.0
    }

    /// True when there is nowhere to search, e.g. `PATH` was unset.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered filename suffixes tried when a command is given without an extension.
///
/// Outside Windows the first suffix is always the empty one, so a bare `ls`
/// is probed as-is before any `PATHEXT` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionList(Vec<String>);

impl ExtensionList {
    /// Use exactly these suffixes. A missing leading `.` is added; duplicates
    /// (compared case-insensitively) keep their first position.
    pub fn new(exts: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut list: Vec<String> = Vec::new();
        for ext in exts {
            let ext = ext.as_ref().trim();
            let ext = if ext.is_empty() || ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{ext}")
            };
            if !list.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                list.push(ext);
            }
        }
        Self(list)
    }

    /// Parse a `PATHEXT`-style value, falling back to the platform default
    /// when it is unset or holds no usable entry.
    pub fn parse(value: Option<&OsStr>) -> Self {
        let entries: Vec<String> = value
            .map(|v| {
                v.to_string_lossy()
                    .split(';')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if cfg!(windows) {
            if entries.is_empty() {
                Self::new(DEFAULT_EXTENSIONS)
            } else {
                Self::new(entries)
            }
        } else {
            Self::new(std::iter::once(String::new()).chain(entries))
        }
    }

    /// Suffixes in the order they are tried, each with its leading `.`. The
    /// empty suffix stands for the name as typed.
    pub fn suffixes(&self) -> &[String] {
        &self.0
    }

    /// Whether `ext` (with or without its leading dot) is one of the listed
    /// suffixes, ignoring case.
    pub fn recognizes(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        !ext.is_empty()
            && self
                .0
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

impl Default for ExtensionList {
    fn default() -> Self {
        Self::parse(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_var_from_snapshot() {
        let env = Environment::from_vars([("KEY", "VALUE")]);
        assert_eq!(env.get_var("KEY"), Some(OsStr::new("VALUE")));
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);
    }

    #[test]
    fn test_env_capture_reads_process_env() {
        let env = Environment::capture();
        assert!(env.get_var(PATH_VAR).is_some());
    }

    #[test]
    fn test_search_path_keeps_order_and_drops_empty_entries() {
        let joined = stdenv::join_paths(["/usr/local/bin", "", "/usr/bin", "/bin"]).unwrap();
        let env = Environment::from_vars([(PATH_VAR, joined)]);
        assert_eq!(
            env.search_path(),
            SearchPath::new(["/usr/local/bin", "/usr/bin", "/bin"])
        );
    }

    #[test]
    fn test_missing_path_is_empty_search_path() {
        let env = Environment::default();
        assert!(env.search_path().is_empty());
    }

    #[test]
    fn test_extension_list_normalizes_and_dedups() {
        let list = ExtensionList::new([".EXE", "bat", " .exe ", ".Cmd"]);
        assert_eq!(list.suffixes(), &[".EXE", ".bat", ".Cmd"]);
    }

    #[test]
    fn test_recognizes_is_case_insensitive() {
        let list = ExtensionList::new([".COM", ".EXE", ".BAT", ".CMD"]);
        assert!(list.recognizes("exe"));
        assert!(list.recognizes(".Exe"));
        assert!(!list.recognizes("txt"));
        assert!(!list.recognizes(""));
    }

    #[test]
    #[cfg(unix)]
    fn test_pathext_extends_bare_name_on_unix() {
        let env = Environment::from_vars([(PATHEXT_VAR, ".sh;;.py")]);
        assert_eq!(env.extension_list().suffixes(), &["", ".sh", ".py"]);
        assert_eq!(ExtensionList::default().suffixes(), &[""]);
    }

    #[test]
    #[cfg(windows)]
    fn test_default_extensions_on_windows() {
        assert_eq!(ExtensionList::default().suffixes(), DEFAULT_EXTENSIONS);
        let env = Environment::from_vars([("PathExt", ".EXE;.PS1")]);
        assert_eq!(env.extension_list().suffixes(), &[".EXE", ".PS1"]);
    }
}
