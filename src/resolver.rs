use crate::command::{FileSystem, Probe, ResolvedTarget};
use crate::env::{Environment, ExtensionList, SearchPath};
use crate::error::ResolveError;
use crate::lexer::CommandLine;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Turns user input into a [`ResolvedTarget`] by probing the filesystem.
///
/// Resolution never runs anything; it only checks whether candidate paths exist.
pub struct Resolver<'a> {
    fs: &'a dyn FileSystem,
    search_path: SearchPath,
    extensions: ExtensionList,
}

impl<'a> Resolver<'a> {
    /// Resolver over an explicit search path and extension list.
    ///
    /// Both are fixed for the resolver's lifetime; build a new one to pick up
    /// environment changes.
    pub fn new(fs: &'a dyn FileSystem, search_path: SearchPath, extensions: ExtensionList) -> Self {
        Self {
            fs,
            search_path,
            extensions,
        }
    }

    /// Use the search path and extension list of an environment snapshot.
    pub fn from_env(fs: &'a dyn FileSystem, env: &Environment) -> Self {
        Self::new(fs, env.search_path(), env.extension_list())
    }

    /// Resolve `input` to an existing program plus its arguments.
    ///
    /// - Explicit paths (`C:\app.exe`, `./run`, `bin/tool`) are checked as given,
    ///   then with each known extension when they have none.
    /// - Bare names are searched directory by directory; within a directory the
    ///   known extensions are tried in order. An earlier directory always wins.
    /// - A name that already carries a known extension is only probed as-is.
    pub fn resolve(&self, input: &str) -> Result<ResolvedTarget, ResolveError> {
        let CommandLine { head, args } = CommandLine::parse(input)?;

        let program = if is_explicit_path(&head) {
            self.resolve_explicit(&head)?
        } else {
            self.resolve_bare(&head)?
        };

        debug!(command = %head, program = %program.display(), "resolved");
        Ok(ResolvedTarget::new(program, args))
    }

    fn resolve_explicit(&self, head: &str) -> Result<PathBuf, ResolveError> {
        let mut candidates = vec![PathBuf::from(head)];
        if extension_of(head).is_none() {
            candidates.extend(
                self.non_empty_suffixes()
                    .map(|suffix| PathBuf::from(format!("{head}{suffix}"))),
            );
        }

        let mut search = Search::new(self.fs, &self.extensions);
        search
            .first_hit(candidates)
            .ok_or_else(|| match search.denied {
                Some(path) => ResolveError::PermissionDenied { path },
                None => ResolveError::FileNotFound {
                    path: PathBuf::from(head),
                },
            })
    }

    fn resolve_bare(&self, head: &str) -> Result<PathBuf, ResolveError> {
        let names = self.candidate_names(head);
        let mut search = Search::new(self.fs, &self.extensions);

        for dir in self.search_path.dirs() {
            if let Some(found) = search.first_hit(names.iter().map(|name| dir.join(name))) {
                return Ok(found);
            }
        }

        Err(match search.denied {
            Some(path) => ResolveError::PermissionDenied { path },
            None => ResolveError::CommandNotFound {
                command: head.to_string(),
            },
        })
    }

    /// File names to try inside each search directory, in order.
    fn candidate_names(&self, head: &str) -> Vec<String> {
        match extension_of(head) {
            Some(ext) if self.extensions.recognizes(ext) => vec![head.to_string()],
            Some(_) => std::iter::once(head.to_string())
                .chain(self.non_empty_suffixes().map(|s| format!("{head}{s}")))
                .collect(),
            None => self
                .extensions
                .suffixes()
                .iter()
                .map(|s| format!("{head}{s}"))
                .collect(),
        }
    }

    fn non_empty_suffixes(&self) -> impl Iterator<Item = &str> {
        self.extensions
            .suffixes()
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Probes candidates in order, remembering the first one that exists but
/// cannot be executed.
///
/// Extension case is only folded for candidates ending in a recognized
/// extension, so a miss on `python3.11` never lists the directory.
struct Search<'a> {
    fs: &'a dyn FileSystem,
    extensions: &'a ExtensionList,
    denied: Option<PathBuf>,
}

impl<'a> Search<'a> {
    fn new(fs: &'a dyn FileSystem, extensions: &'a ExtensionList) -> Self {
        Self {
            fs,
            extensions,
            denied: None,
        }
    }

    fn check(&self, candidate: &Path) -> Probe {
        let recognized = candidate
            .to_str()
            .and_then(extension_of)
            .is_some_and(|ext| self.extensions.recognizes(ext));
        if recognized {
            self.fs.probe_ignoring_extension_case(candidate)
        } else {
            self.fs.probe(candidate)
        }
    }

    fn first_hit(&mut self, candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
        for candidate in candidates {
            let probe = self.check(&candidate);
            trace!(candidate = %candidate.display(), ?probe, "probe");
            match probe {
                Probe::Found(path) => return Some(path),
                Probe::NotExecutable(path) => {
                    self.denied.get_or_insert(path);
                }
                Probe::Missing => {}
            }
        }
        None
    }
}

/// Whether `token` names a location rather than a program to search for.
///
/// True for anything with a `/` or `\` separator, a drive prefix such as `C:`,
/// an absolute path, or the bare `.` and `..` traversal markers.
pub fn is_explicit_path(token: &str) -> bool {
    token.contains(is_separator)
        || has_drive_prefix(token)
        || Path::new(token).is_absolute()
        || token == "."
        || token == ".."
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

fn has_drive_prefix(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Extension of the last path segment, without the dot. Both separators count
/// on every platform, so `..\app` has no extension even on Unix.
fn extension_of(token: &str) -> Option<&str> {
    let name = token.rsplit(is_separator).next().unwrap_or(token);
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => Some(&name[i + 1..]),
        _ => None,
    }
}
