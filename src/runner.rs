use crate::command::{FileSystem, ProcessSpawner, ResolvedTarget};
use crate::env::Environment;
use crate::error::{LaunchError, ResolveError};
use crate::fs::SystemFs;
use crate::launcher::{Launcher, OsSpawner};
use crate::resolver::Resolver;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const PROMPT: &str = "run> ";

/// Resolves user text and launches the result in one step.
///
/// The runner keeps no state between calls: each call takes a fresh
/// [`Environment`] snapshot, unless one was pinned with
/// [`with_environment`](Runner::with_environment).
///
/// Example
/// ```no_run
/// use quickrun::Runner;
/// let runner: Runner = Runner::default();
/// match runner.run("notepad notes.txt") {
///     Ok(target) => println!("started {target}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub struct Runner<F = SystemFs, S = OsSpawner> {
    fs: F,
    launcher: Launcher<S>,
    env: Option<Environment>,
}

impl<F: FileSystem, S: ProcessSpawner> Runner<F, S> {
    pub fn new(fs: F, spawner: S) -> Self {
        Self {
            fs,
            launcher: Launcher::new(spawner),
            env: None,
        }
    }

    /// Resolve against `env` on every call instead of the process environment.
    #[must_use]
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Resolve `input` without starting anything.
    ///
    /// Blank input is rejected with [`ResolveError::EmptyInput`] before the
    /// filesystem is touched.
    pub fn resolve(&self, input: &str) -> Result<ResolvedTarget, LaunchError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ResolveError::EmptyInput.into());
        }

        let env = match &self.env {
            Some(env) => env.clone(),
            None => Environment::capture(),
        };
        Ok(Resolver::from_env(&self.fs, &env).resolve(input)?)
    }

    /// Resolve `input` and start it as a detached process.
    ///
    /// Returns the launched target. On success the caller is expected to clear
    /// its input and hide itself; on failure to show the message and let the
    /// user correct the text.
    pub fn run(&self, input: &str) -> Result<ResolvedTarget, LaunchError> {
        let target = self.resolve(input)?;
        self.launcher.spawn(&target)?;
        Ok(target)
    }

    /// Interactive launcher prompt.
    ///
    /// A started command clears the line. A failure prints the message and
    /// offers the same text again for editing. Nothing is kept in history.
    /// Ctrl-C or Ctrl-D leave the prompt.
    pub fn prompt(&self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut retry = String::new();

        loop {
            let readline = if retry.is_empty() {
                rl.readline(PROMPT)
            } else {
                rl.readline_with_initial(PROMPT, (retry.as_str(), ""))
            };
            match readline {
                Ok(line) => {
                    retry = match self.run(&line) {
                        Ok(_) | Err(LaunchError::Resolve(ResolveError::EmptyInput)) => String::new(),
                        Err(e) => {
                            eprintln!("{e}");
                            line.trim().to_string()
                        }
                    };
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Runner {
    /// Real filesystem, real processes, fresh environment per call.
    fn default() -> Self {
        Self::new(SystemFs, OsSpawner)
    }
}
