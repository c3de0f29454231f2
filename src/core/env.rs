use anyhow::{Context, Result, bail};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Access to the process environment used while loading configuration.
///
/// This abstraction keeps path overrides, `~` expansion and the work-tree
/// exports testable without touching the real process state.
pub trait Environment {
    /// Reads an environment variable; unset and non-UTF-8 values are `None`.
    fn var(&self, key: &str) -> Option<String>;

    /// Exports a variable for the rest of the process and its children.
    fn set_var(&self, key: &str, value: &str) -> Result<()>;

    fn current_dir(&self) -> Result<PathBuf>;

    fn set_current_dir(&self, path: &Path) -> Result<()>;
}

/// The real process environment.
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_var(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() || key.contains(['=', '\0']) || value.contains('\0') {
            bail!("Failed to set {key} to '{value}'");
        }
        // SAFETY: configuration is loaded during single-threaded startup,
        // before any thread that could read the environment is spawned.
        unsafe { std::env::set_var(key, value) };
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().context("Failed to get cwd path")
    }

    fn set_current_dir(&self, path: &Path) -> Result<()> {
        std::env::set_current_dir(path).with_context(|| format!("Failed to chdir({})", path.display()))
    }
}

/// An in-memory environment, seeded with fixed variables.
pub struct MemoryEnvironment {
    vars: RefCell<HashMap<String, String>>,
    cwd: RefCell<PathBuf>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self {
            vars: RefCell::new(HashMap::new()),
            cwd: RefCell::new(PathBuf::from("/")),
        }
    }

    pub fn with_var(self, key: &str, value: &str) -> Self {
        self.vars.borrow_mut().insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_current_dir(self, path: impl Into<PathBuf>) -> Self {
        *self.cwd.borrow_mut() = path.into();
        self
    }
}

impl Default for MemoryEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MemoryEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.borrow().get(key).cloned()
    }

    fn set_var(&self, key: &str, value: &str) -> Result<()> {
        self.vars.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.cwd.borrow().clone())
    }

    fn set_current_dir(&self, path: &Path) -> Result<()> {
        if !path.is_dir() {
            bail!("Failed to chdir({})", path.display());
        }
        *self.cwd.borrow_mut() = path.to_path_buf();
        Ok(())
    }
}
