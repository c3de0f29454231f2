use anyhow::{Result, bail};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::builders::builtin::BUILTIN_CONFIG;
use crate::builders::tokenizer::{argv_from_string, split_option_line, strip_comment};
use crate::core::engine::{ConfigEngine, Severity};
use crate::core::env::Environment;
use crate::core::options::OptionId;
use crate::core::status::{ConfigError, Outcome, Status};

pub const USER_CONFIG_ENV: &str = "GITVIEWRC_USER";
pub const SYSTEM_CONFIG_ENV: &str = "GITVIEWRC_SYSTEM";
pub const DIFF_OPTS_ENV: &str = "GITVIEW_DIFF_OPTS";

pub const SYSTEM_CONFIG: &str = "/etc/gitviewrc";
pub const USER_CONFIG: &str = "~/.gitviewrc";

/// Name used in diagnostics for the compiled-in configuration.
pub const BUILTIN_ORIGIN: &str = "<built-in>";

/// How many files `source` may nest, counting the outermost one.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Progress of one load pass over a single configuration source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigState {
    pub path: String,
    pub lineno: usize,
    /// Set when any line failed. Deprecation notices do not count.
    pub errors: bool,
}

impl ConfigState {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            lineno: 0,
            errors: false,
        }
    }
}

/// Expands a leading `~/` to the home directory.
pub fn expand_path(env: &dyn Environment, path: &str) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = env.var("HOME").ok_or(ConfigError::HomeNotSet)?;
            Ok(PathBuf::from(home).join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

/// Interprets one line of configuration text.
fn read_option(engine: &mut ConfigEngine, line: &str) -> Status {
    let (name, value) = split_option_line(line);

    // The splitter only looks for blanks, so a comment may start inside the
    // command name.
    match name.find('#') {
        Some(0) => return Ok(Outcome::Applied),
        Some(_) => return Err(ConfigError::NoOptionValue),
        None if name.is_empty() => return Ok(Outcome::Applied),
        None => {}
    }

    let argv = argv_from_string(strip_comment(value))
        .ok_or_else(|| ConfigError::TooManyArguments(name.to_string()))?;
    engine.set_option(name, &argv)
}

/// Runs every line of `text` through the command dispatcher.
///
/// Failing lines are reported as `path:line: message` and the pass carries
/// on; a summary warning follows if any line failed.
pub fn load_from_str(engine: &mut ConfigEngine, path: &str, text: &str) -> ConfigState {
    let mut state = ConfigState::new(path);

    for line in text.lines() {
        state.lineno += 1;

        match read_option(engine, line) {
            Ok(Outcome::Applied) => {}
            Ok(Outcome::Deprecated(message)) => {
                engine.report(path, state.lineno, Severity::Deprecation, message);
            }
            Err(error) => {
                engine.report(path, state.lineno, Severity::Error, error.to_string());
                state.errors = true;
            }
        }
    }

    if state.errors {
        warn!("Errors while loading {path}.");
    }
    state
}

/// Loads one configuration file.
///
/// An empty path loads nothing. A missing file is reported as
/// [`ConfigError::FileDoesNotExist`] so callers can fall back to defaults.
pub fn load_option_file(engine: &mut ConfigEngine, path: &str) -> Result<ConfigState, ConfigError> {
    if path.is_empty() {
        return Ok(ConfigState::new(path));
    }

    let expanded = expand_path(engine.env(), path)?;
    if engine.include_depth >= MAX_INCLUDE_DEPTH {
        return Err(ConfigError::IncludeDepth(MAX_INCLUDE_DEPTH));
    }

    let text = match fs::read_to_string(&expanded) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::FileDoesNotExist(path.to_string()));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: expanded,
                source,
            });
        }
    };

    debug!("Loading configuration from {}", expanded.display());
    engine.include_depth += 1;
    let state = load_from_str(engine, path, &text);
    engine.include_depth -= 1;
    Ok(state)
}

/// Resolves where configuration comes from and loads it in order: system
/// file (or the built-in text in its place), user file, then the diff
/// options override.
pub struct ConfigManager {
    system_path: String,
    custom_system: bool,
    user_path: String,
    custom_user: bool,
    diff_opts: Option<String>,
}

impl ConfigManager {
    pub fn from_environment(env: &dyn Environment) -> Self {
        let system = env.var(SYSTEM_CONFIG_ENV);
        let user = env.var(USER_CONFIG_ENV);

        Self {
            custom_system: system.is_some(),
            system_path: system.unwrap_or_else(|| SYSTEM_CONFIG.to_string()),
            custom_user: user.is_some(),
            user_path: user.unwrap_or_else(|| USER_CONFIG.to_string()),
            diff_opts: env.var(DIFF_OPTS_ENV).filter(|value| !value.is_empty()),
        }
    }

    pub fn system_path(&self) -> &str {
        &self.system_path
    }

    pub fn user_path(&self) -> &str {
        &self.user_path
    }

    /// Runs the layered load sequence.
    ///
    /// # Returns
    /// An error only for conditions the program cannot run with: a broken
    /// built-in configuration or an unusable diff options override.
    pub fn load_options(&self, engine: &mut ConfigEngine) -> Result<()> {
        if !engine.options.is_seen(OptionId::DiffContext) {
            engine.options.set_int(OptionId::DiffContext, -3);
        }

        engine.options.begin_layer();
        match load_option_file(engine, &self.system_path) {
            Err(error) if error.is_missing_file() && !self.custom_system => {
                debug!("No {}, using the built-in configuration", self.system_path);
                let state = load_from_str(engine, BUILTIN_ORIGIN, BUILTIN_CONFIG);
                if state.errors {
                    bail!("Error in built-in config");
                }
            }
            result => self.report_failure(engine, &self.system_path, result),
        }

        engine.options.begin_layer();
        let result = load_option_file(engine, &self.user_path);
        self.report_failure(engine, &self.user_path, result);

        self.apply_diff_opts(engine)
    }

    fn report_failure(&self, engine: &mut ConfigEngine, path: &str, result: Result<ConfigState, ConfigError>) {
        match result {
            Ok(_) => {}
            Err(error) if error.is_missing_file() => {
                let explicit = (path == self.system_path && self.custom_system)
                    || (path == self.user_path && self.custom_user);
                if explicit {
                    engine.report(path, 0, Severity::Error, error.to_string());
                } else {
                    debug!("No {path}, skipping");
                }
            }
            Err(error) => engine.report(path, 0, Severity::Error, error.to_string()),
        }
    }

    fn apply_diff_opts(&self, engine: &mut ConfigEngine) -> Result<()> {
        let Some(value) = &self.diff_opts else {
            return Ok(());
        };

        let from_args = engine.options.seen_from_command_line(OptionId::DiffOptions)
            || engine.options.seen_from_command_line(OptionId::DiffContext);
        if from_args {
            debug!("Ignoring {DIFF_OPTS_ENV}, diff options were given as arguments");
            return Ok(());
        }

        let Some(argv) = argv_from_string(value) else {
            bail!("{DIFF_OPTS_ENV} contains too many arguments");
        };
        engine.options.assign_args(OptionId::DiffOptions, &argv);
        Ok(())
    }
}
