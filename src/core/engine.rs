use std::fmt;
use tracing::{debug, warn};

use crate::builders::bindings::bind_command;
use crate::builders::keymaps::KeymapRegistry;
use crate::builders::styles::{StyleRegistry, color_command};
use crate::builders::validator::{StandardValidator, ViewConfigValidator, is_view_option};
use crate::core::config;
use crate::core::enum_map::find_remapped;
use crate::core::env::{Environment, ProcessEnvironment};
use crate::core::git::RepoInfo;
use crate::core::options::{OBSOLETE_OPTIONS, OptionKind, OptionRegistry, Seen};
use crate::core::refs::RefFormats;
use crate::core::status::{ConfigError, Outcome, Status};

/// Whether a diagnostic failed the line or only flagged deprecated syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Deprecation,
}

/// A message produced while loading configuration, with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub origin: String,
    /// One-based line number; 0 for messages not tied to a line.
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.origin, self.message)
        } else {
            write!(f, "{}:{}: {}", self.origin, self.line, self.message)
        }
    }
}

/// The process-wide configuration store and the interpreter that fills it.
///
/// Everything a configuration command can change lives here: the option
/// registry, style rules, key bindings, reference formats and what was
/// learned about the repository. Reloading means building a fresh engine and
/// running the same load sequence again.
pub struct ConfigEngine {
    pub options: OptionRegistry,
    pub styles: StyleRegistry,
    pub keymaps: KeymapRegistry,
    pub ref_formats: RefFormats,
    pub repo: RepoInfo,
    validator: Box<dyn ViewConfigValidator>,
    env: Box<dyn Environment>,
    diagnostics: Vec<Diagnostic>,
    pub(crate) include_depth: usize,
}

impl ConfigEngine {
    /// Creates an engine with compiled-in defaults bound to the real process
    /// environment.
    pub fn new() -> Self {
        Self::with_environment(Box::new(ProcessEnvironment))
    }

    pub fn with_environment(env: Box<dyn Environment>) -> Self {
        Self {
            options: OptionRegistry::new(),
            styles: StyleRegistry::new(),
            keymaps: KeymapRegistry::new(),
            ref_formats: RefFormats::default(),
            repo: RepoInfo::default(),
            validator: Box::new(StandardValidator::new()),
            env,
            diagnostics: Vec::new(),
            include_depth: 0,
        }
    }

    /// Replaces the checker used for the `*-view` column lists.
    pub fn with_validator(mut self, validator: Box<dyn ViewConfigValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn env(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    /// Every diagnostic reported so far, oldest first.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }

    /// Logs a diagnostic and keeps it for later inspection.
    pub fn report(&mut self, origin: &str, line: usize, severity: Severity, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            origin: origin.to_string(),
            line,
            severity,
            message: message.into(),
        };
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Runs one configuration command.
    ///
    /// # Arguments
    /// * `verb`: One of `color`, `set`, `bind` or `source`.
    /// * `argv`: The tokenized arguments following the verb.
    pub fn set_option(&mut self, verb: &str, argv: &[String]) -> Status {
        debug!(verb, ?argv, "config command");

        match verb {
            "color" => color_command(&mut self.styles, &self.keymaps, argv),
            "set" => self.set_command(argv),
            "bind" => bind_command(&mut self.keymaps, argv),
            "source" => self.source_command(argv),
            _ => Err(ConfigError::UnknownCommand(verb.to_string())),
        }
    }

    /// Handles `set <name> = <value...>`.
    ///
    /// An option already marked as seen keeps its value and the command
    /// succeeds without effect. A rejected value never marks the option.
    fn set_command(&mut self, argv: &[String]) -> Status {
        if argv.len() < 3 {
            return Err(ConfigError::InvalidSetCommand);
        }
        if argv[1] != "=" {
            return Err(ConfigError::NoValueAssigned(argv[0].clone()));
        }

        let name = argv[0].as_str();
        let values = &argv[2..];

        if name == "reference-format" {
            self.ref_formats.parse(values)?;
            return Ok(Outcome::Applied);
        }

        let Some(id) = self.options.find(name) else {
            return Err(match find_remapped(OBSOLETE_OPTIONS, name) {
                Some(index) => ConfigError::ObsoleteOption {
                    name: name.to_string(),
                    replacement: OBSOLETE_OPTIONS[index].1,
                },
                None => ConfigError::UnknownOption(name.to_string()),
            });
        };

        if self.options.is_seen(id) {
            return Ok(Outcome::Applied);
        }

        if let OptionKind::Args = self.options.entry(id).kind {
            if is_view_option(name) {
                self.validator.validate_view_config(name, values)?;
            }
            self.options.assign_args(id, values);
        } else {
            if values.len() > 1 {
                return Err(ConfigError::TooManyValues(name.to_string()));
            }
            self.options.assign(id, "", &values[0])?;
        }

        self.options.mark_seen(id, Seen::Config);
        Ok(Outcome::Applied)
    }

    /// Handles `source <path>`.
    fn source_command(&mut self, argv: &[String]) -> Status {
        let [path] = argv else {
            return Err(ConfigError::InvalidSourceCommand);
        };

        match config::load_option_file(self, path) {
            Ok(_) => Ok(Outcome::Applied),
            Err(error) if error.is_missing_file() => Err(ConfigError::FileDoesNotExist(path.clone())),
            Err(error) => Err(error),
        }
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}
