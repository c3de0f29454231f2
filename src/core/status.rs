use std::path::PathBuf;
use thiserror::Error;

/// The successful result of a configuration command.
///
/// A command that used a deprecated spelling is still applied, but carries an
/// advisory message that the loader surfaces next to the offending line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Deprecated(String),
}

/// The status returned by every configuration command.
pub type Status = Result<Outcome, ConfigError>;

/// Errors produced while interpreting configuration commands and files.
///
/// The `Display` text of each variant is the message shown to the user, usually
/// prefixed with the `path:line:` of the command that produced it. All variants
/// except the I/O and include-depth ones are user-input errors: the loader
/// reports them and keeps going.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Non-boolean value treated as false: {0}")]
    NonBoolean(String),

    #[error("Value must be between {min} and {max}")]
    OutOfRange { min: i32, max: i32 },

    #[error("Percentage is larger than 100%")]
    PercentageTooLarge,

    #[error("Percentage is less than 0%")]
    PercentageTooSmall,

    #[error("Unmatched quotation")]
    UnmatchedQuotation,

    #[error("No option value")]
    NoOptionValue,

    #[error("Too many option arguments for {0}")]
    TooManyArguments(String),

    #[error("Unknown option command: {0}")]
    UnknownCommand(String),

    #[error("Invalid set command: set option = value")]
    InvalidSetCommand,

    #[error("No value assigned to {0}")]
    NoValueAssigned(String),

    #[error("Option {0} only takes one value")]
    TooManyValues(String),

    #[error("Unknown option name: {0}")]
    UnknownOption(String),

    #[error("{name} is obsolete; use the {replacement} view column options instead")]
    ObsoleteOption {
        name: String,
        replacement: &'static str,
    },

    #[error("Unknown ref format: {0}")]
    UnknownRefFormat(String),

    #[error("Unknown column type for {view}: {column}")]
    UnknownColumn { view: String, column: String },

    #[error("Invalid option for column {column}: {option}")]
    InvalidColumnOption { column: String, option: String },

    #[error("Invalid color mapping: color area fgcolor bgcolor [attrs]")]
    InvalidColorCommand,

    #[error("Unknown color name: {0}")]
    UnknownColorName(String),

    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Unknown color attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid key binding: bind keymap key action")]
    InvalidBindCommand,

    #[error("Unknown key map: {0}")]
    UnknownKeymap(String),

    #[error("Unknown key combo: {0}")]
    UnknownKeyCombo(String),

    #[error("Max {max} keys are allowed in key combos: {combo}")]
    TooManyKeys { max: usize, combo: String },

    #[error("Unknown request name: {0}")]
    UnknownRequest(String),

    #[error("Invalid source command: source path")]
    InvalidSourceCommand,

    #[error("File does not exist: {0}")]
    FileDoesNotExist(String),

    #[error("Failed to expand ~ to user home directory")]
    HomeNotSet,

    #[error("Files are nested more than {0} levels deep")]
    IncludeDepth(usize),

    #[error("Error loading file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Whether this is the distinguished "file not found" status that lets
    /// callers fall back to compiled-in defaults.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, ConfigError::FileDoesNotExist(_))
    }
}
