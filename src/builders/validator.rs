use regex::Regex;
use std::sync::LazyLock;

use crate::core::enum_map::enum_equals;
use crate::core::status::ConfigError;

/// The `ViewConfigValidator` trait defines the public interface for checking
/// the column lists assigned to the `*-view` options.
///
/// This trait lets the view layer that owns the columns supply its own rules
/// in place of the built-in tables.
pub trait ViewConfigValidator {
    /// Validates the column specs given for one view option.
    ///
    /// # Arguments
    /// * `view`: The option name, e.g. `main-view`.
    /// * `argv`: The column specs, one per argument.
    ///
    /// # Returns
    /// `Ok(())` if every spec is acceptable, otherwise the first problem found.
    fn validate_view_config(&self, view: &str, argv: &[String]) -> Result<(), ConfigError>;
}

/// Columns each view can display.
static VIEW_COLUMNS: &NameTable = &[
    ("blame-view", &["author", "date", "file-name", "id", "line-number", "text"]),
    ("blob-view", &["line-number", "text"]),
    ("diff-view", &["line-number", "text"]),
    ("grep-view", &["file-name", "line-number", "text"]),
    ("log-view", &["line-number", "text"]),
    ("main-view", &["author", "commit-title", "date", "id", "line-number"]),
    ("pager-view", &["line-number", "text"]),
    ("refs-view", &["author", "commit-title", "date", "id", "line-number", "ref"]),
    ("stage-view", &["line-number", "text"]),
    ("stash-view", &["author", "commit-title", "date", "id", "line-number"]),
    ("status-view", &["file-name", "line-number", "status"]),
    ("tree-view", &["author", "date", "file-name", "file-size", "id", "line-number", "mode"]),
];

/// Options each column understands besides its display value.
static COLUMN_OPTIONS: &NameTable = &[
    ("author", &["display", "width", "maxwidth"]),
    ("commit-title", &["display", "graph", "refs", "overflow"]),
    ("date", &["display", "local", "format", "width"]),
    ("file-name", &["display", "width", "maxwidth"]),
    ("file-size", &["display", "width"]),
    ("id", &["display", "width"]),
    ("line-number", &["display", "interval", "width"]),
    ("mode", &["display", "width"]),
    ("ref", &["display", "width", "maxwidth"]),
    ("section", &["display", "type", "text"]),
    ("status", &["display", "width"]),
    ("text", &["display", "commands"]),
];

static OPTION_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z][A-Za-z0-9_-]*)(?:=(?P<value>.+))?$")
        .expect("OPTION_ITEM is a valid static regex pattern")
});

type NameTable = [(&'static str, &'static [&'static str])];

fn lookup(table: &'static NameTable, name: &str) -> Option<&'static [&'static str]> {
    table
        .iter()
        .find(|(key, _)| enum_equals(key, name))
        .map(|(_, values)| *values)
}

/// Whether `option` is one of the string-vector options that configure the
/// columns of a view.
pub fn is_view_option(option: &str) -> bool {
    lookup(VIEW_COLUMNS, option).is_some()
}

/// The `StandardValidator` is a concrete implementation of `ViewConfigValidator`.
///
/// Each spec has the form `<column>[:<value>][,<option>[=<value>]]...`. The
/// column must be one the view displays and every option must be one the
/// column understands.
pub struct StandardValidator;

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }

    /// Checks one column spec against the columns of a view.
    fn check_column(&self, view: &str, columns: &[&str], spec: &str) -> Result<(), ConfigError> {
        let mut items = spec.split(',');
        let head = items.next().unwrap_or_default();
        let column = head.split_once(':').map_or(head, |(column, _)| column);

        if !columns.iter().any(|known| enum_equals(known, column)) {
            return Err(ConfigError::UnknownColumn {
                view: view.to_string(),
                column: column.to_string(),
            });
        }

        let options = lookup(COLUMN_OPTIONS, column).unwrap_or_default();
        for item in items {
            let known = OPTION_ITEM
                .captures(item)
                .and_then(|captures| captures.name("name"))
                .is_some_and(|name| options.iter().any(|option| enum_equals(option, name.as_str())));

            if !known {
                return Err(ConfigError::InvalidColumnOption {
                    column: column.to_string(),
                    option: item.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewConfigValidator for StandardValidator {
    /// Views without a column table are accepted as they are; the option
    /// registry decides which names exist.
    fn validate_view_config(&self, view: &str, argv: &[String]) -> Result<(), ConfigError> {
        let Some(columns) = lookup(VIEW_COLUMNS, view) else {
            return Ok(());
        };

        argv.iter()
            .try_for_each(|spec| self.check_column(view, columns, spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(view: &str, args: &[&str]) -> Result<(), ConfigError> {
        let argv: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        StandardValidator::new().validate_view_config(view, &argv)
    }

    #[test]
    fn test_valid_main_view() {
        validate(
            "main-view",
            &[
                "line-number:no,interval=5",
                "id:no",
                "date:default",
                "author:full",
                "commit-title:yes,graph,refs,overflow=no",
            ],
        )
        .unwrap();
    }

    #[test]
    fn test_column_must_belong_to_view() {
        let error = validate("status-view", &["commit-title"]).unwrap_err();
        assert_eq!(error.to_string(), "Unknown column type for status-view: commit-title");
    }

    #[test]
    fn test_column_options_are_checked() {
        let error = validate("tree-view", &["file-size:units,colour=red"]).unwrap_err();
        assert_eq!(error.to_string(), "Invalid option for column file-size: colour=red");

        let error = validate("tree-view", &["mode,=x"]).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidColumnOption { .. }));
    }

    #[test]
    fn test_other_options_are_not_checked() {
        validate("diff-options", &["--patience", "anything"]).unwrap();
        assert!(is_view_option("grep-view"));
        assert!(!is_view_option("blame-options"));
    }
}
