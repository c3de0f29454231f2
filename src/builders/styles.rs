use serde::Serialize;
use std::fmt;

use crate::builders::keymaps::KeymapRegistry;
use crate::builders::tokenizer::argv_from_string;
use crate::core::enum_map::{ATTR_MAP, COLOR_DEFAULT, enum_equals, find_remapped};
use crate::core::status::{ConfigError, Outcome, Status};
use crate::core::values::{SIZEOF_STR, parse_color, parse_string};

/// Symbolic names of the display areas that can be colored.
static AREA_NAMES: &[&str] = &[
    "default",
    "cursor",
    "status",
    "delimiter",
    "date",
    "mode",
    "id",
    "overflow",
    "header",
    "section",
    "directory",
    "file",
    "file-size",
    "line-number",
    "title-blur",
    "title-focus",
    "author",
    "commit",
    "search-result",
    "graph-commit",
    "diff-header",
    "diff-index",
    "diff-chunk",
    "diff-add",
    "diff-add2",
    "diff-add-highlight",
    "diff-del",
    "diff-del2",
    "diff-del-highlight",
    "diff-oldmode",
    "diff-newmode",
    "diff-similarity",
    "diff-stat",
    "main-date",
    "main-author",
    "main-commit",
    "main-annotated",
    "main-tag",
    "main-local-tag",
    "main-remote",
    "main-replace",
    "main-tracked",
    "main-ref",
    "main-head",
    "stat-none",
    "stat-staged",
    "stat-unstaged",
    "stat-untracked",
    "help-group",
    "help-action",
    "help-section",
];

/// Selector names accepted by earlier releases and what replaced them.
static OBSOLETE_COLORS: &[(&str, &str)] = &[
    ("acked", "'    Acked-by'"),
    ("diff-copy-from", "'copy from '"),
    ("diff-copy-to", "'copy to '"),
    ("diff-deleted-file-mode", "'deleted file mode '"),
    ("diff-dissimilarity", "'dissimilarity '"),
    ("diff-rename-from", "'rename from '"),
    ("diff-rename-to", "'rename to '"),
    ("diff-tree", "'diff-tree '"),
    ("filename", "file"),
    ("help-keymap", "help.section"),
    ("pp-adate", "'AuthorDate: '"),
    ("pp-author", "'Author: '"),
    ("pp-cdate", "'CommitDate: '"),
    ("pp-commit", "'Commit: '"),
    ("pp-date", "'Date: '"),
    ("reviewed", "'    Reviewed-by'"),
    ("signoff", "'    Signed-off-by'"),
    ("stat-head", "status.header"),
    ("stat-section", "status.section"),
    ("tested", "'    Tested-by'"),
    ("tree-dir", "tree.directory"),
    ("tree-file", "tree.file"),
    ("tree-head", "tree.header"),
];

/// Git's own color settings and the areas they style.
pub static GIT_COLORS: &[(&str, &str)] = &[
    ("branch.current", "main-head"),
    ("branch.local", "main-ref"),
    ("branch.plain", "main-ref"),
    ("branch.remote", "main-remote"),
    ("diff.meta", "diff-header"),
    ("diff.meta", "diff-index"),
    ("diff.meta", "diff-oldmode"),
    ("diff.meta", "diff-newmode"),
    ("diff.frag", "diff-chunk"),
    ("diff.old", "diff-del"),
    ("diff.new", "diff-add"),
    ("grep.filename", "grep.file"),
    ("grep.linenumber", "grep.line-number"),
    ("grep.separator", "grep.delimiter"),
    ("status.branch", "status.header"),
    ("status.added", "stat-staged"),
    ("status.updated", "stat-staged"),
    ("status.changed", "stat-unstaged"),
    ("status.untracked", "stat-untracked"),
];

/// What a style rule matches: a symbolic area or lines starting with a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    Area(String),
    Line(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Area(name) => f.write_str(name),
            Selector::Line(text) => write!(f, "'{text}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Keymap the rule is limited to; `None` applies everywhere.
    pub scope: Option<&'static str>,
    pub selector: Selector,
    pub fg: i32,
    pub bg: i32,
    pub attr: i32,
}

/// Style rules keyed by scope and selector. A later rule for the same key
/// replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    rules: Vec<StyleRule>,
}

fn find_area(name: &str) -> Option<&'static str> {
    AREA_NAMES.iter().copied().find(|area| enum_equals(area, name))
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quoted line selectors are always accepted; areas must be known.
    pub fn is_known(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Area(name) => find_area(name).is_some(),
            Selector::Line(_) => true,
        }
    }

    pub fn set(&mut self, scope: Option<&'static str>, selector: Selector, fg: i32, bg: i32, attr: i32) {
        let selector = match selector {
            Selector::Area(name) => Selector::Area(find_area(&name).map_or(name, str::to_string)),
            line => line,
        };

        match self
            .rules
            .iter_mut()
            .find(|rule| rule.scope == scope && rule.selector == selector)
        {
            Some(rule) => {
                rule.fg = fg;
                rule.bg = bg;
                rule.attr = attr;
            }
            None => self.rules.push(StyleRule {
                scope,
                selector,
                fg,
                bg,
                attr,
            }),
        }
    }

    pub fn get(&self, scope: Option<&str>, selector: &Selector) -> Option<&StyleRule> {
        self.rules.iter().find(|rule| {
            rule.scope == scope
                && match (&rule.selector, selector) {
                    (Selector::Area(a), Selector::Area(b)) => enum_equals(a, b),
                    (a, b) => a == b,
                }
        })
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }
}

fn is_quoted(name: &str) -> bool {
    name.starts_with(['"', '\''])
}

/// Splits a selector into its optional `<keymap>.` scope and the selector
/// proper. Quoted selectors never carry a scope.
pub fn parse_color_name(
    name: &str,
    keymaps: &KeymapRegistry,
) -> Result<(Option<&'static str>, Selector), ConfigError> {
    let (scope, name) = match name.split_once('.') {
        Some((prefix, rest)) if !is_quoted(name) => {
            let keymap = keymaps
                .get_keymap(prefix)
                .ok_or_else(|| ConfigError::UnknownKeymap(prefix.to_string()))?;
            (Some(keymaps.name(keymap)), rest)
        }
        _ => (None, name),
    };

    let selector = if is_quoted(name) {
        Selector::Line(parse_string(name, SIZEOF_STR)?)
    } else {
        Selector::Area(name.to_string())
    };
    Ok((scope, selector))
}

/// Handles `color <selector> <fg> <bg> [attributes...]`.
pub fn color_command(styles: &mut StyleRegistry, keymaps: &KeymapRegistry, argv: &[String]) -> Status {
    if argv.len() < 3 {
        return Err(ConfigError::InvalidColorCommand);
    }

    let (mut scope, mut selector) = parse_color_name(&argv[0], keymaps)?;
    let mut outcome = Outcome::Applied;

    if !styles.is_known(&selector) {
        let index = match &selector {
            Selector::Area(name) => find_remapped(OBSOLETE_COLORS, name),
            Selector::Line(_) => None,
        }
        .ok_or_else(|| ConfigError::UnknownColorName(argv[0].clone()))?;

        let (old, new) = OBSOLETE_COLORS[index];
        let (new_scope, new_selector) = parse_color_name(new, keymaps)?;
        // A scope written by the user wins over the one in the replacement.
        scope = scope.or(new_scope);
        selector = new_selector;
        if !styles.is_known(&selector) {
            return Err(ConfigError::UnknownColorName(argv[0].clone()));
        }
        outcome = Outcome::Deprecated(format!("{old} has been replaced by {new}"));
    }

    let fg = parse_color(&argv[1]).ok_or_else(|| ConfigError::UnknownColor(argv[1].clone()))?;
    let bg = parse_color(&argv[2]).ok_or_else(|| ConfigError::UnknownColor(argv[2].clone()))?;
    let mut attr = 0;
    for name in &argv[3..] {
        attr |= ATTR_MAP
            .lookup(name)
            .ok_or_else(|| ConfigError::UnknownAttribute(name.clone()))?;
    }

    styles.set(scope, selector, fg, bg, attr);
    Ok(outcome)
}

/// Reads a git color value such as `bold red ul` into `(fg, bg, attr)`.
///
/// The first color is the foreground and the second the background;
/// attributes may appear anywhere. Words that are neither are skipped.
pub fn parse_git_color(value: &str) -> Option<(i32, i32, i32)> {
    let argv = argv_from_string(value)?;
    let mut colors = Vec::with_capacity(2);
    let mut attr = 0;

    for word in &argv {
        let word = if word == "ul" { "underline" } else { word.as_str() };

        if let Some(value) = ATTR_MAP.lookup(word) {
            attr |= value;
        } else if let Some(color) = parse_color(word)
            && colors.len() < 2
        {
            colors.push(color);
        }
    }

    let fg = colors.first().copied().unwrap_or(COLOR_DEFAULT);
    let bg = colors.get(1).copied().unwrap_or(COLOR_DEFAULT);
    Some((fg, bg, attr))
}

/// Applies a git color value to the area named by `target`.
///
/// # Returns
/// `false` when the value cannot be tokenized or `target` is unknown.
pub fn apply_git_color(styles: &mut StyleRegistry, keymaps: &KeymapRegistry, target: &str, value: &str) -> bool {
    let Some((fg, bg, attr)) = parse_git_color(value) else {
        return false;
    };

    match parse_color_name(target, keymaps) {
        Ok((scope, selector)) if styles.is_known(&selector) => {
            styles.set(scope, selector, fg, bg, attr);
            true
        }
        _ => false,
    }
}
