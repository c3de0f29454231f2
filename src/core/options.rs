use serde::Serialize;

use crate::core::enum_map::{
    COMMIT_ORDER_ARG_MAP, COMMIT_ORDER_MAP, EnumMap, IGNORE_CASE_MAP, IGNORE_SPACE_ARG_MAP,
    IGNORE_SPACE_MAP, LINE_GRAPHICS_MAP, REFRESH_MODE_MAP, VERTICAL_SPLIT_MAP,
};
use crate::core::status::{ConfigError, Outcome, Status};
use crate::core::values::{
    SIZEOF_STR, parse_bool, parse_bounded_int, parse_enum, parse_step, parse_string,
    parse_string_vector,
};

/// Length of a full revision id plus terminator; bounds `id-width`.
pub const SIZEOF_REV: i32 = 41;

const NOTES_ARG: &str = "--show-notes";
const NOTES_EQ_ARG: &str = "--show-notes=";

/// Identifies one entry of the option registry.
///
/// The declaration order matches [`OPTION_SCHEMA`], which lets the registry
/// index its entries by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionId {
    BlameOptions,
    BlameView,
    BlobView,
    CommitOrder,
    CommitTitleOverflow,
    DiffContext,
    DiffHighlight,
    DiffOptions,
    DiffView,
    EditorLineNumber,
    FileFilter,
    FocusChild,
    GrepView,
    HorizontalScroll,
    IdWidth,
    IgnoreCase,
    IgnoreSpace,
    LineGraphics,
    LineNumberInterval,
    LogView,
    MainView,
    Mouse,
    MouseScroll,
    PagerView,
    ReadGitColors,
    RefreshInterval,
    RefreshMode,
    RefsView,
    ShowChanges,
    ShowNotes,
    SplitViewHeight,
    SplitViewWidth,
    StageView,
    StashView,
    StatusUntrackedDirs,
    StatusView,
    TabSize,
    TreeView,
    VerticalSplit,
    WrapLines,
}

/// The value kind of an option, which selects its coercer.
#[derive(Debug, Clone, Copy)]
pub enum OptionKind {
    Bool,
    Int,
    Step,
    Enum(&'static EnumMap),
    Str,
    Args,
}

/// Compile-time default of an option.
#[derive(Debug, Clone, Copy)]
enum DefaultValue {
    Bool(bool),
    Int(i32),
    Step(f64),
    Enum(i32),
    Str(&'static str),
    Args,
}

struct OptionSpec {
    id: OptionId,
    name: &'static str,
    kind: OptionKind,
    default: DefaultValue,
}

const fn spec(id: OptionId, name: &'static str, kind: OptionKind, default: DefaultValue) -> OptionSpec {
    OptionSpec {
        id,
        name,
        kind,
        default,
    }
}

use OptionId as O;
use OptionKind as K;

static OPTION_SCHEMA: &[OptionSpec] = &[
    spec(O::BlameOptions, "blame-options", K::Args, DefaultValue::Args),
    spec(O::BlameView, "blame-view", K::Args, DefaultValue::Args),
    spec(O::BlobView, "blob-view", K::Args, DefaultValue::Args),
    spec(O::CommitOrder, "commit-order", K::Enum(&COMMIT_ORDER_MAP), DefaultValue::Enum(0)),
    spec(O::CommitTitleOverflow, "commit-title-overflow", K::Int, DefaultValue::Int(0)),
    spec(O::DiffContext, "diff-context", K::Int, DefaultValue::Int(3)),
    spec(O::DiffHighlight, "diff-highlight", K::Str, DefaultValue::Str("")),
    spec(O::DiffOptions, "diff-options", K::Args, DefaultValue::Args),
    spec(O::DiffView, "diff-view", K::Args, DefaultValue::Args),
    spec(O::EditorLineNumber, "editor-line-number", K::Bool, DefaultValue::Bool(true)),
    spec(O::FileFilter, "file-filter", K::Bool, DefaultValue::Bool(true)),
    spec(O::FocusChild, "focus-child", K::Bool, DefaultValue::Bool(true)),
    spec(O::GrepView, "grep-view", K::Args, DefaultValue::Args),
    spec(O::HorizontalScroll, "horizontal-scroll", K::Step, DefaultValue::Step(0.5)),
    spec(O::IdWidth, "id-width", K::Int, DefaultValue::Int(7)),
    spec(O::IgnoreCase, "ignore-case", K::Enum(&IGNORE_CASE_MAP), DefaultValue::Enum(0)),
    spec(O::IgnoreSpace, "ignore-space", K::Enum(&IGNORE_SPACE_MAP), DefaultValue::Enum(0)),
    spec(O::LineGraphics, "line-graphics", K::Enum(&LINE_GRAPHICS_MAP), DefaultValue::Enum(1)),
    spec(O::LineNumberInterval, "line-number-interval", K::Int, DefaultValue::Int(5)),
    spec(O::LogView, "log-view", K::Args, DefaultValue::Args),
    spec(O::MainView, "main-view", K::Args, DefaultValue::Args),
    spec(O::Mouse, "mouse", K::Bool, DefaultValue::Bool(false)),
    spec(O::MouseScroll, "mouse-scroll", K::Int, DefaultValue::Int(3)),
    spec(O::PagerView, "pager-view", K::Args, DefaultValue::Args),
    spec(O::ReadGitColors, "read-git-colors", K::Bool, DefaultValue::Bool(true)),
    spec(O::RefreshInterval, "refresh-interval", K::Int, DefaultValue::Int(10)),
    spec(O::RefreshMode, "refresh-mode", K::Enum(&REFRESH_MODE_MAP), DefaultValue::Enum(1)),
    spec(O::RefsView, "refs-view", K::Args, DefaultValue::Args),
    spec(O::ShowChanges, "show-changes", K::Bool, DefaultValue::Bool(true)),
    spec(O::ShowNotes, "show-notes", K::Bool, DefaultValue::Bool(true)),
    spec(O::SplitViewHeight, "split-view-height", K::Step, DefaultValue::Step(2.0 / 3.0)),
    spec(O::SplitViewWidth, "split-view-width", K::Step, DefaultValue::Step(0.5)),
    spec(O::StageView, "stage-view", K::Args, DefaultValue::Args),
    spec(O::StashView, "stash-view", K::Args, DefaultValue::Args),
    spec(O::StatusUntrackedDirs, "status-untracked-dirs", K::Bool, DefaultValue::Bool(true)),
    spec(O::StatusView, "status-view", K::Args, DefaultValue::Args),
    spec(O::TabSize, "tab-size", K::Int, DefaultValue::Int(8)),
    spec(O::TreeView, "tree-view", K::Args, DefaultValue::Args),
    spec(O::VerticalSplit, "vertical-split", K::Enum(&VERTICAL_SPLIT_MAP), DefaultValue::Enum(2)),
    spec(O::WrapLines, "wrap-lines", K::Bool, DefaultValue::Bool(false)),
];

/// Names accepted by earlier releases, and the view columns replacing them.
pub const OBSOLETE_OPTIONS: &[(&str, &str)] = &[
    ("author-width", "author"),
    ("filename-width", "file-name"),
    ("show-author", "author"),
    ("show-date", "date"),
    ("show-file-size", "file-size"),
    ("show-filename", "file-name"),
    ("show-id", "id"),
    ("show-line-numbers", "line-number"),
    ("show-refs", "commit-title"),
    ("show-rev-graph", "commit-title"),
    ("title-overflow", "commit-title and text"),
];

/// Typed storage of an option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    Step(f64),
    Enum(i32),
    Str(String),
    Args(Vec<String>),
}

/// Whether, and from where, an option was explicitly assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seen {
    Unseen,
    /// Assigned by a configuration file or the git configuration.
    Config,
    /// Assigned by a command-line flag; outranks every file.
    CommandLine,
}

#[derive(Debug, Clone)]
pub struct OptionEntry {
    pub id: OptionId,
    pub name: &'static str,
    pub kind: OptionKind,
    pub value: OptionValue,
    pub seen: Seen,
}

/// The fixed table of named, typed settings.
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    entries: Vec<OptionEntry>,
    notes_arg: String,
}

impl OptionRegistry {
    /// Builds the registry with every option at its compiled-in default.
    pub fn new() -> Self {
        let entries = OPTION_SCHEMA
            .iter()
            .map(|spec| OptionEntry {
                id: spec.id,
                name: spec.name,
                kind: spec.kind,
                value: match spec.default {
                    DefaultValue::Bool(value) => OptionValue::Bool(value),
                    DefaultValue::Int(value) => OptionValue::Int(value),
                    DefaultValue::Step(value) => OptionValue::Step(value),
                    DefaultValue::Enum(value) => OptionValue::Enum(value),
                    DefaultValue::Str(value) => OptionValue::Str(value.to_string()),
                    DefaultValue::Args => OptionValue::Args(Vec::new()),
                },
                seen: Seen::Unseen,
            })
            .collect();

        Self {
            entries,
            notes_arg: NOTES_ARG.to_string(),
        }
    }

    /// Finds an option by its exact name.
    pub fn find(&self, name: &str) -> Option<OptionId> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.id)
    }

    pub fn entry(&self, id: OptionId) -> &OptionEntry {
        &self.entries[id as usize]
    }

    fn entry_mut(&mut self, id: OptionId) -> &mut OptionEntry {
        &mut self.entries[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.iter()
    }

    pub fn value(&self, id: OptionId) -> &OptionValue {
        &self.entry(id).value
    }

    pub fn bool(&self, id: OptionId) -> bool {
        matches!(self.value(id), OptionValue::Bool(true))
    }

    pub fn int(&self, id: OptionId) -> i32 {
        match self.value(id) {
            OptionValue::Int(value) | OptionValue::Enum(value) => *value,
            _ => 0,
        }
    }

    pub fn step(&self, id: OptionId) -> f64 {
        match self.value(id) {
            OptionValue::Step(value) => *value,
            _ => 0.0,
        }
    }

    pub fn string(&self, id: OptionId) -> &str {
        match self.value(id) {
            OptionValue::Str(value) => value,
            _ => "",
        }
    }

    pub fn args(&self, id: OptionId) -> &[String] {
        match self.value(id) {
            OptionValue::Args(value) => value,
            _ => &[],
        }
    }

    /// The refinement passed along with `--show-notes`.
    pub fn notes_arg(&self) -> &str {
        &self.notes_arg
    }

    pub fn is_seen(&self, id: OptionId) -> bool {
        self.entry(id).seen != Seen::Unseen
    }

    pub fn seen_from_command_line(&self, id: OptionId) -> bool {
        self.entry(id).seen == Seen::CommandLine
    }

    /// Marks an option as explicitly assigned. A command-line mark is never
    /// downgraded.
    pub fn mark_seen(&mut self, id: OptionId, seen: Seen) {
        let entry = self.entry_mut(id);
        if entry.seen != Seen::CommandLine {
            entry.seen = seen;
        }
    }

    /// Starts a new configuration layer: marks left by earlier files are
    /// forgotten so the layer can override them, command-line marks are kept.
    pub fn begin_layer(&mut self) {
        for entry in &mut self.entries {
            if entry.seen == Seen::Config {
                entry.seen = Seen::Unseen;
            }
        }
    }

    pub fn set_bool(&mut self, id: OptionId, value: bool) {
        self.entry_mut(id).value = OptionValue::Bool(value);
    }

    pub fn set_int(&mut self, id: OptionId, value: i32) {
        let entry = self.entry_mut(id);
        entry.value = match entry.kind {
            OptionKind::Enum(_) => OptionValue::Enum(value),
            _ => OptionValue::Int(value),
        };
    }

    /// Replaces a string-vector option wholesale.
    pub fn assign_args(&mut self, id: OptionId, argv: &[String]) {
        self.entry_mut(id).value = OptionValue::Args(parse_string_vector(argv));
    }

    /// Coerces `arg` according to the option's kind and stores it.
    ///
    /// `prefix` is prepended to the option name before the name-based rules
    /// are applied: `show-notes` also accepts a notes ref, options whose
    /// name contains `title-overflow` accept a boolean, and a few integers
    /// have their own bounds.
    ///
    /// # Returns
    /// A `Status` whose error, if any, is the diagnostic to report. Lenient
    /// coercions (booleans, steps) store their fallback value even when they
    /// return an error.
    pub fn assign(&mut self, id: OptionId, prefix: &str, arg: &str) -> Status {
        let name = format!("{prefix}{}", self.entry(id).name);

        if name == "show-notes" {
            return self.assign_show_notes(id, arg);
        }

        let kind = self.entry(id).kind;
        let value = match kind {
            OptionKind::Bool => {
                let mut value = false;
                let result = parse_bool(arg).store(&mut value);
                self.set_bool(id, value);
                result?;
                return Ok(Outcome::Applied);
            }
            OptionKind::Step => {
                let mut value = 0.0;
                let result = parse_step(arg).store(&mut value);
                self.entry_mut(id).value = OptionValue::Step(value);
                result?;
                return Ok(Outcome::Applied);
            }
            OptionKind::Enum(map) => OptionValue::Enum(parse_enum(arg, map)),
            OptionKind::Int => OptionValue::Int(parse_int_option(&name, arg)?),
            OptionKind::Str => OptionValue::Str(parse_string(arg, SIZEOF_STR)?),
            OptionKind::Args => OptionValue::Args(vec![arg.to_string()]),
        };

        self.entry_mut(id).value = value;
        Ok(Outcome::Applied)
    }

    fn assign_show_notes(&mut self, id: OptionId, arg: &str) -> Status {
        let coerced = parse_bool(arg);
        if coerced.is_ok() {
            self.set_bool(id, coerced.value);
            return Ok(Outcome::Applied);
        }

        // Anything that is not a boolean names the notes ref to show.
        self.set_bool(id, true);
        let notes_ref = parse_string(arg, SIZEOF_STR - NOTES_EQ_ARG.len())?;
        self.notes_arg = if notes_ref.is_empty() {
            NOTES_ARG.to_string()
        } else {
            format!("{NOTES_EQ_ARG}{notes_ref}")
        };
        Ok(Outcome::Applied)
    }

    /// Applies revision and diff flags given on the command line.
    ///
    /// Recognised flags set their option and mark it as seen from the command
    /// line, so configuration files cannot override them.
    ///
    /// # Returns
    /// The flags that were not recognised, in their original order.
    pub fn update_from_argv(&mut self, argv: &[String]) -> Vec<String> {
        let mut rest = Vec::new();

        for flag in argv {
            if flag.is_empty() {
                rest.push(flag.clone());
            } else if let Some(value) = COMMIT_ORDER_ARG_MAP.lookup(flag) {
                self.set_int(OptionId::CommitOrder, value);
                self.mark_seen(OptionId::CommitOrder, Seen::CommandLine);
            } else if let Some(value) = IGNORE_SPACE_ARG_MAP.lookup(flag) {
                self.set_int(OptionId::IgnoreSpace, value);
                self.mark_seen(OptionId::IgnoreSpace, Seen::CommandLine);
            } else if flag == "--no-notes" {
                self.set_bool(OptionId::ShowNotes, false);
                self.mark_seen(OptionId::ShowNotes, Seen::CommandLine);
            } else if flag.starts_with("--show-notes") || flag.starts_with("--notes") {
                self.set_bool(OptionId::ShowNotes, true);
                self.notes_arg = flag.clone();
                self.mark_seen(OptionId::ShowNotes, Seen::CommandLine);
            } else if let Some(Ok(context)) = flag
                .strip_prefix("-U")
                .map(|value| parse_bounded_int(value, 0, 999_999))
            {
                self.set_int(OptionId::DiffContext, context);
                self.mark_seen(OptionId::DiffContext, Seen::CommandLine);
            } else {
                rest.push(flag.clone());
            }
        }

        rest
    }

    /// The `-U<n>` flag for the configured diff context, or nothing when the
    /// context was left to the default.
    pub fn diff_context_arg(&self) -> String {
        match self.int(OptionId::DiffContext) {
            context if context < 0 => String::new(),
            context => format!("-U{context}"),
        }
    }

    pub fn ignore_space_arg(&self) -> &'static str {
        IGNORE_SPACE_ARG_MAP
            .name_of(self.int(OptionId::IgnoreSpace))
            .unwrap_or("")
    }

    pub fn commit_order_arg(&self) -> &'static str {
        COMMIT_ORDER_ARG_MAP
            .name_of(self.int(OptionId::CommitOrder))
            .unwrap_or("")
    }

    pub fn show_notes_arg(&self) -> &str {
        if self.bool(OptionId::ShowNotes) {
            &self.notes_arg
        } else {
            ""
        }
    }
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an integer option, applying the bounds selected by its name.
fn parse_int_option(name: &str, arg: &str) -> Result<i32, ConfigError> {
    let mut arg = arg;

    if name.contains("title-overflow") {
        let coerced = parse_bool(arg);
        if coerced.is_ok() {
            if !coerced.value {
                return Ok(0);
            }
            arg = "50";
        }
    }

    match name {
        "line-number-interval" | "tab-size" => parse_bounded_int(arg, 1, 1024),
        "id-width" => parse_bounded_int(arg, 0, SIZEOF_REV - 1),
        _ => parse_bounded_int(arg, 0, 1024),
    }
}
