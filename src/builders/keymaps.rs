use serde::Serialize;
use std::fmt;

use crate::core::enum_map::enum_equals;
use crate::core::status::{ConfigError, Outcome, Status};

/// Maximum number of keys in one key combo.
pub const MAX_KEYS: usize = 16;

/// Keys that have no printable character of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Escape,
    Tab,
    Backspace,
    Space,
    Up,
    Down,
    Left,
    Right,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// One decoded key of a key combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Named(NamedKey),
}

static KEY_NAMES: &[(&str, Key)] = &[
    ("Enter", Key::Named(NamedKey::Enter)),
    ("Return", Key::Named(NamedKey::Enter)),
    ("Esc", Key::Named(NamedKey::Escape)),
    ("Escape", Key::Named(NamedKey::Escape)),
    ("Tab", Key::Named(NamedKey::Tab)),
    ("Backspace", Key::Named(NamedKey::Backspace)),
    ("Space", Key::Named(NamedKey::Space)),
    ("Up", Key::Named(NamedKey::Up)),
    ("Down", Key::Named(NamedKey::Down)),
    ("Left", Key::Named(NamedKey::Left)),
    ("Right", Key::Named(NamedKey::Right)),
    ("Insert", Key::Named(NamedKey::Insert)),
    ("Ins", Key::Named(NamedKey::Insert)),
    ("Delete", Key::Named(NamedKey::Delete)),
    ("Del", Key::Named(NamedKey::Delete)),
    ("Home", Key::Named(NamedKey::Home)),
    ("End", Key::Named(NamedKey::End)),
    ("PageUp", Key::Named(NamedKey::PageUp)),
    ("PgUp", Key::Named(NamedKey::PageUp)),
    ("PageDown", Key::Named(NamedKey::PageDown)),
    ("PgDown", Key::Named(NamedKey::PageDown)),
    ("LessThan", Key::Char('<')),
    ("Hash", Key::Char('#')),
];

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char('<') => f.write_str("<LessThan>"),
            Key::Char('#') => f.write_str("<Hash>"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Ctrl(c) => write!(f, "<Ctrl-{c}>"),
            Key::Named(NamedKey::F(n)) => write!(f, "<F{n}>"),
            Key::Named(named) => {
                let name = KEY_NAMES
                    .iter()
                    .find(|(_, key)| *key == Key::Named(*named))
                    .map_or("?", |(name, _)| *name);
                write!(f, "<{name}>")
            }
        }
    }
}

fn decode_named(name: &str) -> Option<Key> {
    let lower = name.to_ascii_lowercase();
    let ctrl = lower.strip_prefix("ctrl-").or_else(|| lower.strip_prefix("c-"));

    if let Some(rest) = ctrl {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Key::Ctrl(c)),
            _ => None,
        };
    }

    if let Some(number) = lower.strip_prefix('f')
        && let Ok(n) = number.parse::<u8>()
    {
        return (1..=19).contains(&n).then_some(Key::Named(NamedKey::F(n)));
    }

    KEY_NAMES
        .iter()
        .find(|(key_name, _)| key_name.eq_ignore_ascii_case(name))
        .map(|(_, key)| *key)
}

/// Decodes the key at the start of `cursor` and advances past it.
///
/// Accepts a plain character, `^x` for Ctrl-x, and bracketed names such as
/// `<Enter>`, `<C-x>`, `<Ctrl-x>` or `<F5>`. A `<` that does not open a known
/// name is the literal character.
pub fn decode_key(cursor: &mut &str) -> Option<Key> {
    let spec = *cursor;
    let first = spec.chars().next()?;

    if first == '<'
        && let Some(end) = spec.find('>')
        && end > 1
    {
        let key = decode_named(&spec[1..end])?;
        *cursor = &spec[end + 1..];
        return Some(key);
    }

    if first == '^' {
        let mut chars = spec[1..].chars();
        if let Some(c) = chars.next() {
            *cursor = chars.as_str();
            return Some(Key::Ctrl(c.to_ascii_lowercase()));
        }
    }

    *cursor = &spec[first.len_utf8()..];
    Some(match first {
        ' ' => Key::Named(NamedKey::Space),
        '\t' => Key::Named(NamedKey::Tab),
        c => Key::Char(c),
    })
}

/// Decodes a whole key combo of at most [`MAX_KEYS`] keys.
pub fn decode_key_combo(spec: &str) -> Result<Vec<Key>, ConfigError> {
    let mut cursor = spec;
    let mut keys = Vec::new();

    while !cursor.is_empty() {
        if keys.len() == MAX_KEYS {
            return Err(ConfigError::TooManyKeys {
                max: MAX_KEYS,
                combo: spec.to_string(),
            });
        }
        let key = decode_key(&mut cursor).ok_or_else(|| ConfigError::UnknownKeyCombo(spec.to_string()))?;
        keys.push(key);
    }

    if keys.is_empty() {
        return Err(ConfigError::UnknownKeyCombo(spec.to_string()));
    }
    Ok(keys)
}

/// Formats a key combo the way it can be written in a `bind` command.
pub fn format_keys(keys: &[Key]) -> String {
    keys.iter().map(Key::to_string).collect()
}

/// Internal actions a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    // View switching
    ViewMain,
    ViewDiff,
    ViewLog,
    ViewReflog,
    ViewTree,
    ViewBlob,
    ViewBlame,
    ViewRefs,
    ViewStatus,
    ViewStage,
    ViewStash,
    ViewGrep,
    ViewPager,
    ViewHelp,
    // View manipulation
    Enter,
    Back,
    Next,
    Previous,
    Parent,
    ViewNext,
    Refresh,
    Maximize,
    ViewClose,
    ViewCloseNoQuit,
    Quit,
    // View specific
    StatusUpdate,
    StatusRevert,
    StatusMerge,
    StageUpdateLine,
    StageSplitChunk,
    // Cursor navigation
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveHalfPageUp,
    MoveHalfPageDown,
    MoveFirstLine,
    MoveLastLine,
    // Scrolling
    ScrollLineUp,
    ScrollLineDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollFirstCol,
    ScrollLeft,
    ScrollRight,
    // Searching
    Search,
    SearchBack,
    FindNext,
    FindPrev,
    // Misc
    Edit,
    Options,
    Prompt,
    ScreenRedraw,
    StopLoading,
    ShowVersion,
    None,
}

static REQUEST_NAMES: &[(Request, &str)] = &[
    (Request::ViewMain, "view-main"),
    (Request::ViewDiff, "view-diff"),
    (Request::ViewLog, "view-log"),
    (Request::ViewReflog, "view-reflog"),
    (Request::ViewTree, "view-tree"),
    (Request::ViewBlob, "view-blob"),
    (Request::ViewBlame, "view-blame"),
    (Request::ViewRefs, "view-refs"),
    (Request::ViewStatus, "view-status"),
    (Request::ViewStage, "view-stage"),
    (Request::ViewStash, "view-stash"),
    (Request::ViewGrep, "view-grep"),
    (Request::ViewPager, "view-pager"),
    (Request::ViewHelp, "view-help"),
    (Request::Enter, "enter"),
    (Request::Back, "back"),
    (Request::Next, "next"),
    (Request::Previous, "previous"),
    (Request::Parent, "parent"),
    (Request::ViewNext, "view-next"),
    (Request::Refresh, "refresh"),
    (Request::Maximize, "maximize"),
    (Request::ViewClose, "view-close"),
    (Request::ViewCloseNoQuit, "view-close-no-quit"),
    (Request::Quit, "quit"),
    (Request::StatusUpdate, "status-update"),
    (Request::StatusRevert, "status-revert"),
    (Request::StatusMerge, "status-merge"),
    (Request::StageUpdateLine, "stage-update-line"),
    (Request::StageSplitChunk, "stage-split-chunk"),
    (Request::MoveUp, "move-up"),
    (Request::MoveDown, "move-down"),
    (Request::MovePageUp, "move-page-up"),
    (Request::MovePageDown, "move-page-down"),
    (Request::MoveHalfPageUp, "move-half-page-up"),
    (Request::MoveHalfPageDown, "move-half-page-down"),
    (Request::MoveFirstLine, "move-first-line"),
    (Request::MoveLastLine, "move-last-line"),
    (Request::ScrollLineUp, "scroll-line-up"),
    (Request::ScrollLineDown, "scroll-line-down"),
    (Request::ScrollPageUp, "scroll-page-up"),
    (Request::ScrollPageDown, "scroll-page-down"),
    (Request::ScrollFirstCol, "scroll-first-col"),
    (Request::ScrollLeft, "scroll-left"),
    (Request::ScrollRight, "scroll-right"),
    (Request::Search, "search"),
    (Request::SearchBack, "search-back"),
    (Request::FindNext, "find-next"),
    (Request::FindPrev, "find-prev"),
    (Request::Edit, "edit"),
    (Request::Options, "options"),
    (Request::Prompt, "prompt"),
    (Request::ScreenRedraw, "screen-redraw"),
    (Request::StopLoading, "stop-loading"),
    (Request::ShowVersion, "show-version"),
    (Request::None, "none"),
];

impl Request {
    pub fn name(self) -> &'static str {
        REQUEST_NAMES
            .iter()
            .find(|(request, _)| *request == self)
            .map_or("unknown", |(_, name)| *name)
    }
}

/// Resolves a request name, ignoring case and `-`/`_` differences.
pub fn get_request(name: &str) -> Option<Request> {
    REQUEST_NAMES
        .iter()
        .find(|(_, request_name)| enum_equals(name, request_name))
        .map(|(request, _)| *request)
}

/// How a run request is executed, taken from the prefix of its command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunFlags {
    /// `!`: run an external command (the default).
    pub external: bool,
    /// `:`: run an internal prompt command.
    pub internal: bool,
    /// `@`: run without showing output.
    pub silent: bool,
    /// `?`: ask before running.
    pub confirm: bool,
    /// `<`: exit after running.
    pub exit: bool,
}

impl RunFlags {
    /// Splits the flag characters off the first word of a run request.
    ///
    /// # Returns
    /// The flags and the remainder of the word, or `None` if the word does
    /// not start with a flag character.
    pub fn parse(word: &str) -> Option<(Self, &str)> {
        let mut flags = Self::default();
        let rest = word.trim_start_matches(|c| match c {
            '!' => {
                flags.external = true;
                true
            }
            ':' => {
                flags.internal = true;
                true
            }
            '@' => {
                flags.silent = true;
                true
            }
            '?' => {
                flags.confirm = true;
                true
            }
            '<' => {
                flags.exit = true;
                true
            }
            _ => false,
        });

        if rest.len() == word.len() {
            return None;
        }
        if !flags.internal {
            flags.external = true;
        }
        Some((flags, rest))
    }

    /// The flag prefix that reproduces these flags.
    pub fn prefix(&self) -> String {
        let mut prefix = String::new();
        for (set, c) in [
            (self.silent, '@'),
            (self.confirm, '?'),
            (self.exit, '<'),
            (self.internal, ':'),
            (self.external && !self.internal, '!'),
        ] {
            if set {
                prefix.push(c);
            }
        }
        prefix
    }
}

/// What a key combo does when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Request(Request),
    Run { flags: RunFlags, argv: Vec<String> },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Request(request) => f.write_str(request.name()),
            Action::Run { flags, argv } => write!(f, "{}{}", flags.prefix(), argv.join(" ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub keys: Vec<Key>,
    pub action: Action,
}

/// The bindings active in one view, or in every view for `generic`.
#[derive(Debug, Clone)]
pub struct Keymap {
    pub name: &'static str,
    pub bindings: Vec<KeyBinding>,
}

/// Handle to a keymap of a [`KeymapRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeymapId(usize);

static KEYMAP_NAMES: &[&str] = &[
    "generic", "search", "main", "diff", "log", "reflog", "tree", "blob", "blame", "refs", "status",
    "stage", "stash", "grep", "pager", "help",
];

/// All keymaps and their bindings.
#[derive(Debug, Clone)]
pub struct KeymapRegistry {
    keymaps: Vec<Keymap>,
}

impl KeymapRegistry {
    pub fn new() -> Self {
        let keymaps = KEYMAP_NAMES
            .iter()
            .map(|&name| Keymap {
                name,
                bindings: Vec::new(),
            })
            .collect();
        Self { keymaps }
    }

    /// Finds a keymap by name, ignoring case.
    pub fn get_keymap(&self, name: &str) -> Option<KeymapId> {
        self.keymaps
            .iter()
            .position(|keymap| enum_equals(keymap.name, name))
            .map(KeymapId)
    }

    pub fn generic(&self) -> KeymapId {
        KeymapId(0)
    }

    pub fn name(&self, id: KeymapId) -> &'static str {
        self.keymaps[id.0].name
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keymap> {
        self.keymaps.iter()
    }

    /// Binds `keys` in a keymap, replacing an earlier binding of the same keys.
    pub fn add_keybinding(&mut self, id: KeymapId, keys: Vec<Key>, action: Action) {
        let bindings = &mut self.keymaps[id.0].bindings;

        match bindings.iter_mut().find(|binding| binding.keys == keys) {
            Some(binding) => binding.action = action,
            None => bindings.push(KeyBinding { keys, action }),
        }
    }

    /// Binds `keys` to a command line whose first word starts with run flags.
    pub fn add_run_request(&mut self, id: KeymapId, keys: Vec<Key>, argv: &[String]) -> Status {
        let Some(first) = argv.first() else {
            return Err(ConfigError::InvalidBindCommand);
        };
        let (flags, command) = RunFlags::parse(first).ok_or_else(|| ConfigError::UnknownRequest(first.clone()))?;

        let mut run_argv = Vec::with_capacity(argv.len());
        if !command.is_empty() {
            run_argv.push(command.to_string());
        }
        run_argv.extend(argv[1..].iter().cloned());

        if run_argv.is_empty() {
            return Err(ConfigError::UnknownRequest(first.clone()));
        }

        self.add_keybinding(id, keys, Action::Run { flags, argv: run_argv });
        Ok(Outcome::Applied)
    }

    /// Looks up the action bound to `keys`, falling back to the generic keymap.
    pub fn lookup(&self, id: KeymapId, keys: &[Key]) -> Option<&Action> {
        [id, self.generic()].into_iter().find_map(|id| {
            self.keymaps[id.0]
                .bindings
                .iter()
                .find(|binding| binding.keys == keys)
                .map(|binding| &binding.action)
        })
    }
}

impl Default for KeymapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_decode_key_forms() {
        assert_eq!(decode_key_combo("g").unwrap(), vec![Key::Char('g')]);
        assert_eq!(decode_key_combo("^N").unwrap(), vec![Key::Ctrl('n')]);
        assert_eq!(decode_key_combo("<C-x>").unwrap(), vec![Key::Ctrl('x')]);
        assert_eq!(decode_key_combo("<Ctrl-f>").unwrap(), vec![Key::Ctrl('f')]);
        assert_eq!(decode_key_combo("<Enter>").unwrap(), vec![Key::Named(NamedKey::Enter)]);
        assert_eq!(decode_key_combo("<pgdown>").unwrap(), vec![Key::Named(NamedKey::PageDown)]);
        assert_eq!(decode_key_combo("<F19>").unwrap(), vec![Key::Named(NamedKey::F(19))]);
        assert_eq!(decode_key_combo("<").unwrap(), vec![Key::Char('<')]);
    }

    #[test]
    fn test_decode_key_combo_sequences() {
        let keys = decode_key_combo("<Esc>gg").unwrap();
        assert_eq!(
            keys,
            vec![Key::Named(NamedKey::Escape), Key::Char('g'), Key::Char('g')]
        );
        assert_eq!(format_keys(&keys), "<Esc>gg");
        assert_eq!(format_keys(&[Key::Char('<'), Key::Char('#')]), "<LessThan><Hash>");
    }

    #[test]
    fn test_decode_key_combo_errors() {
        assert!(matches!(decode_key_combo(""), Err(ConfigError::UnknownKeyCombo(_))));
        assert!(matches!(decode_key_combo("<F20>"), Err(ConfigError::UnknownKeyCombo(_))));
        assert!(matches!(decode_key_combo("<Nope>"), Err(ConfigError::UnknownKeyCombo(_))));

        let long = "x".repeat(MAX_KEYS + 1);
        assert!(matches!(
            decode_key_combo(&long),
            Err(ConfigError::TooManyKeys { max: MAX_KEYS, .. })
        ));
        assert_eq!(decode_key_combo(&"x".repeat(MAX_KEYS)).unwrap().len(), MAX_KEYS);
    }

    #[test]
    fn test_get_request_ignores_case_and_separator() {
        assert_eq!(get_request("view-grep"), Some(Request::ViewGrep));
        assert_eq!(get_request("VIEW_GREP"), Some(Request::ViewGrep));
        assert_eq!(get_request("view-branch"), None);
        assert_eq!(Request::StageSplitChunk.name(), "stage-split-chunk");
    }

    #[test]
    fn test_run_flags() {
        let (flags, rest) = RunFlags::parse("@?git").unwrap();
        assert!(flags.silent && flags.confirm && flags.external);
        assert!(!flags.internal);
        assert_eq!(rest, "git");

        let (flags, rest) = RunFlags::parse(":toggle").unwrap();
        assert!(flags.internal && !flags.external);
        assert_eq!(rest, "toggle");

        assert!(RunFlags::parse("git").is_none());
    }

    #[test]
    fn test_add_run_request() {
        let mut keymaps = KeymapRegistry::new();
        let main = keymaps.get_keymap("main").unwrap();
        let keys = decode_key_combo("C").unwrap();

        keymaps
            .add_run_request(main, keys.clone(), &argv(&["?git", "cherry-pick", "%(commit)"]))
            .unwrap();

        let action = keymaps.lookup(main, &keys).unwrap();
        assert_eq!(action.to_string(), "?!git cherry-pick %(commit)");

        let error = keymaps.add_run_request(main, keys, &argv(&["git"])).unwrap_err();
        assert_eq!(error.to_string(), "Unknown request name: git");
    }

    #[test]
    fn test_lookup_falls_back_to_generic_and_rebinding_replaces() {
        let mut keymaps = KeymapRegistry::new();
        let generic = keymaps.generic();
        let tree = keymaps.get_keymap("TREE").unwrap();
        let keys = vec![Key::Char('q')];

        keymaps.add_keybinding(generic, keys.clone(), Action::Request(Request::ViewClose));
        assert_eq!(keymaps.lookup(tree, &keys), Some(&Action::Request(Request::ViewClose)));

        keymaps.add_keybinding(generic, keys.clone(), Action::Request(Request::Quit));
        assert_eq!(keymaps.lookup(tree, &keys), Some(&Action::Request(Request::Quit)));
        assert_eq!(keymaps.iter().next().unwrap().bindings.len(), 1);
    }
}
