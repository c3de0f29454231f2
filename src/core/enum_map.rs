//! Static tables between symbolic names and small integers.
//!
//! Names are matched case-insensitively and with `-` and `_` treated as the
//! same character, so `author-date`, `AUTHOR_DATE` and `Author-Date` all
//! resolve to the same entry. Lengths must match exactly.

/// One symbolic name and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMapEntry {
    pub name: &'static str,
    pub value: i32,
}

/// An immutable, named association list.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumMap {
    pub name: &'static str,
    pub entries: &'static [EnumMapEntry],
}

const fn entry(name: &'static str, value: i32) -> EnumMapEntry {
    EnumMapEntry { name, value }
}

fn fold(c: u8) -> u8 {
    if c == b'_' { b'-' } else { c.to_ascii_lowercase() }
}

/// Compares two names the way every table lookup in this crate does.
pub fn enum_equals(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).all(|(x, y)| fold(x) == fold(y))
}

/// Returns the display form of a name: lower case with dashes.
pub fn enum_name(name: &str) -> String {
    name.bytes().map(|c| fold(c) as char).collect()
}

/// Finds `arg` in the first column of a two-column alias table.
pub fn find_remapped(table: &[(&'static str, &'static str)], arg: &str) -> Option<usize> {
    table.iter().position(|(name, _)| enum_equals(arg, name))
}

impl EnumMap {
    pub fn lookup(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|entry| enum_equals(name, entry.name))
            .map(|entry| entry.value)
    }

    pub fn name_of(&self, value: i32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| entry.name)
    }
}

pub const COLOR_DEFAULT: i32 = -1;

pub static COLOR_MAP: EnumMap = EnumMap {
    name: "color",
    entries: &[
        entry("default", COLOR_DEFAULT),
        entry("black", 0),
        entry("blue", 4),
        entry("cyan", 6),
        entry("green", 2),
        entry("magenta", 5),
        entry("red", 1),
        entry("white", 7),
        entry("yellow", 3),
    ],
};

// Attribute bits follow the curses layout so a renderer can OR them directly.
pub const A_NORMAL: i32 = 0;
pub const A_STANDOUT: i32 = 1 << 16;
pub const A_UNDERLINE: i32 = 1 << 17;
pub const A_REVERSE: i32 = 1 << 18;
pub const A_BLINK: i32 = 1 << 19;
pub const A_DIM: i32 = 1 << 20;
pub const A_BOLD: i32 = 1 << 21;
pub const A_ITALIC: i32 = 1 << 23;

pub static ATTR_MAP: EnumMap = EnumMap {
    name: "attribute",
    entries: &[
        entry("normal", A_NORMAL),
        entry("blink", A_BLINK),
        entry("bold", A_BOLD),
        entry("dim", A_DIM),
        entry("italic", A_ITALIC),
        entry("reverse", A_REVERSE),
        entry("standout", A_STANDOUT),
        entry("underline", A_UNDERLINE),
    ],
};

pub static COMMIT_ORDER_MAP: EnumMap = EnumMap {
    name: "commit-order",
    entries: &[
        entry("default", 0),
        entry("topo", 1),
        entry("date", 2),
        entry("author-date", 3),
        entry("reverse", 4),
    ],
};

/// Revision flags equivalent to each `commit-order` value.
pub static COMMIT_ORDER_ARG_MAP: EnumMap = EnumMap {
    name: "commit-order-arg",
    entries: &[
        entry("", 0),
        entry("--topo-order", 1),
        entry("--date-order", 2),
        entry("--author-date-order", 3),
        entry("--reverse", 4),
    ],
};

pub static IGNORE_SPACE_MAP: EnumMap = EnumMap {
    name: "ignore-space",
    entries: &[
        entry("no", 0),
        entry("all", 1),
        entry("some", 2),
        entry("at-eol", 3),
    ],
};

/// Diff flags equivalent to each `ignore-space` value.
pub static IGNORE_SPACE_ARG_MAP: EnumMap = EnumMap {
    name: "ignore-space-arg",
    entries: &[
        entry("", 0),
        entry("--ignore-all-space", 1),
        entry("--ignore-space-change", 2),
        entry("--ignore-space-at-eol", 3),
    ],
};

pub static IGNORE_CASE_MAP: EnumMap = EnumMap {
    name: "ignore-case",
    entries: &[entry("no", 0), entry("yes", 1), entry("smart-case", 2)],
};

pub static LINE_GRAPHICS_MAP: EnumMap = EnumMap {
    name: "line-graphics",
    entries: &[entry("ascii", 0), entry("default", 1), entry("utf-8", 2)],
};

pub static REFRESH_MODE_MAP: EnumMap = EnumMap {
    name: "refresh-mode",
    entries: &[
        entry("manual", 0),
        entry("auto", 1),
        entry("after-command", 2),
        entry("periodic", 3),
    ],
};

pub static VERTICAL_SPLIT_MAP: EnumMap = EnumMap {
    name: "vertical-split",
    entries: &[entry("horizontal", 0), entry("vertical", 1), entry("auto", 2)],
};

pub static REFERENCE_TYPE_MAP: EnumMap = EnumMap {
    name: "reference-type",
    entries: &[
        entry("head", 0),
        entry("tag", 1),
        entry("local-tag", 2),
        entry("remote", 3),
        entry("tracked-remote", 4),
        entry("replace", 5),
        entry("branch", 6),
        entry("stash", 7),
        entry("note", 8),
        entry("other", 9),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_separator() {
        assert_eq!(COMMIT_ORDER_MAP.lookup("author-date"), Some(3));
        assert_eq!(COMMIT_ORDER_MAP.lookup("AUTHOR_DATE"), Some(3));
        assert_eq!(COLOR_MAP.lookup("Red"), Some(1));
    }

    #[test]
    fn test_lookup_requires_exact_length() {
        assert_eq!(COLOR_MAP.lookup("re"), None);
        assert_eq!(COLOR_MAP.lookup("redd"), None);
        assert_eq!(ATTR_MAP.lookup("bolder"), None);
    }

    #[test]
    fn test_names_are_unique_within_a_map() {
        for map in [&COLOR_MAP, &ATTR_MAP, &COMMIT_ORDER_MAP, &IGNORE_SPACE_MAP, &REFERENCE_TYPE_MAP] {
            for (i, a) in map.entries.iter().enumerate() {
                for b in &map.entries[i + 1..] {
                    assert!(!enum_equals(a.name, b.name), "{} repeats {}", map.name, a.name);
                }
            }
        }
    }

    #[test]
    fn test_find_remapped() {
        let table = [("view-branch", "view-refs")];
        assert_eq!(find_remapped(&table, "VIEW_BRANCH"), Some(0));
        assert_eq!(find_remapped(&table, "view-bran"), None);
    }
}
