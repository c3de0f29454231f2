use crate::builders::keymaps::{Action, KeymapRegistry, decode_key_combo, get_request};
use crate::core::enum_map::find_remapped;
use crate::core::status::{ConfigError, Outcome, Status};

/// Actions renamed in later releases.
static RENAMED_REQUESTS: &[(&str, &str)] = &[("view-branch", "view-refs")];

/// Former dedicated toggle actions and the option `:toggle` now flips.
static TOGGLE_REQUESTS: &[(&str, &str)] = &[
    ("diff-context-down", "diff-context"),
    ("diff-context-up", "diff-context"),
    ("toggle-author", "author-display"),
    ("toggle-changes", "show-changes"),
    ("toggle-commit-order", "show-commit-order"),
    ("toggle-date", "date-display"),
    ("toggle-file-filter", "file-filter"),
    ("toggle-file-size", "file-size-display"),
    ("toggle-filename", "filename-display"),
    ("toggle-graphic", "show-graphic"),
    ("toggle-id", "id-display"),
    ("toggle-ignore-space", "show-ignore-space"),
    ("toggle-lineno", "line-number-display"),
    ("toggle-refs", "commit-title-refs"),
    ("toggle-rev-graph", "commit-title-graph"),
    ("toggle-sort-field", "sort-field"),
    ("toggle-sort-order", "sort-order"),
    ("toggle-title-overflow", "commit-title-overflow"),
    ("toggle-untracked-dirs", "status-untracked-dirs"),
    ("toggle-vertical-split", "show-vertical-split"),
];

/// Handles `bind <keymap> <keys> <action...>`.
///
/// The action is resolved as a request name first. Unknown names are looked
/// up in the rename table, then in the toggle table, and are finally taken
/// as a run request. Renamed and toggle actions are still bound, but the
/// returned outcome carries a deprecation notice.
pub fn bind_command(keymaps: &mut KeymapRegistry, argv: &[String]) -> Status {
    if argv.len() < 3 {
        return Err(ConfigError::InvalidBindCommand);
    }

    let keymap = match keymaps.get_keymap(&argv[0]) {
        Some(keymap) => keymap,
        // The branch view became the refs view.
        None if argv[0] == "branch" => keymaps
            .get_keymap("refs")
            .ok_or_else(|| ConfigError::UnknownKeymap(argv[0].clone()))?,
        None => return Err(ConfigError::UnknownKeymap(argv[0].clone())),
    };

    let keys = decode_key_combo(&argv[1])?;
    let name = &argv[2];

    if let Some(request) = get_request(name) {
        keymaps.add_keybinding(keymap, keys, Action::Request(request));
        return Ok(Outcome::Applied);
    }

    if let Some(index) = find_remapped(RENAMED_REQUESTS, name) {
        let (old, new) = RENAMED_REQUESTS[index];
        if let Some(request) = get_request(new) {
            keymaps.add_keybinding(keymap, keys, Action::Request(request));
        }
        return Ok(Outcome::Deprecated(format!("{old} has been renamed to {new}")));
    }

    if let Some(index) = find_remapped(TOGGLE_REQUESTS, name) {
        let (old, option) = TOGGLE_REQUESTS[index];
        let step = old
            .strip_prefix("diff-context-")
            .map(|direction| if direction == "down" { "-1" } else { "+1" });

        let command: Vec<String> = [":toggle", option].into_iter().chain(step).map(str::to_string).collect();

        keymaps.add_run_request(keymap, keys, &command)?;
        return Ok(Outcome::Deprecated(format!(
            "{old} has been replaced by `{}'",
            command.join(" ")
        )));
    }

    keymaps.add_run_request(keymap, keys, &argv[2..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::keymaps::{Key, Request};

    fn bind(keymaps: &mut KeymapRegistry, args: &[&str]) -> Status {
        let argv: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        bind_command(keymaps, &argv)
    }

    fn action(keymaps: &KeymapRegistry, keymap: &str, keys: &str) -> Option<Action> {
        let id = keymaps.get_keymap(keymap)?;
        let keys = decode_key_combo(keys).ok()?;
        keymaps.lookup(id, &keys).cloned()
    }

    #[test]
    fn test_bind_request() {
        let mut keymaps = KeymapRegistry::new();
        assert_eq!(bind(&mut keymaps, &["main", "g", "view-grep"]).unwrap(), Outcome::Applied);
        assert_eq!(
            action(&keymaps, "main", "g"),
            Some(Action::Request(Request::ViewGrep))
        );
    }

    #[test]
    fn test_branch_keymap_falls_back_to_refs() {
        let mut keymaps = KeymapRegistry::new();
        bind(&mut keymaps, &["branch", "C", "view-close"]).unwrap();
        assert_eq!(
            action(&keymaps, "refs", "C"),
            Some(Action::Request(Request::ViewClose))
        );

        let error = bind(&mut keymaps, &["branches", "C", "view-close"]).unwrap_err();
        assert_eq!(error.to_string(), "Unknown key map: branches");
    }

    #[test]
    fn test_renamed_request_is_bound_and_reported() {
        let mut keymaps = KeymapRegistry::new();
        let outcome = bind(&mut keymaps, &["generic", "B", "view-branch"]).unwrap();
        assert_eq!(
            outcome,
            Outcome::Deprecated("view-branch has been renamed to view-refs".to_string())
        );
        assert_eq!(
            action(&keymaps, "generic", "B"),
            Some(Action::Request(Request::ViewRefs))
        );
    }

    #[test]
    fn test_toggle_rewrites() {
        let mut keymaps = KeymapRegistry::new();

        let outcome = bind(&mut keymaps, &["generic", "]", "diff-context-up"]).unwrap();
        assert_eq!(
            outcome,
            Outcome::Deprecated("diff-context-up has been replaced by `:toggle diff-context +1'".to_string())
        );
        let Some(Action::Run { flags, argv }) = action(&keymaps, "generic", "]") else {
            panic!("expected a run request");
        };
        assert!(flags.internal);
        assert_eq!(argv, vec!["toggle", "diff-context", "+1"]);

        let outcome = bind(&mut keymaps, &["main", "I", "toggle-id"]).unwrap();
        assert_eq!(
            outcome,
            Outcome::Deprecated("toggle-id has been replaced by `:toggle id-display'".to_string())
        );

        bind(&mut keymaps, &["main", "L", "toggle-lineno"]).unwrap();
        let Some(Action::Run { argv, .. }) = action(&keymaps, "main", "L") else {
            panic!("expected a run request");
        };
        assert_eq!(argv, vec!["toggle", "line-number-display"]);

        // Names dropped from the table are no longer rewritten.
        let error = bind(&mut keymaps, &["stage", "@", "stage-next"]).unwrap_err();
        assert_eq!(error.to_string(), "Unknown request name: stage-next");
    }

    #[test]
    fn test_unknown_action_becomes_run_request() {
        let mut keymaps = KeymapRegistry::new();
        bind(&mut keymaps, &["status", "<Ctrl-p>", "!git", "push"]).unwrap();
        let Some(Action::Run { flags, argv }) = action(&keymaps, "status", "^p") else {
            panic!("expected a run request");
        };
        assert!(flags.external);
        assert_eq!(argv, vec!["git", "push"]);

        let error = bind(&mut keymaps, &["status", "x", "frobnicate"]).unwrap_err();
        assert_eq!(error.to_string(), "Unknown request name: frobnicate");
    }

    #[test]
    fn test_bad_key_combo() {
        let mut keymaps = KeymapRegistry::new();
        let error = bind(&mut keymaps, &["main", "<Bogus>", "quit"]).unwrap_err();
        assert_eq!(error.to_string(), "Unknown key combo: <Bogus>");
        assert_eq!(action(&keymaps, "main", "q"), None);
        assert!(!keymaps.iter().any(|keymap| keymap.bindings.iter().any(|b| b.keys == [Key::Char('q')])));
    }
}
