use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use crate::builders::bindings::bind_command;
use crate::builders::styles::{GIT_COLORS, apply_git_color, color_command};
use crate::builders::tokenizer::argv_from_string;
use crate::core::engine::{ConfigEngine, Severity};
use crate::core::enum_map::enum_equals;
use crate::core::git::GitClient;
use crate::core::options::{OptionId, SIZEOF_REV};
use crate::core::status::{ConfigError, Outcome};
use crate::core::values::{atoi, parse_bounded_int};

/// Prefix of this application's keys in the git configuration.
pub const GIT_NAMESPACE: &str = "gitview.";

/// The verb a `gitview.*` key is re-entered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepoCommand {
    Color,
    Bind,
    Set,
}

/// Maps the git configuration onto the engine.
///
/// Only a fixed set of keys is recognised; everything else in the listing
/// is ignored so unrelated git settings never produce diagnostics.
pub struct GitConfigImporter<'a> {
    git: &'a dyn GitClient,
}

impl<'a> GitConfigImporter<'a> {
    /// Constructs a new `GitConfigImporter` reading through `git`.
    pub fn new(git: &'a dyn GitClient) -> Self {
        Self { git }
    }

    /// Records the repository location and the checked out branch, which the
    /// `branch.<name>.*` keys are matched against.
    pub fn load_repo_info(&self, engine: &mut ConfigEngine) {
        engine.repo.git_dir = self.git.git_dir();
        engine.repo.head = self.git.head_branch().unwrap_or_default();
    }

    /// Reads the git configuration listing and applies every recognised key.
    ///
    /// # Returns
    /// An error if the listing cannot be obtained or a work-tree relocation
    /// fails; both leave the process unable to talk to the repository.
    pub fn load_git_config(&self, engine: &mut ConfigEngine) -> Result<()> {
        let listing = self.git.list_config()?;

        for line in listing.lines() {
            let (name, value) = line.split_once('=').unwrap_or((line, ""));
            self.read_repo_config_option(engine, name.trim(), value.trim())?;
        }

        Ok(())
    }

    fn read_repo_config_option(&self, engine: &mut ConfigEngine, name: &str, value: &str) -> Result<()> {
        match name {
            "i18n.commitencoding" => {
                if engine.repo.encoding.is_empty() {
                    engine.repo.encoding = value.to_string();
                }
            }
            "gui.encoding" => engine.repo.encoding = value.to_string(),
            "core.editor" => engine.repo.editor = value.to_string(),
            "core.worktree" => self.set_work_tree(engine, value)?,
            "core.abbrev" => {
                if let Ok(width) = parse_bounded_int(value, 0, SIZEOF_REV - 1) {
                    engine.options.set_int(OptionId::IdWidth, width);
                }
            }
            "diff.context" => {
                if !engine.options.is_seen(OptionId::DiffContext) {
                    let context = i32::try_from(-atoi(value)).unwrap_or(i32::MIN);
                    engine.options.set_int(OptionId::DiffContext, context);
                }
            }
            _ => self.read_prefixed_option(engine, name, value),
        }
        Ok(())
    }

    fn read_prefixed_option(&self, engine: &mut ConfigEngine, name: &str, value: &str) {
        if let Some(rest) = name.strip_prefix(GIT_NAMESPACE) {
            if let Some(selector) = rest.strip_prefix("color.") {
                set_repo_config_option(engine, selector, value, RepoCommand::Color);
            } else if let Some(keymap) = rest.strip_prefix("bind.") {
                set_repo_config_option(engine, keymap, value, RepoCommand::Bind);
            } else {
                set_repo_config_option(engine, rest, value, RepoCommand::Set);
            }
        } else if let Some(git_name) = name.strip_prefix("color.") {
            set_git_color_option(engine, git_name, value);
        } else if let Some(rest) = name.strip_prefix("branch.") {
            set_remote_branch(engine, rest, value);
        }
    }

    /// Moves into the configured work tree and exports `GIT_WORK_TREE` and
    /// `GIT_DIR` so later git invocations find the repository.
    fn set_work_tree(&self, engine: &mut ConfigEngine, value: &str) -> Result<()> {
        let env = engine.env();
        let cwd = env.current_dir()?;

        let git_dir = engine.repo.git_dir.clone().unwrap_or_else(|| cwd.join(".git"));
        let git_dir = cwd
            .join(git_dir)
            .canonicalize()
            .with_context(|| format!("Failed to get git path {}", cwd.display()))?;

        let work_tree = cwd
            .join(Path::new(value))
            .canonicalize()
            .with_context(|| format!("Failed to chdir({value})"))?;

        env.set_current_dir(&work_tree)?;
        env.set_var("GIT_WORK_TREE", &work_tree.to_string_lossy())?;
        env.set_var("GIT_DIR", &git_dir.to_string_lossy())?;
        debug!("Relocated to work tree {}", work_tree.display());

        engine.repo.git_dir = Some(git_dir);
        engine.repo.work_tree = Some(work_tree);
        Ok(())
    }
}

/// Re-enters the dispatcher for a `gitview.*` key. Failures and deprecation
/// notices are warned and do not stop the import.
fn set_repo_config_option(engine: &mut ConfigEngine, name: &str, value: &str, command: RepoCommand) {
    let status = build_argv(name, value, command).and_then(|argv| match command {
        RepoCommand::Color => color_command(&mut engine.styles, &engine.keymaps, &argv),
        RepoCommand::Bind => bind_command(&mut engine.keymaps, &argv),
        RepoCommand::Set => engine.set_option("set", &argv),
    });

    let origin = format!("Option '{GIT_NAMESPACE}{name}'");
    match status {
        Ok(Outcome::Applied) => {}
        Ok(Outcome::Deprecated(message)) => engine.report(&origin, 0, Severity::Deprecation, message),
        Err(error) => engine.report(&origin, 0, Severity::Error, error.to_string()),
    }
}

fn build_argv(name: &str, value: &str, command: RepoCommand) -> Result<Vec<String>, ConfigError> {
    let mut argv = vec![name.to_string()];
    if command == RepoCommand::Set {
        argv.push("=".to_string());
    }

    let values = argv_from_string(value).ok_or_else(|| ConfigError::TooManyArguments(name.to_string()))?;
    argv.extend(values);
    Ok(argv)
}

fn set_git_color_option(engine: &mut ConfigEngine, git_name: &str, value: &str) {
    if !engine.options.bool(OptionId::ReadGitColors) {
        return;
    }

    for (_, target) in GIT_COLORS.iter().filter(|(key, _)| enum_equals(key, git_name)) {
        if !apply_git_color(&mut engine.styles, &engine.keymaps, target, value) {
            warn!("Ignoring color.{git_name} = {value}");
        }
    }
}

/// Tracks `branch.<head>.remote` and `branch.<head>.merge` for the checked
/// out branch as `remote/branch`.
fn set_remote_branch(engine: &mut ConfigEngine, rest: &str, value: &str) {
    let repo = &mut engine.repo;
    if repo.head.is_empty() {
        return;
    }
    let Some(key) = rest.strip_prefix(repo.head.as_str()) else {
        return;
    };

    match key {
        ".remote" => repo.remote = value.to_string(),
        ".merge" if !repo.remote.is_empty() => {
            let branch = value.strip_prefix("refs/heads/").unwrap_or(value);
            repo.remote = format!("{}/{branch}", repo.remote);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::keymaps::{Action, Request, decode_key_combo};
    use crate::builders::styles::Selector;
    use crate::core::env::MemoryEnvironment;
    use std::path::PathBuf;

    struct CannedGit {
        listing: &'static str,
        head: Option<&'static str>,
    }

    impl GitClient for CannedGit {
        fn list_config(&self) -> Result<String> {
            Ok(self.listing.to_string())
        }

        fn head_branch(&self) -> Option<String> {
            self.head.map(str::to_string)
        }

        fn git_dir(&self) -> Option<PathBuf> {
            Some(PathBuf::from("/repo/.git"))
        }
    }

    fn import(listing: &'static str) -> ConfigEngine {
        let mut engine = ConfigEngine::with_environment(Box::new(MemoryEnvironment::new()));
        let git = CannedGit {
            listing,
            head: Some("main"),
        };
        let importer = GitConfigImporter::new(&git);
        importer.load_repo_info(&mut engine);
        importer.load_git_config(&mut engine).unwrap();
        engine
    }

    #[test]
    fn test_core_keys() {
        let engine = import(
            "core.editor=vim -c\ncore.abbrev=12\ni18n.commitencoding=latin1\nuser.name=Ada\n",
        );
        assert_eq!(engine.repo.editor, "vim -c");
        assert_eq!(engine.repo.encoding, "latin1");
        assert_eq!(engine.options.int(OptionId::IdWidth), 12);
        assert_eq!(engine.repo.git_dir, Some(PathBuf::from("/repo/.git")));
        assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn test_gui_encoding_wins() {
        let engine = import("gui.encoding=utf-8\ni18n.commitencoding=latin1\n");
        assert_eq!(engine.repo.encoding, "utf-8");
    }

    #[test]
    fn test_out_of_range_abbrev_is_ignored() {
        let engine = import("core.abbrev=64\n");
        assert_eq!(engine.options.int(OptionId::IdWidth), 7);
    }

    #[test]
    fn test_namespace_keys_reenter_the_dispatcher() {
        let engine = import(
            "gitview.tab-size=4\ngitview.color.cursor=white red bold\ngitview.bind.main=G view-grep\n",
        );
        assert_eq!(engine.options.int(OptionId::TabSize), 4);
        assert!(
            engine
                .styles
                .get(None, &Selector::Area("cursor".to_string()))
                .is_some()
        );

        let main = engine.keymaps.get_keymap("main").unwrap();
        let keys = decode_key_combo("G").unwrap();
        assert_eq!(
            engine.keymaps.lookup(main, &keys),
            Some(&Action::Request(Request::ViewGrep))
        );
    }

    #[test]
    fn test_namespace_failures_are_reported() {
        let engine = import("gitview.no-such-option=1\n");
        assert_eq!(
            engine.diagnostics()[0].to_string(),
            "Option 'gitview.no-such-option': Unknown option name: no-such-option"
        );
    }

    #[test]
    fn test_namespace_deprecations_are_reported() {
        let engine = import("gitview.color.acked=green default\ngitview.bind.main=B view-branch\n");

        assert!(
            engine
                .styles
                .get(None, &Selector::Line("    Acked-by".to_string()))
                .is_some()
        );
        let main = engine.keymaps.get_keymap("main").unwrap();
        assert_eq!(
            engine.keymaps.lookup(main, &decode_key_combo("B").unwrap()),
            Some(&Action::Request(Request::ViewRefs))
        );

        let messages: Vec<String> = engine.diagnostics().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Option 'gitview.acked': acked has been replaced by '    Acked-by'",
                "Option 'gitview.main': view-branch has been renamed to view-refs",
            ]
        );
        assert!(!engine.has_errors());
    }

    #[test]
    fn test_git_colors() {
        let engine = import("color.diff.meta=bold yellow\ncolor.status.added=green\n");
        for area in ["diff-header", "diff-index", "diff-oldmode", "diff-newmode"] {
            let rule = engine
                .styles
                .get(None, &Selector::Area(area.to_string()))
                .unwrap();
            assert_eq!(rule.fg, 3, "{area}");
        }
        assert!(
            engine
                .styles
                .get(None, &Selector::Area("stat-staged".to_string()))
                .is_some()
        );
    }

    #[test]
    fn test_git_colors_can_be_disabled() {
        let engine = import("gitview.read-git-colors=no\ncolor.diff.new=green\n");
        assert!(engine.styles.rules().is_empty());
    }

    #[test]
    fn test_remote_branch_of_head() {
        let engine = import(
            "branch.dev.remote=fork\nbranch.main.remote=origin\nbranch.main.merge=refs/heads/trunk\n",
        );
        assert_eq!(engine.repo.remote, "origin/trunk");
    }

    #[test]
    fn test_diff_context_is_negated_unless_seen() {
        let engine = import("diff.context=5\n");
        assert_eq!(engine.options.int(OptionId::DiffContext), -5);

        let engine = import("gitview.diff-context=2\ndiff.context=5\n");
        assert_eq!(engine.options.int(OptionId::DiffContext), 2);
    }
}
