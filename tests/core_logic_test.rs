use anyhow::Result;
use gitview_config::builders::importer::GitConfigImporter;
use gitview_config::builders::keymaps::{Action, Request, decode_key_combo};
use gitview_config::core::config::{
    ConfigManager, DIFF_OPTS_ENV, MAX_INCLUDE_DEPTH, SYSTEM_CONFIG, SYSTEM_CONFIG_ENV, USER_CONFIG_ENV,
    load_option_file,
};
use gitview_config::core::engine::{ConfigEngine, Severity};
use gitview_config::core::env::MemoryEnvironment;
use gitview_config::core::git::GitClient;
use gitview_config::core::options::OptionId;
use gitview_config::utils::load_configuration_into;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn engine_with(env: MemoryEnvironment) -> ConfigEngine {
    ConfigEngine::with_environment(Box::new(env))
}

fn lookup(engine: &ConfigEngine, keymap: &str, keys: &str) -> Option<Action> {
    let id = engine.keymaps.get_keymap(keymap)?;
    engine
        .keymaps
        .lookup(id, &decode_key_combo(keys).unwrap())
        .cloned()
}

#[test]
fn test_first_assignment_in_a_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "rc", "set tab-size = 4\nset tab-size = 8\n");

    let mut engine = engine_with(MemoryEnvironment::new());
    let state = load_option_file(&mut engine, &path).unwrap();

    assert!(!state.errors);
    assert_eq!(state.lineno, 2);
    assert_eq!(engine.options.int(OptionId::TabSize), 4);
}

#[test]
fn test_nested_source() {
    let dir = tempfile::tempdir().unwrap();
    let inner = write_config(&dir, "inner", "set id-width = 12\n");
    let outer = write_config(&dir, "outer", &format!("source {inner}\nset tab-size = 2\n"));

    let mut engine = engine_with(MemoryEnvironment::new());
    let state = load_option_file(&mut engine, &outer).unwrap();

    assert!(!state.errors);
    assert_eq!(engine.options.int(OptionId::IdWidth), 12);
    assert_eq!(engine.options.int(OptionId::TabSize), 2);
}

#[test]
fn test_source_of_missing_file_fails_the_line() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing").to_string_lossy().into_owned();
    let outer = write_config(&dir, "outer", &format!("source {missing}\nset tab-size = 2\n"));

    let mut engine = engine_with(MemoryEnvironment::new());
    let state = load_option_file(&mut engine, &outer).unwrap();

    assert!(state.errors);
    assert_eq!(engine.options.int(OptionId::TabSize), 2);

    let diagnostic = &engine.diagnostics()[0];
    assert_eq!(diagnostic.line, 1);
    assert_eq!(diagnostic.message, format!("File does not exist: {missing}"));
}

#[test]
fn test_source_with_home_expansion() {
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, "colors", "color cursor white red\n");
    let outer = write_config(&dir, "outer", "source ~/colors\n");

    let env = MemoryEnvironment::new().with_var("HOME", &dir.path().to_string_lossy());
    let mut engine = engine_with(env);
    let state = load_option_file(&mut engine, &outer).unwrap();

    assert!(!state.errors, "{:?}", engine.diagnostics());
    assert_eq!(engine.styles.rules().len(), 1);
}

#[test]
fn test_self_inclusion_stops_at_the_depth_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop").to_string_lossy().into_owned();
    fs::write(&path, format!("source {path}\n")).unwrap();

    let mut engine = engine_with(MemoryEnvironment::new());
    load_option_file(&mut engine, &path).unwrap();

    let expected = format!("Files are nested more than {MAX_INCLUDE_DEPTH} levels deep");
    let errors: Vec<_> = engine
        .diagnostics()
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, expected);
}

#[test]
fn test_builtin_config_fills_in_for_a_missing_system_file() {
    if Path::new(SYSTEM_CONFIG).exists() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let user = write_config(&dir, "user", "set tab-size = 4\nbind generic Q view-help\n");

    let env = MemoryEnvironment::new().with_var(USER_CONFIG_ENV, &user);
    let mut engine = engine_with(env);
    let manager = ConfigManager::from_environment(engine.env());
    manager.load_options(&mut engine).unwrap();

    assert!(!engine.has_errors(), "{:?}", engine.diagnostics());
    // The user layer overrides values the built-in text already set.
    assert_eq!(engine.options.int(OptionId::TabSize), 4);
    assert_eq!(lookup(&engine, "generic", "Q"), Some(Action::Request(Request::ViewHelp)));
    assert_eq!(lookup(&engine, "main", "q"), Some(Action::Request(Request::ViewClose)));
    assert!(engine.ref_formats.get("branch").is_some());
}

#[test]
fn test_explicit_system_file_replaces_the_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let system = write_config(&dir, "system", "set id-width = 10\n");
    let missing_user = dir.path().join("nope").to_string_lossy().into_owned();

    let env = MemoryEnvironment::new()
        .with_var(SYSTEM_CONFIG_ENV, &system)
        .with_var(USER_CONFIG_ENV, &missing_user);
    let mut engine = engine_with(env);
    let manager = ConfigManager::from_environment(engine.env());
    manager.load_options(&mut engine).unwrap();

    assert_eq!(engine.options.int(OptionId::IdWidth), 10);
    assert_eq!(lookup(&engine, "generic", "Q"), None);

    // A missing file named by an override is reported but not fatal.
    let diagnostic = &engine.diagnostics()[0];
    assert_eq!(diagnostic.line, 0);
    assert_eq!(diagnostic.message, format!("File does not exist: {missing_user}"));
}

#[test]
fn test_missing_explicit_system_file_skips_the_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("system").to_string_lossy().into_owned();
    let empty_user = write_config(&dir, "user", "");

    let env = MemoryEnvironment::new()
        .with_var(SYSTEM_CONFIG_ENV, &missing)
        .with_var(USER_CONFIG_ENV, &empty_user);
    let mut engine = engine_with(env);
    ConfigManager::from_environment(engine.env())
        .load_options(&mut engine)
        .unwrap();

    assert!(engine.has_errors());
    assert_eq!(lookup(&engine, "generic", "Q"), None);
}

#[test]
fn test_diff_opts_environment() {
    let dir = tempfile::tempdir().unwrap();
    let system = write_config(&dir, "system", "");

    let env = MemoryEnvironment::new()
        .with_var(SYSTEM_CONFIG_ENV, &system)
        .with_var(USER_CONFIG_ENV, &system)
        .with_var(DIFF_OPTS_ENV, "--stat -M");
    let mut engine = engine_with(env);
    load_configuration_into(&mut engine, &[], false).unwrap();

    assert_eq!(
        engine.options.args(OptionId::DiffOptions),
        ["--stat".to_string(), "-M".to_string()]
    );
    // Left to the default, the context is negative and produces no flag.
    assert_eq!(engine.options.int(OptionId::DiffContext), -3);
    assert_eq!(engine.options.diff_context_arg(), "");
}

#[test]
fn test_command_line_diff_flags_disable_diff_opts() {
    let dir = tempfile::tempdir().unwrap();
    let system = write_config(&dir, "system", "set diff-context = 7\n");

    let env = MemoryEnvironment::new()
        .with_var(SYSTEM_CONFIG_ENV, &system)
        .with_var(USER_CONFIG_ENV, &system)
        .with_var(DIFF_OPTS_ENV, "--stat");
    let mut engine = engine_with(env);
    let flags = vec!["-U1".to_string(), "--patience".to_string()];
    load_configuration_into(&mut engine, &flags, false).unwrap();

    assert_eq!(engine.options.int(OptionId::DiffContext), 1);
    assert_eq!(engine.options.args(OptionId::DiffOptions), ["--patience".to_string()]);
}

#[test]
fn test_diff_opts_with_too_many_arguments_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let system = write_config(&dir, "system", "");
    let opts = vec!["-x"; 40].join(" ");

    let env = MemoryEnvironment::new()
        .with_var(SYSTEM_CONFIG_ENV, &system)
        .with_var(USER_CONFIG_ENV, &system)
        .with_var(DIFF_OPTS_ENV, &opts);
    let mut engine = engine_with(env);
    let error = load_configuration_into(&mut engine, &[], false).unwrap_err();

    assert_eq!(error.to_string(), format!("{DIFF_OPTS_ENV} contains too many arguments"));
}

struct CannedGit {
    listing: String,
    git_dir: PathBuf,
}

impl GitClient for CannedGit {
    fn list_config(&self) -> Result<String> {
        Ok(self.listing.clone())
    }

    fn head_branch(&self) -> Option<String> {
        Some("main".to_string())
    }

    fn git_dir(&self) -> Option<PathBuf> {
        Some(self.git_dir.clone())
    }
}

#[test]
fn test_work_tree_relocation() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::create_dir(dir.path().join("checkout")).unwrap();

    let git = CannedGit {
        listing: "core.worktree=checkout\n".to_string(),
        git_dir: dir.path().join(".git"),
    };
    let env = MemoryEnvironment::new().with_current_dir(dir.path());
    let mut engine = engine_with(env);

    let importer = GitConfigImporter::new(&git);
    importer.load_repo_info(&mut engine);
    importer.load_git_config(&mut engine).unwrap();

    let work_tree = dir.path().join("checkout").canonicalize().unwrap();
    let git_dir = dir.path().join(".git").canonicalize().unwrap();
    assert_eq!(engine.env().current_dir().unwrap(), work_tree);
    assert_eq!(
        engine.env().var("GIT_WORK_TREE"),
        Some(work_tree.to_string_lossy().into_owned())
    );
    assert_eq!(
        engine.env().var("GIT_DIR"),
        Some(git_dir.to_string_lossy().into_owned())
    );
    assert_eq!(engine.repo.work_tree, Some(work_tree));
}

#[test]
fn test_failed_work_tree_relocation_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();

    let git = CannedGit {
        listing: "core.worktree=does-not-exist\n".to_string(),
        git_dir: dir.path().join(".git"),
    };
    let mut engine = engine_with(MemoryEnvironment::new().with_current_dir(dir.path()));

    let importer = GitConfigImporter::new(&git);
    assert!(importer.load_git_config(&mut engine).is_err());
}
