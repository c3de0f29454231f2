use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::builders::importer::GitConfigImporter;
use crate::builders::reporter::{ConsoleReporter, ExportFormat, Section, SettingsReporter, SettingsSnapshot};
use crate::core::config::{ConfigManager, load_option_file};
use crate::core::engine::ConfigEngine;
use crate::core::git::Git2Client;
use crate::core::options::{OptionId, Seen};

/// Runs the whole load sequence: command-line flags, the system and user
/// files, the diff options override and, unless disabled, the git
/// configuration of the repository around the working directory.
///
/// Flags that are not revision or diff flags become `diff-options`.
pub fn load_configuration(flags: &[String], read_git: bool) -> Result<ConfigEngine> {
    let mut engine = ConfigEngine::new();
    load_configuration_into(&mut engine, flags, read_git)?;
    Ok(engine)
}

/// Same as [`load_configuration`] for an engine built by the caller, e.g.
/// one bound to a different [`crate::core::env::Environment`].
pub fn load_configuration_into(engine: &mut ConfigEngine, flags: &[String], read_git: bool) -> Result<()> {
    let rest = engine.options.update_from_argv(flags);
    if !rest.is_empty() {
        engine.options.assign_args(OptionId::DiffOptions, &rest);
        engine.options.mark_seen(OptionId::DiffOptions, Seen::CommandLine);
    }

    let manager = ConfigManager::from_environment(engine.env());
    debug!(
        "Configuration files: system {}, user {}",
        manager.system_path(),
        manager.user_path()
    );
    manager.load_options(engine)?;

    if read_git {
        let cwd = engine.env().current_dir()?;
        let git = Git2Client::discover(&cwd);
        let importer = GitConfigImporter::new(&git);
        importer.load_repo_info(engine);
        importer
            .load_git_config(engine)
            .context("Failed to import the git configuration")?;
    }

    Ok(())
}

/// Loads a single file into a fresh engine and prints what went wrong.
pub fn check_file(path: &str) -> Result<()> {
    let mut engine = ConfigEngine::new();
    let state = load_option_file(&mut engine, path)?;

    for diagnostic in engine.diagnostics() {
        println!("{diagnostic}");
    }

    if state.errors {
        bail!("Configuration check failed.");
    }
    println!("✓ {path}: {} lines, no errors", state.lineno);
    Ok(())
}

/// Prints the resolved settings as configuration commands.
pub fn show_settings(section: Section, flags: &[String], read_git: bool) -> Result<()> {
    let engine = load_configuration(flags, read_git)?;
    let snapshot = SettingsSnapshot::capture(&engine);
    let reporter = ConsoleReporter::new();
    print!("{}", reporter.render(&snapshot, section));
    Ok(())
}

/// Writes the resolved settings to `path` in a structured format.
pub fn export_settings(path: &Path, format: ExportFormat, flags: &[String], read_git: bool) -> Result<()> {
    let engine = load_configuration(flags, read_git)?;
    let content = SettingsSnapshot::capture(&engine).export(format)?;

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✓ Exported settings to {}", path.display());
    Ok(())
}
