use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::builders::keymaps::format_keys;
use crate::core::engine::ConfigEngine;
use crate::core::enum_map::{A_NORMAL, ATTR_MAP, COLOR_MAP, EnumMap};
use crate::core::git::RepoInfo;
use crate::core::options::{OptionKind, OptionValue};
use crate::core::refs::RefFormat;

/// Which part of the resolved settings to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    All,
    Options,
    Colors,
    Bindings,
}

/// Serialization formats of the `export` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Toml,
    Json,
    Yaml,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub selector: String,
    pub fg: String,
    pub bg: String,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingSnapshot {
    pub keys: String,
    pub action: String,
}

/// The resolved settings in a serializable, name-based form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSnapshot {
    pub options: BTreeMap<String, OptionValue>,
    pub reference_formats: BTreeMap<String, RefFormat>,
    pub repository: RepoInfo,
    pub colors: Vec<ColorSnapshot>,
    pub bindings: BTreeMap<String, Vec<BindingSnapshot>>,
}

fn color_name(color: i32) -> String {
    COLOR_MAP
        .name_of(color)
        .map_or_else(|| format!("color{color}"), str::to_string)
}

fn attribute_names(attr: i32) -> Vec<String> {
    ATTR_MAP
        .entries
        .iter()
        .filter(|entry| entry.value != A_NORMAL && attr & entry.value != 0)
        .map(|entry| entry.name.to_string())
        .collect()
}

/// Shows enum options by name, the way they are written in a `set` command.
fn display_value(map: &EnumMap, value: &OptionValue) -> OptionValue {
    match value {
        OptionValue::Enum(n) => map
            .name_of(*n)
            .map_or_else(|| value.clone(), |name| OptionValue::Str(name.to_string())),
        _ => value.clone(),
    }
}

impl SettingsSnapshot {
    /// Captures the current state of an engine.
    pub fn capture(engine: &ConfigEngine) -> Self {
        let options = engine
            .options
            .iter()
            .map(|entry| {
                let value = match entry.kind {
                    OptionKind::Enum(map) => display_value(map, &entry.value),
                    _ => entry.value.clone(),
                };
                (entry.name.to_string(), value)
            })
            .collect();

        let reference_formats = engine
            .ref_formats
            .iter()
            .map(|(name, format)| (name.to_string(), format.clone()))
            .collect();

        let colors = engine
            .styles
            .rules()
            .iter()
            .map(|rule| ColorSnapshot {
                scope: rule.scope.map(str::to_string),
                selector: rule.selector.to_string(),
                fg: color_name(rule.fg),
                bg: color_name(rule.bg),
                attributes: attribute_names(rule.attr),
            })
            .collect();

        let bindings = engine
            .keymaps
            .iter()
            .filter(|keymap| !keymap.bindings.is_empty())
            .map(|keymap| {
                let bindings = keymap
                    .bindings
                    .iter()
                    .map(|binding| BindingSnapshot {
                        keys: format_keys(&binding.keys),
                        action: binding.action.to_string(),
                    })
                    .collect();
                (keymap.name.to_string(), bindings)
            })
            .collect();

        Self {
            options,
            reference_formats,
            repository: engine.repo.clone(),
            colors,
            bindings,
        }
    }

    /// Serializes the snapshot in the requested format.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => serde_json::to_string_pretty(self).context("Failed to serialize to JSON"),
            ExportFormat::Yaml => serde_yaml::to_string(self).context("Failed to serialize to YAML"),
            ExportFormat::Toml => toml::to_string_pretty(self).context("Failed to serialize to TOML"),
        }
    }
}

/// Renders resolved settings for people to read.
pub trait SettingsReporter {
    fn render(&self, snapshot: &SettingsSnapshot, section: Section) -> String;
}

/// A concrete implementation of `SettingsReporter` producing the
/// configuration-file syntax that would recreate the settings.
///
/// This is the reporter used by the `show` command.
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Constructs a new `ConsoleReporter` instance.
    pub fn new() -> Self {
        Self
    }

    fn format_value(value: &OptionValue) -> String {
        match value {
            OptionValue::Bool(value) => if *value { "yes" } else { "no" }.to_string(),
            OptionValue::Int(value) | OptionValue::Enum(value) => value.to_string(),
            // Percentages are stored shifted down by one.
            OptionValue::Step(value) if *value < 1.0 => format!("{}%", (value * 100.0).round() as i64 + 1),
            OptionValue::Step(value) => value.to_string(),
            OptionValue::Str(value) if value.is_empty() || value.contains(char::is_whitespace) => {
                format!("\"{value}\"")
            }
            OptionValue::Str(value) => value.clone(),
            OptionValue::Args(argv) => argv.join(" "),
        }
    }

    fn render_options(&self, snapshot: &SettingsSnapshot, out: &mut String) {
        for (name, value) in &snapshot.options {
            let _ = writeln!(out, "set {name} = {}", Self::format_value(value));
        }
        if !snapshot.reference_formats.is_empty() {
            let formats: Vec<String> = snapshot
                .reference_formats
                .iter()
                .map(|(name, format)| format!("{}{name}{}", format.start, format.end))
                .collect();
            let _ = writeln!(out, "set reference-format = {}", formats.join(" "));
        }
    }

    fn render_colors(&self, snapshot: &SettingsSnapshot, out: &mut String) {
        for color in &snapshot.colors {
            let selector = match &color.scope {
                Some(scope) => format!("{scope}.{}", color.selector),
                None => color.selector.clone(),
            };
            let mut line = format!("color {selector} {} {}", color.fg, color.bg);
            for attribute in &color.attributes {
                line.push(' ');
                line.push_str(attribute);
            }
            let _ = writeln!(out, "{line}");
        }
    }

    fn render_bindings(&self, snapshot: &SettingsSnapshot, out: &mut String) {
        for (keymap, bindings) in &snapshot.bindings {
            for binding in bindings {
                let _ = writeln!(out, "bind {keymap} {} {}", binding.keys, binding.action);
            }
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsReporter for ConsoleReporter {
    fn render(&self, snapshot: &SettingsSnapshot, section: Section) -> String {
        let mut out = String::new();

        if matches!(section, Section::All | Section::Options) {
            self.render_options(snapshot, &mut out);
        }
        if matches!(section, Section::All | Section::Colors) {
            self.render_colors(snapshot, &mut out);
        }
        if matches!(section, Section::All | Section::Bindings) {
            self.render_bindings(snapshot, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::load_from_str;
    use crate::core::env::MemoryEnvironment;

    fn engine_with(text: &str) -> ConfigEngine {
        let mut engine = ConfigEngine::with_environment(Box::new(MemoryEnvironment::new()));
        let state = load_from_str(&mut engine, "test", text);
        assert!(!state.errors, "{:?}", engine.diagnostics());
        engine
    }

    #[test]
    fn test_snapshot_uses_names() {
        let engine = engine_with(
            "set ignore-space = at-eol\ncolor tree.file color208 default bold underline\nbind main <C-x> quit\n",
        );
        let snapshot = SettingsSnapshot::capture(&engine);

        assert_eq!(
            snapshot.options["ignore-space"],
            OptionValue::Str("at-eol".to_string())
        );
        assert_eq!(
            snapshot.colors,
            vec![ColorSnapshot {
                scope: Some("tree".to_string()),
                selector: "file".to_string(),
                fg: "color208".to_string(),
                bg: "default".to_string(),
                attributes: vec!["bold".to_string(), "underline".to_string()],
            }]
        );
        assert_eq!(snapshot.bindings["main"][0].keys, "<Ctrl-x>");
        assert_eq!(snapshot.bindings["main"][0].action, "quit");
    }

    #[test]
    fn test_console_sections() {
        let engine = engine_with(
            "set tab-size = 4\nset horizontal-scroll = 25%\ncolor cursor white blue\nbind generic Q quit\n",
        );
        let snapshot = SettingsSnapshot::capture(&engine);
        let reporter = ConsoleReporter::new();

        let colors = reporter.render(&snapshot, Section::Colors);
        assert_eq!(colors, "color cursor white blue\n");

        let bindings = reporter.render(&snapshot, Section::Bindings);
        assert_eq!(bindings, "bind generic Q quit\n");

        let options = reporter.render(&snapshot, Section::Options);
        assert!(options.contains("set tab-size = 4\n"));
        assert!(options.contains("set wrap-lines = no\n"));
        assert!(options.contains("set horizontal-scroll = 25%\n"));
    }

    #[test]
    fn test_export_formats() {
        let engine = engine_with("set reference-format = [branch]\ncolor '    Acked-by' yellow default\n");
        let snapshot = SettingsSnapshot::capture(&engine);

        let json = snapshot.export(ExportFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["options"]["tab-size"], 8);
        assert_eq!(parsed["reference_formats"]["branch"]["start"], "[");
        assert_eq!(parsed["colors"][0]["selector"], "'    Acked-by'");

        let yaml = snapshot.export(ExportFormat::Yaml).unwrap();
        assert!(yaml.contains("tab-size: 8"));

        let toml = snapshot.export(ExportFormat::Toml).unwrap();
        assert!(toml.contains("tab-size = 8"));
    }
}
