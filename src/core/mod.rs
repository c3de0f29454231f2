// This file is the module declaration file for the `core` module.
// It declares the submodules contained within `src/core/` and exposes them
// to the rest of the crate.

// `config` module:
// Reads configuration files line by line and runs the layered load sequence:
// system file or built-in text, user file, then the diff options variable.
pub mod config;

// `engine` module:
// The `ConfigEngine` holding every piece of configuration state, the command
// dispatcher and the collected diagnostics.
pub mod engine;

// `enum_map` module:
// Static name/value tables for colors, attributes and enum options.
pub mod enum_map;

// `env` module:
// The `Environment` trait over process variables and the working directory,
// with an in-memory implementation for tests.
pub mod env;

// `git` module:
// The `GitClient` trait and its libgit2-backed implementation.
pub mod git;

// `options` module:
// The registry of named, typed options and the command-line flag parser.
pub mod options;

pub mod refs;

// `status` module:
// The per-command result type and every error message a command can produce.
pub mod status;

pub mod values;
