// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules turn configuration text into the typed state
// held by the engine, and turn that state back into text.

// `bindings` module:
// Implements the `bind` command. It resolves the keymap and key combination,
// then the action: a built-in request, a renamed or toggle request that is
// rewritten with a deprecation notice, or a run request.
pub mod bindings;

// `builtin` module:
// The configuration text compiled into the binary. It is loaded in place of
// the system configuration file when that file does not exist.
pub mod builtin;

// `importer` module:
// Reads the output of `git config --list` and maps the recognised keys onto
// the engine: repository details, `gitview.*` commands and git's own colors.
pub mod importer;

// `keymaps` module:
// Key names and combinations, the request table, run requests and the
// per-keymap binding tables with their fallback to the generic keymap.
pub mod keymaps;

// `reporter` module:
// Captures the resolved settings as a serializable snapshot. It defines the
// `SettingsReporter` trait with a `ConsoleReporter` that prints configuration
// syntax, and the structured export formats.
pub mod reporter;

// `styles` module:
// Implements the `color` command and the style registry, including the table
// of obsolete area names and the translation of git color values.
pub mod styles;

// `tokenizer` module:
// Splits configuration lines into a command name and quote-aware arguments
// and removes trailing comments.
pub mod tokenizer;

// `validator` module:
// Checks the column lists of the `*-view` options. It defines the
// `ViewConfigValidator` trait and the `StandardValidator` implementation.
pub mod validator;
