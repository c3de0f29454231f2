use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::enum_map::{REFERENCE_TYPE_MAP, enum_equals};
use crate::core::status::ConfigError;

/// Text drawn around a reference name of one type, e.g. `[` and `]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefFormat {
    pub start: String,
    pub end: String,
}

/// Display formats per reference type, set with `set reference-format = ...`.
#[derive(Debug, Clone, Default)]
pub struct RefFormats {
    formats: BTreeMap<&'static str, RefFormat>,
}

impl RefFormats {
    /// Replaces every format with the ones given in `argv`.
    ///
    /// Each argument embeds exactly one reference type name; whatever comes
    /// before it is the start marker and whatever follows is the end marker.
    pub fn parse(&mut self, argv: &[String]) -> Result<(), ConfigError> {
        self.formats.clear();
        argv.iter().try_for_each(|arg| self.parse_arg(arg))
    }

    fn parse_arg(&mut self, arg: &str) -> Result<(), ConfigError> {
        for (pos, _) in arg.char_indices() {
            let rest = &arg[pos..];

            for entry in REFERENCE_TYPE_MAP.entries {
                let len = entry.name.len();
                if rest.len() < len || !rest.is_char_boundary(len) || !enum_equals(&rest[..len], entry.name) {
                    continue;
                }

                self.formats.insert(
                    entry.name,
                    RefFormat {
                        start: arg[..pos].to_string(),
                        end: rest[len..].to_string(),
                    },
                );
                return Ok(());
            }
        }

        Err(ConfigError::UnknownRefFormat(arg.to_string()))
    }

    pub fn get(&self, ref_type: &str) -> Option<&RefFormat> {
        REFERENCE_TYPE_MAP
            .entries
            .iter()
            .find(|entry| enum_equals(entry.name, ref_type))
            .and_then(|entry| self.formats.get(entry.name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RefFormat)> {
        self.formats.iter().map(|(name, format)| (*name, format))
    }
}
