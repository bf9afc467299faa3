//! Named delimiter presets for known target script languages.
//!
//! A preset bundles a [`DelimiterConfig`] with metadata describing the templates it
//! is meant for (language, file extensions, MIME types), so a caller can pick the
//! right wrappers by name or from a template's file extension.

use serde::Serialize;

use crate::delimiters::DelimiterConfig;
use crate::error::{Result, ScriptletError};

/// A named delimiter configuration with engine metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub name: &'static str,
    /// Short human-readable summary for listings.
    pub description: &'static str,
    /// Language the transpiled script is written in.
    pub language: &'static str,
    /// Template file extensions (without the dot) handled by this preset.
    pub extensions: &'static [&'static str],
    pub mime_types: &'static [&'static str],
    pub delimiters: DelimiterConfig,
}

impl Preset {
    pub const DEFAULT_NAME: &'static str = "embedded-javascript";

    /// Writes through the script context's writer, as embedded JavaScript
    /// (`.ejs`) engines expect.
    pub fn embedded_javascript() -> Self {
        Self {
            name: "embedded-javascript",
            description: "Embedded JavaScript (.ejs) writing to context.getWriter()",
            language: "EmbeddedECMAScript",
            extensions: &["ejs"],
            mime_types: &["application/embeddedjavascript", "text/embeddedjavascript"],
            delimiters: DelimiterConfig::new(
                "context.getWriter().write(\"",
                "\");\n",
                "context.getWriter().write(",
                ");\n",
            ),
        }
    }

    /// Plain `print(...)` statements.
    pub fn print() -> Self {
        Self {
            name: "print",
            description: "print(...) statements, one per line",
            language: "ECMAScript",
            extensions: &[],
            mime_types: &[],
            delimiters: DelimiterConfig::new("print(\"", "\");\n", "print(", ");\n"),
        }
    }

    /// Visible marker tags, handy for inspecting how a template is split.
    pub fn markers() -> Self {
        Self {
            name: "markers",
            description: "Visible <emit-*> markers for inspecting statement boundaries",
            language: "none",
            extensions: &[],
            mime_types: &[],
            delimiters: DelimiterConfig::new(
                "<emit-open>",
                "<emit-close>\n",
                "<emit-expr-open>",
                "<emit-expr-close>\n",
            ),
        }
    }

    /// Every built-in preset, default first.
    pub fn all() -> Vec<Self> {
        vec![Self::embedded_javascript(), Self::print(), Self::markers()]
    }

    /// Resolve a preset by name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "embedded-javascript" => Ok(Self::embedded_javascript()),
            "print" => Ok(Self::print()),
            "markers" => Ok(Self::markers()),
            _ => Err(ScriptletError::UnknownPreset(name.to_string())),
        }
    }

    /// Find the preset that claims a file extension (case-insensitive, no dot).
    pub fn for_extension(ext: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|p| p.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::embedded_javascript()
    }
}
