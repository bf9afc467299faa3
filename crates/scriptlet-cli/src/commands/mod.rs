//! CLI command implementations for scriptlet.
//!
//! Each module corresponds to a subcommand (`scriptlet <command>`). Helpers shared
//! by the transpiling commands live here.

pub mod check;
pub mod init;
pub mod presets;
pub mod transpile;

use std::io::Read;
use std::path::Path;

use anyhow::Result;

use scriptlet_core::config::{TranspileConfig, CONFIG_FILE};
use scriptlet_core::delimiters::DelimiterConfig;
use scriptlet_core::error::ScriptletError;
use scriptlet_core::preset::Preset;

use crate::WrapperArgs;

/// Pick the delimiters for `input`: per-field flags over `--preset` over the
/// config file over the file extension over the default preset.
pub fn resolve_delimiters(
    config_path: &Path,
    input: &Path,
    wrappers: &WrapperArgs,
) -> Result<DelimiterConfig> {
    let base = if let Some(choice) = &wrappers.preset {
        Preset::from_name(choice.as_str())?.delimiters
    } else if config_path.exists() {
        tracing::debug!("using config {}", config_path.display());
        TranspileConfig::load(config_path)?.resolve()?
    } else {
        // Only the implicit default path may be absent without notice.
        if config_path != Path::new(CONFIG_FILE) {
            tracing::warn!(
                "config file {} not found, using built-in defaults",
                config_path.display()
            );
        }
        preset_for(input)
    };

    Ok(base.with_overrides(
        wrappers.output_start.as_deref().map(unescape),
        wrappers.output_end.as_deref().map(unescape),
        wrappers.expr_start.as_deref().map(unescape),
        wrappers.expr_end.as_deref().map(unescape),
    ))
}

/// Preset claimed by the input's file extension, or the default preset.
fn preset_for(input: &Path) -> DelimiterConfig {
    match input
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Preset::for_extension)
    {
        Some(preset) => {
            tracing::debug!("using preset {} for {}", preset.name, input.display());
            preset.delimiters
        }
        None => Preset::default().delimiters,
    }
}

/// Open a template for reading; `-` means stdin.
pub fn open_input(path: &Path) -> Result<Box<dyn Read + Send>> {
    if path == Path::new("-") {
        return Ok(Box::new(std::io::stdin()));
    }
    if !path.exists() {
        return Err(ScriptletError::InputNotFound(path.to_path_buf()).into());
    }
    Ok(Box::new(std::fs::File::open(path)?))
}

/// Interpret backslash escapes in a wrapper given on the command line.
///
/// Unknown escapes are kept as written.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PresetChoice;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"");\n"#), "\");\n");
        assert_eq!(unescape(r"a\tb\\c"), "a\tb\\c");
        assert_eq!(unescape(r"\x"), r"\x");
        assert_eq!(unescape("trailing\\"), "trailing\\");
        assert_eq!(unescape(""), "");
    }

    #[test]
    fn test_resolve_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("scriptlet.config.json");
        let d = resolve_delimiters(&config, Path::new("page.html"), &WrapperArgs::default())
            .unwrap();
        assert_eq!(d, Preset::default().delimiters);
    }

    #[test]
    fn test_resolve_missing_explicit_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("custom.json");
        let ejs = resolve_delimiters(&config, Path::new("t.ejs"), &WrapperArgs::default())
            .unwrap();
        assert_eq!(ejs, Preset::embedded_javascript().delimiters);

        let args = WrapperArgs {
            preset: Some(PresetChoice::Markers),
            ..Default::default()
        };
        let flagged = resolve_delimiters(&config, Path::new("t.ejs"), &args).unwrap();
        assert_eq!(flagged, Preset::markers().delimiters);
    }

    #[test]
    fn test_resolve_preset_flag_beats_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("scriptlet.config.json");
        TranspileConfig {
            preset: Some("markers".into()),
            delimiters: None,
        }
        .save(&config)
        .unwrap();

        let from_config =
            resolve_delimiters(&config, Path::new("t.ejs"), &WrapperArgs::default()).unwrap();
        assert_eq!(from_config, Preset::markers().delimiters);

        let args = WrapperArgs {
            preset: Some(PresetChoice::Print),
            ..Default::default()
        };
        let from_flag = resolve_delimiters(&config, Path::new("t.ejs"), &args).unwrap();
        assert_eq!(from_flag, Preset::print().delimiters);
    }

    #[test]
    fn test_resolve_field_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("missing.json");
        let args = WrapperArgs {
            preset: Some(PresetChoice::Print),
            output_end: Some(r#"");\n"#.into()),
            expr_start: Some("echo(".into()),
            ..Default::default()
        };
        let d = resolve_delimiters(&config, Path::new("-"), &args).unwrap();
        assert_eq!(d, DelimiterConfig::new("print(\"", "\");\n", "echo(", ");\n"));
    }

    #[test]
    fn test_open_missing_input() {
        let err = open_input(Path::new("/tmp/no_such_scriptlet_template.ejs")).err().unwrap();
        assert!(err.to_string().contains("input file not found"));
    }
}
