use std::path::{Path, PathBuf};

use anyhow::Result;

use scriptlet_core::scanner::Scanner;

use crate::output;
use crate::WrapperArgs;

/// Transpile each template and report which ones are malformed.
///
/// Every file is checked even after a failure; the command fails at the end if
/// any of them did.
pub fn run(config_path: &Path, files: &[PathBuf], wrappers: &WrapperArgs) -> Result<()> {
    output::print_header("scriptlet check");

    let mut failed = 0usize;
    for file in files {
        match check_one(config_path, file, wrappers) {
            Ok(script_len) => {
                output::print_success(&format!("{} ({script_len} bytes)", file.display()));
            }
            Err(e) => {
                failed += 1;
                output::print_error(&format!("{}: {e:#}", file.display()));
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} templates failed to transpile", files.len());
    }
    Ok(())
}

fn check_one(config_path: &Path, file: &Path, wrappers: &WrapperArgs) -> Result<usize> {
    let delimiters = super::resolve_delimiters(config_path, file, wrappers)?;
    let script = Scanner::new(delimiters).transpile(super::open_input(file)?)?;
    Ok(script.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("scriptlet.config.json");
        let good = dir.path().join("good.ejs");
        let bad = dir.path().join("bad.ejs");
        std::fs::write(&good, "Hello <%= name %>\n").unwrap();
        std::fs::write(&bad, "Hello <% if (x) {").unwrap();

        let args = WrapperArgs::default();
        assert!(run(&config, &[good.clone()], &args).is_ok());

        let err = run(&config, &[good, bad], &args).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 templates failed to transpile");
    }
}
