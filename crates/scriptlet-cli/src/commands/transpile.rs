use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use scriptlet_core::scanner::Scanner;

use crate::output;
use crate::WrapperArgs;

/// Transpile one template.
///
/// The script goes to `output_path` if given, otherwise to stdout exactly as
/// produced (no trailing newline is added). With a timeout the template is read
/// into memory and scanned on the blocking pool; without one it is streamed.
pub async fn run(
    config_path: &Path,
    input: &Path,
    wrappers: &WrapperArgs,
    output_path: Option<&Path>,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let delimiters = super::resolve_delimiters(config_path, input, wrappers)?;
    let scanner = Scanner::new(delimiters);
    let mut reader = super::open_input(input)?;

    tracing::info!("transpiling {}", input.display());
    let script = match timeout_ms {
        Some(ms) => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            scanner
                .transpile_with_timeout(bytes, Duration::from_millis(ms))
                .await?
        }
        None => scanner.transpile(reader)?,
    };

    match output_path {
        Some(path) => {
            std::fs::write(path, &script)?;
            output::print_success(&format!("Transpiled {}", input.display()));
            output::print_key_value("Output", &path.display().to_string());
            output::print_key_value("Script size", &format!("{} bytes", script.len()));
        }
        None => write_script(&mut std::io::stdout().lock(), &script)?,
    }

    Ok(())
}

fn write_script(out: &mut impl Write, script: &str) -> Result<()> {
    out.write_all(script.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptlet_core::preset::Preset;

    const TEMPLATE: &str = "Hello <%= name %>!\n<% if (x) { %>\"yes\"<% } %>";

    fn expected(template: &str) -> String {
        Scanner::new(Preset::default().delimiters)
            .transpile_str(template)
            .unwrap()
    }

    #[tokio::test]
    async fn test_transpile_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.html");
        let out = dir.path().join("page.js");
        std::fs::write(&input, TEMPLATE).unwrap();

        run(
            &dir.path().join("scriptlet.config.json"),
            &input,
            &WrapperArgs::default(),
            Some(&out),
            None,
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), expected(TEMPLATE));
    }

    #[tokio::test]
    async fn test_transpile_with_timeout_matches_streaming() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.ejs");
        let out = dir.path().join("page.js");
        std::fs::write(&input, TEMPLATE).unwrap();

        run(
            &dir.path().join("scriptlet.config.json"),
            &input,
            &WrapperArgs::default(),
            Some(&out),
            Some(5_000),
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), expected(TEMPLATE));
    }

    #[tokio::test]
    async fn test_malformed_template_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.ejs");
        let out = dir.path().join("broken.js");
        std::fs::write(&input, "a <% never closed").unwrap();

        let err = run(
            &dir.path().join("scriptlet.config.json"),
            &input,
            &WrapperArgs::default(),
            Some(&out),
            None,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("unterminated code directive"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            &dir.path().join("scriptlet.config.json"),
            &dir.path().join("absent.ejs"),
            &WrapperArgs::default(),
            None,
            None,
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_script_written_without_trailing_newline() {
        let script = expected("line\n");
        let mut buf = Vec::new();
        write_script(&mut buf, &script).unwrap();
        assert_eq!(buf, script.as_bytes());
        assert!(buf.ends_with(Preset::default().delimiters.output_end.as_bytes()));
    }
}
