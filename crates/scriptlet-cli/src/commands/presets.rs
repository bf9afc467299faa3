use anyhow::Result;

use scriptlet_core::preset::Preset;

use crate::output;

/// List the built-in presets with their wrapper strings.
pub fn run(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&Preset::all())?);
        return Ok(());
    }

    output::print_header("scriptlet presets");

    for preset in Preset::all() {
        let marker = if preset.name == Preset::DEFAULT_NAME {
            " (default)"
        } else {
            ""
        };
        println!("\n{}{marker}: {}", preset.name, preset.description);
        let d = &preset.delimiters;
        output::print_key_value("output-start", &format!("{:?}", d.output_start));
        output::print_key_value("output-end", &format!("{:?}", d.output_end));
        output::print_key_value("expr-start", &format!("{:?}", d.expr_start));
        output::print_key_value("expr-end", &format!("{:?}", d.expr_end));
        if !preset.extensions.is_empty() {
            output::print_key_value("extensions", &preset.extensions.join(", "));
        }
        if !preset.mime_types.is_empty() {
            output::print_key_value("mime types", &preset.mime_types.join(", "));
        }
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_succeeds() {
        assert!(run(false).is_ok());
        assert!(run(true).is_ok());
    }

    #[test]
    fn test_json_listing_shape() {
        let value = serde_json::to_value(Preset::all()).unwrap();
        let names: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["embedded-javascript", "print", "markers"]);
        assert_eq!(value[0]["extensions"][0], "ejs");
        assert_eq!(value[1]["delimiters"]["expr_start"], "print(");
    }
}
