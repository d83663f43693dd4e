use crate::output::Output;
use color_eyre::Result;
use dialoguer::{Confirm, Input};
use movie_catalog_core::CatalogError;

/// Prompt for a string value with optional default; blank answers are allowed
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string()).show_default(true);
    }

    input_builder
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt until `parse` accepts the answer, reporting each rejection
pub fn prompt_parsed<T>(
    prompt: &str,
    default: Option<&str>,
    output: &Output,
    parse: impl Fn(&str) -> Result<T, CatalogError>,
) -> Result<T> {
    loop {
        let answer = prompt_string(prompt, default)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => output.error(format!("Error: {}", e)),
        }
    }
}

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}
