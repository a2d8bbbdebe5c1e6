use anyhow::{Context, Result};
use geocoding_core::{BoundingBox, Config, Dataset, LngLat};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::str::FromStr;

/// Prompt for the access token and search defaults, then persist them.
pub fn run() -> Result<()> {
    let mut cfg = Config::load()?;

    let token = Password::new("Mapbox access token:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current token")
        .prompt()
        .context("Failed to read access token")?;
    if !token.trim().is_empty() {
        cfg.access_token = Some(token.trim().to_string());
    }

    let datasets: Vec<&str> = Dataset::all().iter().map(Dataset::as_str).collect();
    let start = datasets.iter().position(|d| *d == cfg.dataset()).unwrap_or(0);
    let dataset = Select::new("Default dataset:", datasets)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read dataset")?;
    cfg.default_dataset = Some(dataset.to_string());

    cfg.search_center = prompt_optional::<LngLat>(
        "Search center (lng,lat):",
        cfg.search_center.map(|c| c.to_string()),
    )?;

    cfg.search_bounds = prompt_optional::<BoundingBox>(
        "Search bounds (minLng,minLat,maxLng,maxLat):",
        cfg.search_bounds.map(|b| b.to_string()),
    )?;

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// Empty input clears the value.
fn prompt_optional<T>(message: &str, current: Option<String>) -> Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    let mut prompt = Text::new(message).with_help_message("Leave empty to clear");
    if let Some(current) = current.as_deref() {
        prompt = prompt.with_initial_value(current);
    }

    let input = prompt.prompt().with_context(|| format!("Failed to read '{message}'"))?;
    parse_optional(&input)
}

fn parse_optional<T>(input: &str) -> Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input.parse().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_clears() {
        assert_eq!(parse_optional::<LngLat>("   ").unwrap(), None);
    }

    #[test]
    fn parses_values_and_reports_errors() {
        assert_eq!(parse_optional::<LngLat>("1.5,2").unwrap(), Some(LngLat::new(1.5, 2.0)));
        assert!(parse_optional::<BoundingBox>("1,2").is_err());
    }
}
