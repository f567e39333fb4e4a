use colored::Colorize;

use crate::error::Result;
use crate::pagination::PageSize;
use crate::settings::{self, load_settings, save_settings, settings_path, Settings};

pub fn show() -> Result<()> {
    println!("{}", render(&load_settings()));
    Ok(())
}

fn render(settings: &Settings) -> String {
    let path = settings_path();
    let saved = if path.exists() { "" } else { " (not saved yet)" };
    format!(
        "{}{}\n  api_url       {}\n  upstream_url  {}\n  page_size     {}\n\n{}",
        path.display().to_string().bold(),
        saved,
        settings::api_url(None),
        settings::upstream_url(None),
        settings.page_size,
        "api_url and upstream_url include environment overrides.".dimmed()
    )
}

pub fn set(
    api_url: Option<String>,
    upstream_url: Option<String>,
    page_size: Option<u32>,
) -> Result<()> {
    let settings = apply(load_settings(), api_url, upstream_url, page_size)?;
    save_settings(&settings)?;
    println!("Saved {}", settings_path().display());
    Ok(())
}

/// Merge the given values into `settings`. Page sizes are checked against the
/// sizes the viewer offers.
fn apply(
    mut settings: Settings,
    api_url: Option<String>,
    upstream_url: Option<String>,
    page_size: Option<u32>,
) -> Result<Settings> {
    if let Some(url) = api_url {
        settings.api_url = url;
    }
    if let Some(url) = upstream_url {
        settings.upstream_url = url;
    }
    if let Some(rows) = page_size {
        settings.page_size = PageSize::try_from(rows)?.rows();
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_given_fields() {
        let s = apply(Settings::default(), Some("http://api:9000".into()), None, Some(25)).unwrap();
        assert_eq!(s.api_url, "http://api:9000");
        assert_eq!(s.upstream_url, settings::DEFAULT_UPSTREAM_URL);
        assert_eq!(s.page_size, 25);
    }

    #[test]
    fn test_apply_rejects_unknown_page_size() {
        let err = apply(Settings::default(), None, None, Some(30)).unwrap_err();
        assert!(err.to_string().contains("Invalid page size: 30"));
    }
}
