pub mod text;
pub mod view;

use std::io::IsTerminal;
use std::sync::Arc;

use crate::client::{ApiClient, BalanceSheetSource};
use crate::error::Result;
use crate::pagination::{PageSize, Pagination};

use super::{OutputMode, ReportArgs};

pub fn dispatch(args: ReportArgs) -> Result<()> {
    let pagination = pagination_for(&args)?;
    let base_url = crate::settings::api_url(args.api_url.as_deref());
    let client = ApiClient::new(base_url)?;
    tracing::info!(
        base_url = client.base_url(),
        page = pagination.page(),
        page_size = pagination.page_size().rows(),
        "opening balance sheet"
    );
    let source: Arc<dyn BalanceSheetSource> = Arc::new(client);

    if interactive(args.mode) {
        view::run(source, pagination)
    } else {
        // Non-TTY: plain text to stdout
        let s = text::balance_sheet(source, pagination)?;
        println!("{s}");
        Ok(())
    }
}

/// Whether the report should open the interactive view.
pub fn interactive(mode: Option<OutputMode>) -> bool {
    match mode {
        Some(OutputMode::View) => true,
        Some(OutputMode::Text) => false,
        None => std::io::stdout().is_terminal(),
    }
}

/// Starting page and size: flags first, then the saved page size.
pub(crate) fn pagination_for(args: &ReportArgs) -> Result<Pagination> {
    let rows = args
        .page_size
        .unwrap_or_else(|| crate::settings::load_settings().page_size);
    Pagination::new(args.page, PageSize::try_from(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(page: u32, page_size: Option<u32>) -> ReportArgs {
        ReportArgs {
            page,
            page_size,
            api_url: None,
            mode: Some(OutputMode::Text),
        }
    }

    #[test]
    fn test_pagination_from_flags() {
        let p = pagination_for(&args(3, Some(25))).unwrap();
        assert_eq!(p.page(), 3);
        assert_eq!(p.page_size(), PageSize::TwentyFive);
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        assert!(pagination_for(&args(1, Some(7))).is_err());
        assert!(pagination_for(&args(0, Some(10))).is_err());
    }

    #[test]
    fn test_explicit_mode_wins() {
        assert!(interactive(Some(OutputMode::View)));
        assert!(!interactive(Some(OutputMode::Text)));
    }
}
