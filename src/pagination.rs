use std::fmt;

use crate::error::{Result, ShowMeError};

/// Rows-per-page choices offered by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
    ];

    pub fn rows(self) -> u32 {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }

    pub fn larger(self) -> Option<PageSize> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    pub fn smaller(self) -> Option<PageSize> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        idx.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Next size, wrapping from 50 back to 5.
    pub fn cycled(self) -> PageSize {
        self.larger().unwrap_or(PageSize::Five)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = ShowMeError;

    fn try_from(rows: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.rows() == rows)
            .ok_or(ShowMeError::InvalidPageSize(rows))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows())
    }
}

/// Current page and page size. Every mutation that returns `true` (or any
/// explicit `set_*`) is a state change the shell answers with one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: PageSize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: PageSize) -> Result<Self> {
        if page == 0 {
            return Err(ShowMeError::InvalidPage(page));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Move to `page`, keeping the page size.
    pub fn set_page(&mut self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(ShowMeError::InvalidPage(page));
        }
        self.page = page;
        Ok(())
    }

    /// Switch page size. Always lands on page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn next_page(&mut self, total_pages: u32) -> bool {
        if self.page < total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn first_page(&mut self) -> bool {
        let changed = self.page != 1;
        self.page = 1;
        changed
    }

    pub fn last_page(&mut self, total_pages: u32) -> bool {
        let last = total_pages.max(1);
        let changed = self.page != last;
        self.page = last;
        changed
    }

    /// "Showing X to Y of Z" bounds for the current state.
    ///
    /// With zero rows this still reports `first_shown == 1`; the viewer has
    /// always read "Showing 1 to 0 of 0 entries" for an empty sheet.
    pub fn summary(&self, total_rows: u32) -> Summary {
        let size = u64::from(self.page_size.rows());
        let page = u64::from(self.page);
        Summary {
            first_shown: (page - 1) * size + 1,
            last_shown: (page * size).min(u64::from(total_rows)),
            total_rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub first_shown: u64,
    pub last_shown: u64,
    pub total_rows: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} entries",
            self.first_shown, self.last_shown, self.total_rows
        )
    }
}

/// `ceil(total_rows / page_size)`, zero when `page_size` is zero.
pub fn total_pages(total_rows: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        0
    } else {
        total_rows.div_ceil(page_size)
    }
}
