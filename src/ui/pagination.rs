//! Page arithmetic for list screens.

/// Allowed rows-per-page values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Fifteen,
}

impl PageSize {
    pub fn all() -> &'static [PageSize] {
        &[PageSize::Five, PageSize::Ten, PageSize::Fifteen]
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            5 => Some(PageSize::Five),
            10 => Some(PageSize::Ten),
            15 => Some(PageSize::Fifteen),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Fifteen => 15,
        }
    }

    /// Cycle 5 → 10 → 15 → 5.
    pub fn next(&self) -> Self {
        match self {
            PageSize::Five => PageSize::Ten,
            PageSize::Ten => PageSize::Fifteen,
            PageSize::Fifteen => PageSize::Five,
        }
    }
}

/// `ceil(filtered / page_size)`.
pub fn total_pages(filtered: u64, page_size: PageSize) -> u64 {
    filtered.div_ceil(page_size.as_u32() as u64)
}

/// Rows skipped before the given 1-based page.
pub fn row_offset(page: u32, page_size: PageSize) -> u64 {
    page_size.as_u32() as u64 * page.saturating_sub(1) as u64
}

/// The page control is only worth showing when rows spill past one page.
pub fn show_pager(page_size: PageSize, filtered: u64) -> bool {
    (page_size.as_u32() as u64) < filtered
}
