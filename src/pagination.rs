use serde::Serialize;

/// Row window for a 1-indexed page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// Largest page a client may ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

/// `None` when the offset does not fit the database's signed 64-bit
/// OFFSET.
pub fn paginate(page: u64, page_size: u64) -> Option<Window> {
    let offset = page.saturating_sub(1).checked_mul(page_size)?;
    if offset > i64::MAX as u64 || page_size > i64::MAX as u64 {
        return None;
    }
    Some(Window { offset, limit: page_size })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u64,
    pub limit: u64,
}
