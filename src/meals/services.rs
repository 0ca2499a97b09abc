use super::dto::Pagination;

/// Pagination metadata for a filtered listing. `page` and `limit` are
/// clamped to positive values; an out-of-range page is not an error, the
/// slice just comes back empty while the metadata stays accurate.
pub fn page_meta(total: i64, page: i64, limit: i64) -> Pagination {
    let page = page.max(1);
    let limit = limit.max(1);
    // saturating: a huge limit still means one page, never an overflow
    let total_pages = total.saturating_add(limit - 1) / limit;
    Pagination {
        total,
        page,
        total_pages,
        limit,
    }
}

pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit.max(1))
}
