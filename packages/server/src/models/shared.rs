use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Clamp raw pagination query values to (page, per_page).
pub fn clamp_pagination(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = Ord::max(page.unwrap_or(1), 1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    (page, per_page)
}

/// Validate a short text field (name, term text): 1-50 Unicode characters
/// after trimming, matching the database column width.
pub fn validate_short_text(value: &str, what: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 50 {
        return Err(AppError::Validation(format!(
            "{what} must be 1-50 characters"
        )));
    }
    Ok(())
}

/// Validate a long text field (definition, example usage).
pub fn validate_long_text(value: &str, what: &str) -> Result<(), AppError> {
    if value.trim().is_empty() || value.len() > 10_000 {
        return Err(AppError::Validation(format!(
            "{what} must be non-empty and at most 10000 bytes"
        )));
    }
    Ok(())
}
