//! Paginated list envelope.

use serde::{Deserialize, Serialize};

/// A page of results plus navigation metadata.
///
/// Serialized with camelCase names. Zero counters and a null `data` field
/// are left out of the output.
///
/// # Example
///
/// ```rust
/// use courier_core::ListBody;
/// use serde_json::json;
///
/// let page = ListBody::paginate(json!(["a", "b"]), 1, 2, 5);
/// assert_eq!(page.total_pages, 3);
/// assert_eq!(page.next_page, 2);
/// assert_eq!(page.previous_page, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBody {
    /// The entries on this page.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
    /// 1-based page number.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub current_page: u64,
    /// Page size.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub entries_per_page: u64,
    /// Next page number, 0 when on the last page.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub next_page: u64,
    /// Previous page number, 0 when on the first page.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub previous_page: u64,
    /// Number of entries across all pages.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_entries: u64,
    /// Number of pages.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_pages: u64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl ListBody {
    /// Creates a list holding only `data`.
    #[must_use]
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Builds a page and derives the navigation fields.
    ///
    /// A `per_page` of 0 yields no page count and no navigation.
    #[must_use]
    pub fn paginate(data: serde_json::Value, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        let next_page = if page < total_pages { page + 1 } else { 0 };
        let previous_page = if page > 1 { page - 1 } else { 0 };

        Self {
            data,
            current_page: page,
            entries_per_page: per_page,
            next_page,
            previous_page,
            total_entries: total,
            total_pages,
        }
    }
}
