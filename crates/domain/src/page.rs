//! Paginated list payloads.
//!
//! The backend has shipped three shapes for the recipe list endpoint:
//! `{ "items": […] }`, `{ "content": […] }`, and a bare array. Each
//! accepted shape is enumerated explicitly; anything else is a decode
//! error rather than a silently empty list.

use serde::Deserialize;

use crate::recipe::Recipe;

/// Pagination metadata the server may or may not include.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default)]
    pub size: Option<u32>,
    /// Total number of records.
    #[serde(default)]
    pub total: Option<u64>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Whether a further page exists.
    #[serde(default)]
    pub has_next: Option<bool>,
}

/// Raw list payload, one variant per accepted server shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PageBody {
    /// `{ "items": […], …meta }`
    Items {
        /// The records on this page.
        items: Vec<Recipe>,
        /// Accompanying pagination fields.
        #[serde(flatten)]
        meta: PageMeta,
    },
    /// `{ "content": […], …meta }`
    Content {
        /// The records on this page.
        content: Vec<Recipe>,
        /// Accompanying pagination fields.
        #[serde(flatten)]
        meta: PageMeta,
    },
    /// A bare array with no pagination metadata.
    Bare(Vec<Recipe>),
}

/// A normalized page of recipes.
///
/// Invariants: `page >= 1`; `has_next ⟺ page < total_pages` unless the
/// server stated otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePage {
    /// Records on this page.
    pub items: Vec<Recipe>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Total number of records.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Whether a further page exists.
    pub has_next: bool,
}

impl PageBody {
    /// Normalizes the payload into a single canonical page.
    ///
    /// Fields the server omitted fall back to the requested `page` and
    /// `size`; a missing `totalPages` is derived as `ceil(total / size)`
    /// and a missing `hasNext` as `page < total_pages`.
    #[must_use]
    pub fn normalize(self, requested_page: u32, requested_size: u32) -> RecipePage {
        let (items, meta) = match self {
            Self::Items { items, meta } => (items, meta),
            Self::Content { content, meta } => (content, meta),
            Self::Bare(items) => (items, PageMeta::default()),
        };

        let page = meta.page.unwrap_or(requested_page).max(1);
        let size = meta.size.unwrap_or(requested_size).max(1);
        let total = meta.total.unwrap_or(0);
        let total_pages = meta.total_pages.unwrap_or_else(|| {
            u32::try_from(total.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
        });
        let has_next = meta.has_next.unwrap_or(page < total_pages);

        RecipePage {
            items,
            page,
            size,
            total,
            total_pages,
            has_next,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> PageBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_items_shape() {
        let body = parse(
            r#"{"items":[{"boardNo":1,"title":"Kimchi stew"}],
                "page":2,"size":10,"total":25,"totalPages":3,"hasNext":true}"#,
        );
        let page = body.normalize(1, 10);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
    }

    #[test]
    fn decodes_content_shape_and_derives_total_pages() {
        let body = parse(
            r#"{"content":[{"boardNo":1,"title":"Bibimbap"}],
                "total":25,"size":10}"#,
        );
        let page = body.normalize(1, 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
    }

    #[test]
    fn decodes_bare_array_with_request_fallbacks() {
        let body = parse(r#"[{"boardNo":9,"title":"Japchae"}]"#);
        let page = body.normalize(4, 20);
        assert_eq!(page.page, 4);
        assert_eq!(page.size, 20);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
    }

    #[test]
    fn has_next_follows_page_versus_total_pages() {
        let body = parse(r#"{"items":[],"page":3,"size":10,"total":25,"totalPages":3}"#);
        let page = body.normalize(3, 10);
        assert!(!page.has_next);
    }

    #[test]
    fn unknown_shape_fails_to_decode() {
        let result: Result<PageBody, _> =
            serde_json::from_str(r#"{"records":[{"boardNo":1,"title":"x"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn exact_division_has_no_extra_page() {
        let body = parse(r#"{"items":[],"page":1,"size":10,"total":30}"#);
        let page = body.normalize(1, 10);
        assert_eq!(page.total_pages, 3);
    }
}
