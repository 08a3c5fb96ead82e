//! Pagination state for the two GitHub API surfaces.
//!
//! The REST API pages by number and advertises the last page through the
//! `Link` header, while GraphQL connections page by an opaque cursor and a
//! `hasNextPage` flag. Both collapse into a [`PageCursor`] that the paginator
//! threads through successive requests.

/// Position of the next page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// REST offset pagination (1-based page number).
    Page(u32),
    /// GraphQL cursor pagination; `None` requests the first page.
    After(Option<String>),
}

impl PageCursor {
    /// Cursor for the first page of a REST listing.
    #[must_use]
    pub const fn first_page() -> Self {
        Self::Page(1)
    }

    /// Cursor for the first page of a GraphQL connection.
    #[must_use]
    pub const fn first_cursor() -> Self {
        Self::After(None)
    }
}

/// Page state reported by an offset-paginated REST response.
///
/// # Example
///
/// ```
/// use ghaudit::github::pagination::{PageCursor, PageInfo};
///
/// let info = PageInfo::builder(2)
///     .total_pages(Some(3))
///     .has_next(true)
///     .build();
/// assert_eq!(info.next_cursor(), Some(PageCursor::Page(3)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    current_page: u32,
    total_pages: Option<u32>,
    has_next: bool,
}

/// Builder for [`PageInfo`].
#[derive(Debug, Clone, Copy)]
pub struct PageInfoBuilder {
    info: PageInfo,
}

impl PageInfoBuilder {
    /// Sets the last page number advertised by the response, if any.
    #[must_use]
    pub const fn total_pages(mut self, total_pages: Option<u32>) -> Self {
        self.info.total_pages = total_pages;
        self
    }

    /// Sets whether the response advertised a next page.
    #[must_use]
    pub const fn has_next(mut self, has_next: bool) -> Self {
        self.info.has_next = has_next;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub const fn build(self) -> PageInfo {
        self.info
    }
}

impl PageInfo {
    /// Starts building page info for the given 1-based page number.
    #[must_use]
    pub const fn builder(current_page: u32) -> PageInfoBuilder {
        PageInfoBuilder {
            info: Self {
                current_page,
                total_pages: None,
                has_next: false,
            },
        }
    }

    /// Returns true when no further page should be requested.
    ///
    /// Listing stops when the current page is the advertised last page or
    /// when no next page is advertised at all.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        if !self.has_next {
            return true;
        }
        match self.total_pages {
            Some(total) => self.current_page >= total,
            None => false,
        }
    }

    /// Returns the cursor for the following page, if any.
    #[must_use]
    pub const fn next_cursor(&self) -> Option<PageCursor> {
        if self.is_last_page() {
            None
        } else {
            Some(PageCursor::Page(self.current_page.saturating_add(1)))
        }
    }
}

/// Connection state reported by a cursor-paginated GraphQL response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

impl CursorInfo {
    /// Creates cursor info from a GraphQL `pageInfo` object.
    #[must_use]
    pub const fn new(end_cursor: Option<String>, has_next_page: bool) -> Self {
        Self {
            end_cursor,
            has_next_page,
        }
    }

    /// Returns the cursor for the following page, if any.
    ///
    /// A connection that claims another page but omits its end cursor is
    /// treated as exhausted rather than re-requesting the first page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<PageCursor> {
        if !self.has_next_page {
            return None;
        }
        self.end_cursor
            .clone()
            .map(|cursor| PageCursor::After(Some(cursor)))
    }
}
