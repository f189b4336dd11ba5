//! Record cursors: forward-only traversal over a paged record source.

use serde_json::Value;

use crate::error::{RenderError, SourceError};

/// Records fetched per page when a source has to be paged.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Sequential, forward-only view over a stream of records.
pub trait RecordCursor {
    /// Move to the first record.
    fn reset(&mut self) -> Result<(), RenderError>;

    /// Move to the next record.
    fn advance(&mut self) -> Result<(), RenderError>;

    /// `true` while the cursor points at a record.
    fn has_more(&self) -> bool;

    /// The record under the cursor, if any.
    fn current(&self) -> Option<&Value>;

    /// Natural position of the current record in the stream.
    fn key(&self) -> usize;
}

/// A source that hands out records a page at a time.
///
/// A page shorter than `limit` marks the end of the source.
pub trait PageSource {
    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<Value>, SourceError>;
}

impl PageSource for Vec<Value> {
    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<Value>, SourceError> {
        Ok(self.iter().skip(offset).take(limit).cloned().collect())
    }
}

/// [`RecordCursor`] that loads pages from a [`PageSource`] on demand.
///
/// Only one page is held in memory at a time.
#[derive(Debug)]
pub struct PagedCursor<S> {
    source: S,
    page_size: usize,
    page: Vec<Value>,
    page_start: usize,
    offset: usize,
}

impl<S: PageSource> PagedCursor<S> {
    pub fn new(source: S) -> Self {
        Self::with_page_size(source, DEFAULT_PAGE_SIZE)
    }

    /// A page size of zero is treated as one.
    pub fn with_page_size(source: S, page_size: usize) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            page: Vec::new(),
            page_start: 0,
            offset: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn load(&mut self, page_start: usize) -> Result<(), RenderError> {
        self.page = self
            .source
            .fetch_page(page_start, self.page_size)
            .map_err(RenderError::Source)?;
        self.page_start = page_start;
        self.offset = 0;
        tracing::trace!(page_start, len = self.page.len(), "loaded record page");
        Ok(())
    }
}

impl<S: PageSource> RecordCursor for PagedCursor<S> {
    fn reset(&mut self) -> Result<(), RenderError> {
        self.load(0)
    }

    fn advance(&mut self) -> Result<(), RenderError> {
        if !self.has_more() {
            return Ok(());
        }
        self.offset += 1;
        if self.offset >= self.page.len() && self.page.len() == self.page_size {
            self.load(self.page_start + self.page_size)?;
        }
        Ok(())
    }

    fn has_more(&self) -> bool {
        self.offset < self.page.len()
    }

    fn current(&self) -> Option<&Value> {
        self.page.get(self.offset)
    }

    fn key(&self) -> usize {
        self.page_start + self.offset
    }
}
