//! Batch rendering over a record cursor.
//!
//! [`RenderingIterator`] renders one template against every record of a
//! [`RecordCursor`], yielding only records that can be rendered completely
//! and, when an address fetcher is set, that have a non-empty address.
//! Filtering happens lazily, one cursor move at a time.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use msgrender_core::{fetcher, Fetcher, Rendered, Template};

use crate::context::RenderingContext;
use crate::cursor::RecordCursor;
use crate::error::RenderError;

/// Key of a yielded record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordKey {
    /// Natural position in the underlying stream.
    Position(usize),
    /// Address resolved by the iterator's address fetcher.
    Address(String),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Position(pos) => pos.fmt(f),
            RecordKey::Address(address) => address.fmt(f),
        }
    }
}

/// Lazily renders a template against each yieldable record of a cursor.
///
/// A record is yieldable when its address is non-empty (or empty addresses
/// are allowed, or there is no address fetcher) and every placeholder the
/// template uses resolves to a non-empty value.
pub struct RenderingIterator<C> {
    cursor: C,
    context: Arc<RenderingContext>,
    template: Template,
    address_fetcher: Option<Fetcher>,
    skip_empty_address: bool,
    current_address: Option<String>,
    started: bool,
    finished: bool,
}

impl<C: RecordCursor> RenderingIterator<C> {
    pub fn new(cursor: C, context: Arc<RenderingContext>, template: impl Into<Template>) -> Self {
        Self {
            cursor,
            context,
            template: template.into(),
            address_fetcher: None,
            skip_empty_address: true,
            current_address: None,
            started: false,
            finished: false,
        }
    }

    /// Key records by an address resolved from each record.
    pub fn with_address_fetcher(mut self, fetcher: impl Into<Fetcher>) -> Self {
        self.address_fetcher = Some(fetcher.into());
        self
    }

    /// Whether records with an empty address are skipped. Defaults to `true`.
    pub fn with_skip_empty_address(mut self, skip: bool) -> Self {
        self.skip_empty_address = skip;
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn context(&self) -> &RenderingContext {
        &self.context
    }

    /// Rewind to the first yieldable record.
    pub fn reset(&mut self) -> Result<(), RenderError> {
        self.cursor.reset()?;
        self.advance_to_next_yieldable()
    }

    /// Move to the next yieldable record.
    pub fn advance(&mut self) -> Result<(), RenderError> {
        self.cursor.advance()?;
        self.advance_to_next_yieldable()
    }

    /// `true` while positioned on a yieldable record.
    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    /// Render the current record. `None` once the stream is exhausted.
    pub fn current(&self) -> Option<Result<Rendered, RenderError>> {
        self.cursor
            .current()
            .map(|record| self.context.render(&self.template, record))
    }

    /// Key of the current record. `None` once the stream is exhausted.
    pub fn key(&self) -> Option<RecordKey> {
        if !self.has_more() {
            return None;
        }
        Some(match &self.address_fetcher {
            Some(_) => RecordKey::Address(self.current_address.clone().unwrap_or_default()),
            None => RecordKey::Position(self.cursor.key()),
        })
    }

    fn advance_to_next_yieldable(&mut self) -> Result<(), RenderError> {
        self.current_address = None;
        loop {
            let Some(record) = self.cursor.current() else {
                return Ok(());
            };

            let address = match &self.address_fetcher {
                Some(f) => Some(fetcher::resolve_text(f, record)?),
                None => None,
            };
            let address_ok = !self.skip_empty_address
                || address.as_deref().map_or(true, |a| !a.is_empty());

            if address_ok && self.context.is_complete(&self.template, record)? {
                self.current_address = address;
                return Ok(());
            }

            tracing::debug!(
                position = self.cursor.key(),
                reason = if address_ok { "incomplete data" } else { "empty address" },
                "skipping record"
            );
            self.cursor.advance()?;
        }
    }
}

/// Drives the traversal from the first record on the first call to `next`.
/// Iteration stops after the first error.
impl<C: RecordCursor> Iterator for RenderingIterator<C> {
    type Item = Result<(RecordKey, Rendered), RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let step = if self.started {
            self.advance()
        } else {
            self.started = true;
            self.reset()
        };
        if let Err(err) = step {
            self.finished = true;
            return Some(Err(err));
        }

        let Some(key) = self.key() else {
            self.finished = true;
            return None;
        };
        match self.current()? {
            Ok(rendered) => Some(Ok((key, rendered))),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::PagedCursor;
    use msgrender_core::{Placeholder, Placeholders};
    use serde_json::{json, Value};

    fn context() -> Arc<RenderingContext> {
        let placeholders = Placeholders::new()
            .with("%KEY%", Placeholder::new("key1"))
            .unwrap();
        Arc::new(RenderingContext::new("context", "Context", placeholders))
    }

    fn data() -> Vec<Value> {
        vec![
            json!({ "key1": "value1", "addr": "addr1" }),
            json!({ "key1": "value2" }),
            json!({ "key1": "value3", "addr": "addr3" }),
        ]
    }

    #[test]
    fn renders_every_record_without_address_fetcher() {
        let it = RenderingIterator::new(PagedCursor::new(data()), context(), "%KEY%");
        let out: Vec<_> = it.collect::<Result<_, _>>().unwrap();
        assert_eq!(
            out,
            vec![
                (RecordKey::Position(0), Rendered::Single("value1".into())),
                (RecordKey::Position(1), Rendered::Single("value2".into())),
                (RecordKey::Position(2), Rendered::Single("value3".into())),
            ]
        );
    }

    #[test]
    fn address_path_keys_records_and_skips_missing() {
        let it = RenderingIterator::new(PagedCursor::new(data()), context(), "%KEY%")
            .with_address_fetcher("addr");
        let out: Vec<_> = it.collect::<Result<_, _>>().unwrap();
        let keys: Vec<_> = out.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["addr1", "addr3"]);
        assert_eq!(out[1].1.as_single(), Some("value3"));
    }

    #[test]
    fn address_callback_keys_records_and_skips_missing() {
        let fetcher = Fetcher::callback(|r| r.get("addr").cloned().unwrap_or(Value::Null));
        let it = RenderingIterator::new(PagedCursor::new(data()), context(), "%KEY%")
            .with_address_fetcher(fetcher);
        let keys: Vec<_> = it.map(|item| item.unwrap().0).collect();
        assert_eq!(
            keys,
            [
                RecordKey::Address("addr1".into()),
                RecordKey::Address("addr3".into())
            ]
        );
    }

    #[test]
    fn empty_addresses_are_kept_when_not_skipping() {
        let it = RenderingIterator::new(PagedCursor::new(data()), context(), "%KEY%")
            .with_address_fetcher("addr")
            .with_skip_empty_address(false);
        let keys: Vec<_> = it.map(|item| item.unwrap().0.to_string()).collect();
        assert_eq!(keys, ["addr1", "", "addr3"]);
    }

    #[test]
    fn incomplete_records_are_never_yielded() {
        let records = vec![
            json!({ "key1": "" }),
            json!({ "key1": "kept" }),
            json!({}),
        ];
        let it = RenderingIterator::new(PagedCursor::new(records), context(), "<%KEY%>");
        let out: Vec<_> = it.collect::<Result<_, _>>().unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, RecordKey::Position(1));
        assert_eq!(out[0].1.as_single(), Some("<kept>"));
    }

    #[test]
    fn manual_traversal_filters_from_reset() {
        let cursor = PagedCursor::with_page_size(data(), 1);
        let mut it =
            RenderingIterator::new(cursor, context(), "%KEY%").with_address_fetcher("addr");
        it.reset().unwrap();
        assert!(it.has_more());
        assert_eq!(it.key(), Some(RecordKey::Address("addr1".into())));
        it.advance().unwrap();
        assert_eq!(it.key(), Some(RecordKey::Address("addr3".into())));
        assert_eq!(it.current().unwrap().unwrap().as_single(), Some("value3"));
        it.advance().unwrap();
        assert!(!it.has_more());
        assert!(it.key().is_none());
        assert!(it.current().is_none());

        it.reset().unwrap();
        assert_eq!(it.key(), Some(RecordKey::Address("addr1".into())));
    }

    #[test]
    fn malformed_address_path_stops_iteration() {
        let mut it = RenderingIterator::new(PagedCursor::new(data()), context(), "%KEY%")
            .with_address_fetcher("addr..x");
        assert!(matches!(it.next(), Some(Err(RenderError::Path(_)))));
        assert!(it.next().is_none());
    }
}
