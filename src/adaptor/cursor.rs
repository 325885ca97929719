//! Result cursors handed back to the script layer
//!
//! A cursor is either a synthetic one-shot wrapper around a single command
//! result document (`has_next` is true exactly once) or a live driver cursor
//! whose documents convert to dynamic values as they are pulled.

use futures::stream::TryStreamExt;
use mongodb::bson::{Bson, Document};

use crate::convert::Bsonizer;
use crate::error::Result;
use crate::types::dynamic::DynamicValue;

/// Cursor over converted result documents.
pub struct InternalCursor {
    inner: CursorInner,
    bsonizer: Bsonizer,
    buffered: Option<DynamicValue>,
}

enum CursorInner {
    /// Synthetic single-document result of a command execution
    Command(Option<Document>),

    /// Live driver cursor over a collection query
    Query(mongodb::Cursor<Document>),
}

impl InternalCursor {
    /// One-shot cursor over a single command result document.
    pub(crate) fn command(result: Document, bsonizer: Bsonizer) -> Self {
        Self {
            inner: CursorInner::Command(Some(result)),
            bsonizer,
            buffered: None,
        }
    }

    /// Streaming cursor over a collection query.
    pub(crate) fn query(cursor: mongodb::Cursor<Document>, bsonizer: Bsonizer) -> Self {
        Self {
            inner: CursorInner::Query(cursor),
            bsonizer,
            buffered: None,
        }
    }

    /// True when another document is available.
    ///
    /// Buffers one document of lookahead; the buffered document is returned
    /// by the following `next` call.
    pub async fn has_next(&mut self) -> Result<bool> {
        if self.buffered.is_some() {
            return Ok(true);
        }
        self.buffered = self.fetch().await?;
        Ok(self.buffered.is_some())
    }

    /// Pull the next document, converted to a dynamic value.
    pub async fn next(&mut self) -> Result<Option<DynamicValue>> {
        if let Some(buffered) = self.buffered.take() {
            return Ok(Some(buffered));
        }
        self.fetch().await
    }

    async fn fetch(&mut self) -> Result<Option<DynamicValue>> {
        let document = match &mut self.inner {
            CursorInner::Command(slot) => slot.take(),
            CursorInner::Query(cursor) => cursor.try_next().await?,
        };

        document
            .map(|doc| self.bsonizer.to_dynamic(&Bson::Document(doc)))
            .transpose()
    }
}

impl std::fmt::Debug for InternalCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.inner {
            CursorInner::Command(_) => "command",
            CursorInner::Query(_) => "query",
        };
        f.debug_struct("InternalCursor").field("kind", &kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::BasicFactory;
    use crate::types::timestamp::TimestampGenerator;
    use mongodb::bson::doc;
    use std::sync::Arc;

    fn bsonizer() -> Bsonizer {
        Bsonizer::with_generator(Arc::new(BasicFactory), Arc::new(TimestampGenerator::new()))
    }

    #[tokio::test]
    async fn test_command_cursor_yields_exactly_once() {
        let mut cursor = InternalCursor::command(doc! {"ok": 1.0}, bsonizer());

        assert!(cursor.has_next().await.unwrap());
        // Lookahead must not consume the document.
        assert!(cursor.has_next().await.unwrap());

        let result = cursor.next().await.unwrap().unwrap();
        assert_eq!(result.get("ok"), Some(&DynamicValue::Double(1.0)));

        assert!(!cursor.has_next().await.unwrap());
        assert!(cursor.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_command_cursor_next_without_has_next() {
        let mut cursor = InternalCursor::command(doc! {"ok": 1.0}, bsonizer());
        assert!(cursor.next().await.unwrap().is_some());
        assert!(cursor.next().await.unwrap().is_none());
    }
}
