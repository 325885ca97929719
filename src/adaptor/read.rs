//! Read operations for the adaptor
//!
//! This module contains the shell-facing read path:
//! - find, with the `{query: ..., <modifiers>}` envelope
//! - the `$cmd` pseudo-collection and direct command execution
//! - logout

use std::time::Duration;

use mongodb::Collection;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{FindOptions, Hint};
use tracing::{debug, info};

use crate::error::{AdaptorError, Result};
use crate::types::dynamic::DynamicValue;

use super::cursor::InternalCursor;
use super::{COMMAND_COLLECTION, MongoAdaptor, split_namespace};

impl MongoAdaptor {
    /// Execute a shell-style find.
    ///
    /// The namespace splits on the first separator. A query against the
    /// `$cmd` pseudo-collection runs as a database command and yields a
    /// synthetic one-shot cursor; anything else issues a collection query.
    ///
    /// # Arguments
    /// * `ns` - `"database.collection"` namespace
    /// * `query` - Query document (possibly a `{query: ...}` envelope)
    /// * `fields` - Projection document, or null for all fields
    /// * `limit` - Maximum documents to return (0 for no limit)
    /// * `skip` - Documents to skip (0 for none)
    /// * `batch_size` - Cursor batch size (0 for driver default)
    ///
    /// # Returns
    /// * `Result<InternalCursor>` - Cursor over converted result documents
    pub async fn find(
        &self,
        ns: &str,
        query: &DynamicValue,
        fields: &DynamicValue,
        limit: i64,
        skip: u64,
        batch_size: u32,
    ) -> Result<InternalCursor> {
        let (db_name, collection) = split_namespace(ns)?;
        let query_doc = self.document_argument(query, "query")?;

        if collection == COMMAND_COLLECTION {
            return self.command_cursor(db_name, query_doc).await;
        }

        debug!("Executing find on '{ns}' with filter: {query_doc:?}");

        let (filter, modifiers) = split_query_envelope(query_doc);

        let mut options = FindOptions::default();
        match self.bsonizer().to_wire(fields, None)? {
            Bson::Document(projection) => options.projection = Some(projection),
            Bson::Null | Bson::Undefined => {}
            other => {
                return Err(AdaptorError::InvalidParameters(format!(
                    "projection must be a document, got {:?}",
                    other.element_type()
                ))
                .into());
            }
        }
        if limit > 0 {
            options.limit = Some(limit);
        }
        if skip > 0 {
            options.skip = Some(skip);
        }
        if batch_size > 0 {
            options.batch_size = Some(batch_size);
        }
        apply_modifiers(&mut options, modifiers);

        let coll: Collection<Document> = self.database(db_name)?.collection(collection);
        let cursor = coll.find(filter).with_options(options).await?;

        Ok(InternalCursor::query(cursor, self.bsonizer().clone()))
    }

    /// Run a command document, wrapping the result as a one-shot cursor.
    ///
    /// An empty command document is a bare invocation; it is modeled as a
    /// command-not-found result rather than a fault, matching interactive
    /// shell expectations.
    async fn command_cursor(&self, db_name: &str, command: Document) -> Result<InternalCursor> {
        if command.is_empty() {
            debug!("Bare $cmd invocation against '{db_name}'");
            let not_found = doc! {"ok": false, "errmsg": "no such cmd: "};
            return Ok(InternalCursor::command(not_found, self.bsonizer().clone()));
        }

        info!("Running command against '{db_name}': {command:?}");
        let result = self.database(db_name)?.run_command(command).await?;
        Ok(InternalCursor::command(result, self.bsonizer().clone()))
    }

    /// Run a command and return its result document as a dynamic value.
    ///
    /// # Arguments
    /// * `db_name` - Database to run against
    /// * `command` - Command document
    ///
    /// # Returns
    /// * `Result<DynamicValue>` - Converted command result
    pub async fn run_command(&self, db_name: &str, command: &DynamicValue) -> Result<DynamicValue> {
        let command_doc = self.document_argument(command, "command")?;
        if command_doc.is_empty() {
            return Err(AdaptorError::InvalidParameters("empty command document".to_string()).into());
        }
        let result = self.database(db_name)?.run_command(command_doc).await?;
        self.bsonizer().to_dynamic(&Bson::Document(result))
    }

    /// Run the `{logout: 1}` command against the named database.
    pub async fn logout(&self, db_name: &str) -> Result<DynamicValue> {
        let result = self
            .database(db_name)?
            .run_command(doc! {"logout": 1})
            .await?;
        self.bsonizer().to_dynamic(&Bson::Document(result))
    }

    /// Convert a dynamic argument into a wire document.
    ///
    /// Null and undefined become the empty document; any other non-document
    /// shape is an invalid parameter.
    pub(super) fn document_argument(&self, value: &DynamicValue, role: &str) -> Result<Document> {
        match self.bsonizer().to_wire(value, None)? {
            Bson::Document(document) => Ok(document),
            Bson::Null | Bson::Undefined => Ok(Document::new()),
            other => Err(AdaptorError::InvalidParameters(format!(
                "{role} must be a document, got {:?}",
                other.element_type()
            ))
            .into()),
        }
    }
}

/// Split an optional `{query: ..., <modifiers>}` envelope.
///
/// When the converted query document itself holds a `"query"` key with a
/// document value, that inner document is the actual filter and every other
/// key is a cursor modifier, not filter data.
fn split_query_envelope(query: Document) -> (Document, Document) {
    if !matches!(query.get("query"), Some(Bson::Document(_))) {
        return (query, Document::new());
    }

    let mut modifiers = query;
    let filter = match modifiers.remove("query") {
        Some(Bson::Document(inner)) => inner,
        _ => Document::new(),
    };
    (filter, modifiers)
}

/// Apply recognized cursor modifiers to the find options.
///
/// Unrecognized modifiers are skipped with a debug log rather than treated
/// as filter data.
fn apply_modifiers(options: &mut FindOptions, modifiers: Document) {
    for (key, value) in modifiers {
        match (key.as_str(), value) {
            ("orderby" | "$orderby", Bson::Document(sort)) => options.sort = Some(sort),
            ("hint" | "$hint", Bson::Document(keys)) => options.hint = Some(Hint::Keys(keys)),
            ("hint" | "$hint", Bson::String(name)) => options.hint = Some(Hint::Name(name)),
            ("$comment", comment) => options.comment = Some(comment),
            ("$maxTimeMS", value) => {
                if let Some(millis) = as_millis(&value) {
                    options.max_time = Some(Duration::from_millis(millis));
                }
            }
            ("$min", Bson::Document(min)) => options.min = Some(min),
            ("$max", Bson::Document(max)) => options.max = Some(max),
            ("$returnKey", Bson::Boolean(flag)) => options.return_key = Some(flag),
            ("$showDiskLoc", Bson::Boolean(flag)) => options.show_record_id = Some(flag),
            (other, value) => {
                debug!("Skipping unsupported cursor modifier '{other}': {value:?}");
            }
        }
    }
}

/// Non-negative millisecond reading of a numeric wire value.
fn as_millis(value: &Bson) -> Option<u64> {
    let millis = match value {
        Bson::Double(n) if *n >= 0.0 => *n as u64,
        Bson::Int32(n) if *n >= 0 => *n as u64,
        Bson::Int64(n) if *n >= 0 => *n as u64,
        _ => return None,
    };
    Some(millis)
}
