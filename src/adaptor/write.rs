//! Write operations for the adaptor
//!
//! This module contains the shell-facing write path:
//! - insert (single documents and batches)
//! - the `system.indexes` pseudo-collection redirect to index creation
//! - remove, update

use mongodb::bson::{Bson, Document};
use mongodb::options::{IndexOptions, ReplaceOptions, UpdateOptions};
use mongodb::{Collection, IndexModel};
use tracing::{debug, info};

use crate::error::{AdaptorError, Result};
use crate::types::dynamic::DynamicValue;

use super::{MongoAdaptor, SYSTEM_INDEXES_SUFFIX, split_namespace};

impl MongoAdaptor {
    /// Execute a shell-style insert.
    ///
    /// A list payload inserts as a batch. Index documents inserted into the
    /// `system.indexes` pseudo-collection are redirected to the driver's
    /// index-creation path; generic insert has no legacy dot-addressing mode.
    ///
    /// # Arguments
    /// * `ns` - `"database.collection"` namespace
    /// * `value` - Document or list of documents to insert
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub async fn insert(&self, ns: &str, value: &DynamicValue) -> Result<()> {
        let (db_name, collection) = split_namespace(ns)?;
        let wire = self.bsonizer().to_wire(value, None)?;

        if collection.ends_with(SYSTEM_INDEXES_SUFFIX) {
            let Bson::Document(spec) = wire else {
                return Err(AdaptorError::InvalidParameters(
                    "index spec must be a document".to_string(),
                )
                .into());
            };
            self.create_index_from_spec(db_name, spec).await?;
            self.record_database(db_name).await;
            return Ok(());
        }

        debug!("Executing insert on '{ns}'");
        let coll: Collection<Document> = self.database(db_name)?.collection(collection);
        match wire {
            Bson::Array(items) => {
                let documents = items
                    .into_iter()
                    .map(|item| match item {
                        Bson::Document(document) => Ok(document),
                        other => Err(AdaptorError::InvalidParameters(format!(
                            "insert batch entries must be documents, got {:?}",
                            other.element_type()
                        ))),
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                coll.insert_many(documents).await?;
            }
            Bson::Document(document) => {
                coll.insert_one(document).await?;
            }
            other => {
                return Err(AdaptorError::InvalidParameters(format!(
                    "insert payload must be a document or list, got {:?}",
                    other.element_type()
                ))
                .into());
            }
        }

        self.record_database(db_name).await;
        Ok(())
    }

    /// Execute a shell-style remove.
    ///
    /// # Arguments
    /// * `ns` - `"database.collection"` namespace
    /// * `pattern` - Deletion filter
    /// * `just_one` - Delete at most one matching document
    ///
    /// # Returns
    /// * `Result<u64>` - Number of deleted documents
    pub async fn remove(&self, ns: &str, pattern: &DynamicValue, just_one: bool) -> Result<u64> {
        let (db_name, collection) = split_namespace(ns)?;
        let filter = self.document_argument(pattern, "remove pattern")?;

        debug!("Executing remove on '{ns}' with filter: {filter:?}");
        let coll: Collection<Document> = self.database(db_name)?.collection(collection);
        let deleted = if just_one {
            coll.delete_one(filter).await?.deleted_count
        } else {
            coll.delete_many(filter).await?.deleted_count
        };

        self.record_database(db_name).await;
        Ok(deleted)
    }

    /// Execute a shell-style update.
    ///
    /// Operator documents (first key starting with `$`) run as updates;
    /// anything else runs as a whole-document replacement. Multi-document
    /// replacement is rejected, as the server itself would.
    ///
    /// # Arguments
    /// * `ns` - `"database.collection"` namespace
    /// * `query` - Update filter
    /// * `update` - Operator document or replacement document
    /// * `upsert` - Insert when no document matches
    /// * `multi` - Update every matching document
    ///
    /// # Returns
    /// * `Result<u64>` - Number of matched documents
    pub async fn update(
        &self,
        ns: &str,
        query: &DynamicValue,
        update: &DynamicValue,
        upsert: bool,
        multi: bool,
    ) -> Result<u64> {
        let (db_name, collection) = split_namespace(ns)?;
        let filter = self.document_argument(query, "update filter")?;
        let update_doc = self.document_argument(update, "update document")?;

        debug!("Executing update on '{ns}' with filter: {filter:?}");
        let coll: Collection<Document> = self.database(db_name)?.collection(collection);

        let is_operator_update = update_doc
            .keys()
            .next()
            .is_some_and(|key| key.starts_with('$'));

        let matched = if is_operator_update {
            let options = UpdateOptions::builder().upsert(upsert).build();
            if multi {
                coll.update_many(filter, update_doc)
                    .with_options(options)
                    .await?
                    .matched_count
            } else {
                coll.update_one(filter, update_doc)
                    .with_options(options)
                    .await?
                    .matched_count
            }
        } else {
            if multi {
                return Err(AdaptorError::InvalidParameters(
                    "multi update requires an operator document".to_string(),
                )
                .into());
            }
            let options = ReplaceOptions::builder().upsert(upsert).build();
            coll.replace_one(filter, update_doc)
                .with_options(options)
                .await?
                .matched_count
        };

        self.record_database(db_name).await;
        Ok(matched)
    }

    /// Translate a legacy `system.indexes` insert into an index creation.
    async fn create_index_from_spec(&self, db_name: &str, spec: Document) -> Result<()> {
        let (target, model) = index_model_from_spec(spec)?;
        info!("Redirecting system.indexes insert to createIndex on '{target}'");

        let coll: Collection<Document> = self.database(db_name)?.collection(&target);
        coll.create_index(model).await?;
        Ok(())
    }
}

/// Build an index model from a legacy index spec document.
///
/// Returns the target collection name (from the spec's `ns` field) and the
/// model carrying the key pattern and options.
fn index_model_from_spec(spec: Document) -> Result<(String, IndexModel)> {
    let keys = match spec.get("key") {
        Some(Bson::Document(keys)) => keys.clone(),
        _ => {
            return Err(AdaptorError::InvalidParameters(
                "index spec missing 'key' document".to_string(),
            )
            .into());
        }
    };

    let target_ns = spec.get_str("ns").map_err(|_| {
        AdaptorError::InvalidParameters("index spec missing 'ns' field".to_string())
    })?;
    let (_, target_collection) = split_namespace(target_ns)?;

    let mut options = IndexOptions::default();
    if let Ok(name) = spec.get_str("name") {
        options.name = Some(name.to_string());
    }
    if let Ok(unique) = spec.get_bool("unique") {
        options.unique = Some(unique);
    }
    if let Ok(sparse) = spec.get_bool("sparse") {
        options.sparse = Some(sparse);
    }

    let model = IndexModel::builder().keys(keys).options(options).build();
    Ok((target_collection.to_string(), model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_index_spec_extraction() {
        let spec = doc! {
            "ns": "test.people",
            "key": {"age": 1},
            "name": "age_1",
            "unique": true,
        };

        let (target, model) = index_model_from_spec(spec).unwrap();
        assert_eq!(target, "people");
        assert_eq!(model.keys, doc! {"age": 1});

        let options = model.options.unwrap();
        assert_eq!(options.name.as_deref(), Some("age_1"));
        assert_eq!(options.unique, Some(true));
        assert_eq!(options.sparse, None);
    }

    #[test]
    fn test_index_spec_requires_key_and_ns() {
        assert!(index_model_from_spec(doc! {"ns": "test.people"}).is_err());
        assert!(index_model_from_spec(doc! {"key": {"a": 1}}).is_err());
    }
}
