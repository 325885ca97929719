//! Shell-style operation adaptor over the MongoDB driver
//!
//! This module maps shell-style `find`/`insert`/`remove`/`update` calls onto
//! the driver, converting every document that crosses the boundary:
//! - `read`: find, the `$cmd` pseudo-collection, query envelopes, commands
//! - `write`: insert, remove, update, the `system.indexes` redirect
//! - `cursor`: one-shot command results and live driver cursors
//!
//! Each adaptor represents one logical connection with an irrevocable state
//! machine: Unconnected becomes Connected exactly once; after a failure a
//! fresh adaptor is required. No retry or caching happens here.

pub mod cursor;
mod read;
mod write;

pub use cursor::InternalCursor;

use std::sync::Arc;

use mongodb::options::{Acknowledgment, ClientOptions, WriteConcern};
use mongodb::{Client, Database};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::convert::Bsonizer;
use crate::error::{AdaptorError, Result};
use crate::runtime::ValueFactory;

/// Reserved command pseudo-collection name (wire format contract).
pub const COMMAND_COLLECTION: &str = "$cmd";

/// Reserved system-index pseudo-collection suffix (wire format contract).
pub const SYSTEM_INDEXES_SUFFIX: &str = "system.indexes";

/// Connection state of an adaptor.
///
/// Transitions are irrevocable: there is no reconnect path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptorState {
    /// Not yet connected
    Unconnected,

    /// Connected and ready
    Connected,

    /// Connection attempt failed; the adaptor is unusable
    Failed(String),
}

/// Adaptor between shell-style collection operations and the MongoDB driver.
pub struct MongoAdaptor {
    /// Driver client, present once connected
    client: Option<Client>,

    /// Current connection state
    state: AdaptorState,

    /// Connection URI (parsed by the driver, not here)
    uri: String,

    /// Connection configuration
    config: ConnectionConfig,

    /// Converter for every document crossing the boundary
    bsonizer: Bsonizer,

    /// Most recently touched database, for "current database" defaults
    last_database: RwLock<Option<String>>,
}

impl MongoAdaptor {
    /// Create an unconnected adaptor.
    ///
    /// # Arguments
    /// * `uri` - MongoDB connection URI
    /// * `config` - Connection configuration
    /// * `factory` - Script runtime value factory
    ///
    /// # Returns
    /// * `Self` - New adaptor in the Unconnected state
    pub fn new(uri: String, config: ConnectionConfig, factory: Arc<dyn ValueFactory>) -> Self {
        Self::with_bsonizer(uri, config, Bsonizer::new(factory))
    }

    /// Create an unconnected adaptor around an existing converter.
    pub fn with_bsonizer(uri: String, config: ConnectionConfig, bsonizer: Bsonizer) -> Self {
        Self {
            client: None,
            state: AdaptorState::Unconnected,
            uri,
            config,
            bsonizer,
            last_database: RwLock::new(None),
        }
    }

    /// Establish the connection.
    ///
    /// Fails if the adaptor has already left the Unconnected state. A failed
    /// attempt leaves the adaptor permanently unusable.
    ///
    /// # Returns
    /// * `Result<()>` - Success or connection error
    pub async fn connect(&mut self) -> Result<()> {
        if self.state != AdaptorState::Unconnected {
            return Err(AdaptorError::AlreadyConnected.into());
        }

        let mut options = match ClientOptions::parse(&self.uri).await {
            Ok(options) => options,
            Err(err) => {
                self.state = AdaptorState::Failed(err.to_string());
                return Err(AdaptorError::ConnectionFailed(err.to_string()).into());
            }
        };

        options.app_name = Some(self.config.app_name.clone());
        options.connect_timeout = Some(self.config.timeout_duration());
        options.server_selection_timeout = Some(self.config.timeout_duration());
        if self.config.use_shell_write_concern {
            // Legacy shell fire-and-forget writes.
            options.write_concern = Some(
                WriteConcern::builder()
                    .w(Acknowledgment::Nodes(0))
                    .build(),
            );
        }

        match Client::with_options(options) {
            Ok(client) => {
                info!("Connected adaptor to {}", self.uri);
                self.client = Some(client);
                self.state = AdaptorState::Connected;
                Ok(())
            }
            Err(err) => {
                self.state = AdaptorState::Failed(err.to_string());
                Err(AdaptorError::ConnectionFailed(err.to_string()).into())
            }
        }
    }

    /// Current connection state.
    pub fn state(&self) -> &AdaptorState {
        &self.state
    }

    /// True once `connect` has succeeded.
    pub fn is_connected(&self) -> bool {
        self.state == AdaptorState::Connected
    }

    /// Most recently touched database name, if any write has run.
    pub async fn last_database(&self) -> Option<String> {
        self.last_database.read().await.clone()
    }

    /// Converter used by this adaptor.
    pub fn bsonizer(&self) -> &Bsonizer {
        &self.bsonizer
    }

    /// Driver client, available only in the Connected state.
    pub(crate) fn client(&self) -> Result<&Client> {
        match self.state {
            AdaptorState::Connected => Ok(self
                .client
                .as_ref()
                .ok_or(AdaptorError::NotConnected)?),
            _ => Err(AdaptorError::NotConnected.into()),
        }
    }

    /// Database handle for the given name.
    pub(crate) fn database(&self, name: &str) -> Result<Database> {
        Ok(self.client()?.database(name))
    }

    /// Record `name` as the most recently touched database.
    pub(crate) async fn record_database(&self, name: &str) {
        debug!("Recording last touched database: {name}");
        *self.last_database.write().await = Some(name.to_string());
    }
}

impl std::fmt::Debug for MongoAdaptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoAdaptor")
            .field("uri", &self.uri)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Split a `"database.collection"` namespace on the first separator.
pub(crate) fn split_namespace(ns: &str) -> Result<(&str, &str)> {
    ns.split_once('.')
        .filter(|(db, collection)| !db.is_empty() && !collection.is_empty())
        .ok_or_else(|| AdaptorError::InvalidNamespace(ns.to_string()).into())
}
