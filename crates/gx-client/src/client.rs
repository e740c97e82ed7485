//! The session entry point.
//!
//! [`GedcomxClient`] assembles a transport and a state factory from a
//! [`ClientConfig`] and reads the root collection. Everything after that is
//! hypermedia navigation from the returned state.

use std::sync::Arc;

use gx_core::{Method, Transport};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::factory::StateFactory;
use crate::states::CollectionState;
use crate::transport::ReqwestTransport;

/// A configured GEDCOM X RS client.
#[derive(Debug, Clone)]
pub struct GedcomxClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    factory: Arc<StateFactory>,
}

impl GedcomxClient {
    /// A client over HTTP with a factory holding every GEDCOM X kind.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        let factory = StateFactory::gedcomx(config.collection_url.clone());
        Ok(Self::with_parts(config, Arc::new(transport), Arc::new(factory)))
    }

    /// A client over an explicit transport and factory.
    pub fn with_parts(config: ClientConfig, transport: Arc<dyn Transport>, factory: Arc<StateFactory>) -> Self {
        Self {
            config,
            transport,
            factory,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn factory(&self) -> &Arc<StateFactory> {
        &self.factory
    }

    /// Read the root collection, carrying the configured token if any.
    pub fn read_collection(&self) -> Result<CollectionState> {
        let collection = self
            .factory
            .new_collection_state(Arc::clone(&self.transport), Method::GET)?;
        Ok(match &self.config.access_token {
            Some(token) => collection.authenticate_with_access_token(token.clone()),
            None => collection,
        })
    }
}
