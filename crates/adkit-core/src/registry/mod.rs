//! Plugin-based collaborator registry
//!
//! The registry allows ad servers and analytics transports to be
//! registered dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adkit_core::registry::CollaboratorRegistry;
//! use adkit_core::config::AdServerConfig;
//!
//! let registry = CollaboratorRegistry::new();
//!
//! // Register factories (implementations register themselves)
//! registry.register_ad_server("mediated", Box::new(mediated_factory));
//!
//! // Create a collaborator from config
//! let config = AdServerConfig::Custom { /* ... */ };
//! let server = registry.create_ad_server(&config)?;
//! ```
//!
//! Implementation crates expose a `register` entry point:
//!
//! ```rust,ignore
//! // In adkit-analytics-http
//! pub fn register(registry: &CollaboratorRegistry) {
//!     registry.register_transport("http", Box::new(HttpTransportFactory));
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::{AdServerConfig, TransportConfig};
use crate::error::{Error, Result};
use crate::server::CannedAdServer;
use crate::traits::{AdServer, AdServerFactory, AnalyticsTransport, AnalyticsTransportFactory};

/// Registry of collaborator factories
///
/// Maps type names to factory objects for config-driven instantiation.
/// The built-in `canned` ad server needs no registration.
///
/// ## Thread Safety
///
/// Interior mutability via RwLock: concurrent reads, exclusive writes.
#[derive(Default)]
pub struct CollaboratorRegistry {
    /// Registered ad server factories
    ad_servers: RwLock<HashMap<String, Box<dyn AdServerFactory>>>,

    /// Registered analytics transport factories
    transports: RwLock<HashMap<String, Box<dyn AnalyticsTransportFactory>>>,
}

impl CollaboratorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ad server factory
    ///
    /// # Parameters
    ///
    /// - `name`: server type name (matched against `Custom { factory }`)
    /// - `factory`: factory object for creating server instances
    pub fn register_ad_server(&self, name: impl Into<String>, factory: Box<dyn AdServerFactory>) {
        let name = name.into();
        let mut servers = self.ad_servers.write().unwrap();
        servers.insert(name, factory);
    }

    /// Register an analytics transport factory
    pub fn register_transport(
        &self,
        name: impl Into<String>,
        factory: Box<dyn AnalyticsTransportFactory>,
    ) {
        let name = name.into();
        let mut transports = self.transports.write().unwrap();
        transports.insert(name, factory);
    }

    /// Create an ad server from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn AdServer>)`: created server instance
    /// - `Err(Error)`: unknown server type, or creation failed
    pub fn create_ad_server(&self, config: &AdServerConfig) -> Result<Arc<dyn AdServer>> {
        config.validate()?;

        if let AdServerConfig::Canned = config {
            return Ok(Arc::new(CannedAdServer::new()));
        }

        let server_type = config.type_name();
        let servers = self.ad_servers.read().unwrap();

        let factory = servers
            .get(server_type)
            .ok_or_else(|| Error::config(format!("Unknown ad server type: {server_type}")))?;

        factory.create(config)
    }

    /// Create an analytics transport from configuration
    pub fn create_transport(&self, config: &TransportConfig) -> Result<Arc<dyn AnalyticsTransport>> {
        config.validate()?;

        let transport_type = config.type_name();
        let transports = self.transports.read().unwrap();

        let factory = transports
            .get(transport_type)
            .ok_or_else(|| Error::config(format!("Unknown transport type: {transport_type}")))?;

        factory.create(config)
    }

    /// List all registered ad server types
    pub fn list_ad_servers(&self) -> Vec<String> {
        let servers = self.ad_servers.read().unwrap();
        servers.keys().cloned().collect()
    }

    /// List all registered transport types
    pub fn list_transports(&self) -> Vec<String> {
        let transports = self.transports.read().unwrap();
        transports.keys().cloned().collect()
    }

    /// Check if an ad server type is registered
    pub fn has_ad_server(&self, name: &str) -> bool {
        let servers = self.ad_servers.read().unwrap();
        servers.contains_key(name)
    }

    /// Check if a transport type is registered
    pub fn has_transport(&self, name: &str) -> bool {
        let transports = self.transports.read().unwrap();
        transports.contains_key(name)
    }
}
