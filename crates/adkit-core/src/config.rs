//! Configuration types for the AdKit system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

use crate::ad::{AdSize, AdType};

/// Top-level SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Ad server configuration
    pub ad_server: AdServerConfig,

    /// Analytics transport configuration
    pub analytics: TransportConfig,

    /// Event tracker settings
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Ad units to create
    pub units: Vec<AdUnitConfig>,
}

impl SdkConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.units.is_empty() {
            return Err(crate::Error::config("No ad units configured"));
        }

        self.ad_server.validate()?;
        self.analytics.validate()?;
        self.tracker.validate()?;

        for unit in &self.units {
            unit.validate()?;
        }

        Ok(())
    }
}

/// Configuration for a single ad unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdUnitConfig {
    /// Size of ads loaded by this unit
    pub size: AdSize,

    /// Type of ads loaded by this unit
    #[serde(default = "default_ad_type")]
    pub ad_type: AdType,

    /// Whether the unit loads automatically on start and after each hide
    ///
    /// When false, the caller drives loading via `request_load()`.
    /// The `should_autoload` alias is accepted for callers migrating
    /// from the legacy dual-named property.
    #[serde(default = "default_autoload", alias = "should_autoload")]
    pub autoload: bool,

    /// Capacity of the unit's command channel
    ///
    /// Commands issued while the channel is full are rejected rather
    /// than queued without bound.
    #[serde(default = "default_command_channel_capacity")]
    pub command_channel_capacity: usize,
}

impl AdUnitConfig {
    /// Create a new unit configuration with defaults
    pub fn new(size: AdSize, ad_type: AdType) -> Self {
        Self {
            size,
            ad_type,
            autoload: default_autoload(),
            command_channel_capacity: default_command_channel_capacity(),
        }
    }

    /// Enable or disable autoload
    pub fn with_autoload(mut self, autoload: bool) -> Self {
        self.autoload = autoload;
        self
    }

    /// Validate the unit configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.command_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Unit command channel capacity must be > 0",
            ));
        }
        Ok(())
    }
}

/// Ad server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdServerConfig {
    /// In-process canned server (tests, demos, serverless deployments)
    Canned,

    /// Custom ad server
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl AdServerConfig {
    /// Validate the ad server configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            AdServerConfig::Canned => Ok(()),
            AdServerConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom ad server factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom ad server config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the server type name
    pub fn type_name(&self) -> &str {
        match self {
            AdServerConfig::Canned => "canned",
            AdServerConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for AdServerConfig {
    fn default() -> Self {
        AdServerConfig::Canned
    }
}

/// Analytics transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    /// HTTP transport posting event records as JSON
    Http {
        /// Endpoint URL to post records to
        endpoint: String,
        /// Optional bearer token
        api_key: Option<String>,
    },

    /// Custom transport
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl TransportConfig {
    /// Validate the transport configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            TransportConfig::Http { endpoint, .. } => {
                if endpoint.is_empty() {
                    return Err(crate::Error::config(
                        "HTTP transport endpoint cannot be empty",
                    ));
                }
                Ok(())
            }
            TransportConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom transport factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom transport config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the transport type name
    pub fn type_name(&self) -> &str {
        match self {
            TransportConfig::Http { .. } => "http",
            TransportConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Event tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Capacity of the internal event channel
    ///
    /// When full, new records are dropped with a warning log. Tracking
    /// is best-effort; this bounds memory under event storms.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl TrackerConfig {
    /// Validate the tracker configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Tracker event channel capacity must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_ad_type() -> AdType {
    AdType::Regular
}

fn default_autoload() -> bool {
    true
}

fn default_command_channel_capacity() -> usize {
    64
}

fn default_event_channel_capacity() -> usize {
    256
}
