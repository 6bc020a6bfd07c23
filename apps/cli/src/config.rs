//! CLI configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use sonos_queue_core::protocol_constants::{
    DEFAULT_DISCOVERY_ATTEMPTS, DEFAULT_DISCOVERY_BACKOFF_MS, DEFAULT_DISCOVERY_TIMEOUT_MS,
    DEFAULT_PLAYLIST_PAGE_SIZE, DEFAULT_QUEUE_PAGE_SIZE,
};
use sonos_queue_core::sonos::discovery::static_speakers;
use sonos_queue_core::{CollectOptions, DiscoveryConfig, LocatorConfig, QueueError, TotalPolicy};

/// CLI configuration loaded from YAML with environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Static speaker IPs; SSDP is skipped when any are given.
    /// Override: `SONOS_QUEUE_SPEAKERS` (comma-separated)
    pub speakers: Vec<String>,

    /// Discovery attempts before giving up.
    /// Override: `SONOS_QUEUE_DISCOVERY_ATTEMPTS`
    pub discovery_attempts: u32,

    /// Wait between discovery attempts, in milliseconds.
    pub discovery_backoff_ms: u64,

    /// SSDP listening window per attempt, in milliseconds.
    pub discovery_timeout_ms: u64,

    /// Fall back to SSDP broadcast when multicast finds nothing.
    pub ssdp_broadcast_fallback: bool,

    /// Page size for queue retrieval.
    /// Override: `SONOS_QUEUE_QUEUE_PAGE_SIZE`
    pub queue_page_size: u32,

    /// Page size for playlist retrieval.
    /// Override: `SONOS_QUEUE_PLAYLIST_PAGE_SIZE`
    pub playlist_page_size: u32,

    /// Fail when a device delivers more entries than it announced.
    pub strict_totals: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            speakers: Vec::new(),
            discovery_attempts: DEFAULT_DISCOVERY_ATTEMPTS,
            discovery_backoff_ms: DEFAULT_DISCOVERY_BACKOFF_MS,
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            ssdp_broadcast_fallback: true,
            queue_page_size: DEFAULT_QUEUE_PAGE_SIZE,
            playlist_page_size: DEFAULT_PLAYLIST_PAGE_SIZE,
            strict_totals: true,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`; unparsable values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SONOS_QUEUE_SPEAKERS") {
            self.speakers = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(val) = lookup("SONOS_QUEUE_DISCOVERY_ATTEMPTS") {
            if let Ok(attempts) = val.trim().parse() {
                self.discovery_attempts = attempts;
            }
        }

        if let Some(val) = lookup("SONOS_QUEUE_QUEUE_PAGE_SIZE") {
            if let Ok(size) = val.trim().parse() {
                self.queue_page_size = size;
            }
        }

        if let Some(val) = lookup("SONOS_QUEUE_PLAYLIST_PAGE_SIZE") {
            if let Ok(size) = val.trim().parse() {
                self.playlist_page_size = size;
            }
        }
    }

    /// Discovery settings for the core library.
    ///
    /// Static speaker addresses are checked here so that a typo fails at
    /// once instead of being retried as an unanswered discovery.
    pub fn discovery_config(&self) -> Result<DiscoveryConfig, QueueError> {
        static_speakers(&self.speakers).map_err(|e| QueueError::Configuration(e.to_string()))?;
        Ok(DiscoveryConfig {
            static_speakers: self.speakers.clone(),
            timeout: Duration::from_millis(self.discovery_timeout_ms),
            broadcast_fallback: self.ssdp_broadcast_fallback,
        })
    }

    pub fn locator_config(&self) -> LocatorConfig {
        LocatorConfig {
            attempts: self.discovery_attempts,
            backoff: Duration::from_millis(self.discovery_backoff_ms),
        }
    }

    /// Collector options for the given page size.
    pub fn collect_options(&self, page_size: u32) -> CollectOptions {
        CollectOptions {
            page_size,
            total_policy: if self.strict_totals {
                TotalPolicy::Strict
            } else {
                TotalPolicy::Lenient
            },
            ..CollectOptions::default()
        }
    }
}
