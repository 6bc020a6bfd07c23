//! Selection of operable target devices from an unreliable discovery source.
//!
//! Discovery on a local network can come back empty for no reason other
//! than timing. The locator retries only that case: once any devices are
//! reported, it filters them and returns, even if nothing matches.

use std::time::Duration;

use async_trait::async_trait;

use crate::protocol_constants::{DEFAULT_DISCOVERY_ATTEMPTS, DEFAULT_DISCOVERY_BACKOFF_MS};
use crate::sonos::types::{Device, DeviceRole};

/// What a filter may inspect about a device.
pub trait DeviceCapabilities {
    fn role(&self) -> DeviceRole;

    /// Queue length, when it has been probed.
    fn queue_depth(&self) -> Option<u32>;
}

impl DeviceCapabilities for Device {
    fn role(&self) -> DeviceRole {
        self.role
    }

    fn queue_depth(&self) -> Option<u32> {
        self.queue_depth
    }
}

/// Predicate over [`DeviceCapabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceFilter {
    /// Keep only group coordinators.
    pub coordinators_only: bool,
    /// Keep only devices known to have at least one queued track.
    pub require_queue: bool,
}

impl DeviceFilter {
    /// Matches every device.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn coordinators() -> Self {
        Self {
            coordinators_only: true,
            require_queue: false,
        }
    }

    /// Coordinators whose probed queue is non-empty.
    #[must_use]
    pub fn coordinators_with_queue() -> Self {
        Self {
            coordinators_only: true,
            require_queue: true,
        }
    }

    pub fn matches<D: DeviceCapabilities + ?Sized>(&self, device: &D) -> bool {
        if self.coordinators_only && device.role() != DeviceRole::Coordinator {
            return false;
        }
        if self.require_queue && device.queue_depth().unwrap_or(0) == 0 {
            return false;
        }
        true
    }
}

/// A source of device sets.
///
/// `None` means discovery got no answer this time; implementations map
/// their own transport errors to `None`.
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    type Device: DeviceCapabilities + Clone + Send + Sync;

    async fn discover(&self) -> Option<Vec<Self::Device>>;
}

/// Retry budget for [`CoordinatorLocator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Maximum discovery calls. Values below 1 are treated as 1.
    pub attempts: u32,
    /// Fixed wait between consecutive calls.
    pub backoff: Duration,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_DISCOVERY_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_DISCOVERY_BACKOFF_MS),
        }
    }
}

/// Outcome of [`CoordinatorLocator::locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<D> {
    /// Every device from the first non-empty discovery, in discovery order.
    /// `None` if every attempt came back empty.
    pub devices: Option<Vec<D>>,
    /// The subset of `devices` matching the filter, in the same order.
    pub candidates: Vec<D>,
}

impl<D> Located<D> {
    /// The first candidate, if any.
    pub fn first(&self) -> Option<&D> {
        self.candidates.first()
    }

    /// True if discovery got no answer at all.
    pub fn nothing_discovered(&self) -> bool {
        self.devices.is_none()
    }
}

/// Bounded-retry discovery plus filtering.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorLocator {
    config: LocatorConfig,
}

impl CoordinatorLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Discovers devices and returns those matching `filter`.
    ///
    /// Calls `discovery` up to `attempts` times, sleeping `backoff` between
    /// calls, until it reports a non-empty set. The filter is applied once
    /// to that set; an empty match does not cause another attempt.
    ///
    /// Never fails: "nothing found" is `devices == None` with no candidates.
    pub async fn locate<S>(&self, discovery: &S, filter: DeviceFilter) -> Located<S::Device>
    where
        S: DeviceDiscovery + ?Sized,
    {
        let attempts = self.config.attempts.max(1);

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.config.backoff).await;
            }

            match discovery.discover().await {
                Some(devices) if !devices.is_empty() => {
                    let candidates: Vec<_> = devices
                        .iter()
                        .filter(|d| filter.matches(*d))
                        .cloned()
                        .collect();
                    log::debug!(
                        "[Locator] Attempt {}: {} device(s), {} candidate(s)",
                        attempt,
                        devices.len(),
                        candidates.len()
                    );
                    return Located {
                        devices: Some(devices),
                        candidates,
                    };
                }
                _ => {
                    log::debug!(
                        "[Locator] Attempt {}/{}: no devices discovered",
                        attempt,
                        attempts
                    );
                }
            }
        }

        log::warn!("[Locator] No devices discovered after {} attempt(s)", attempts);
        Located {
            devices: None,
            candidates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Stub {
        name: &'static str,
        role: DeviceRole,
        queue: Option<u32>,
    }

    impl DeviceCapabilities for Stub {
        fn role(&self) -> DeviceRole {
            self.role
        }

        fn queue_depth(&self) -> Option<u32> {
            self.queue
        }
    }

    fn coordinator(name: &'static str, queue: Option<u32>) -> Stub {
        Stub {
            name,
            role: DeviceRole::Coordinator,
            queue,
        }
    }

    fn member(name: &'static str) -> Stub {
        Stub {
            name,
            role: DeviceRole::Member,
            queue: None,
        }
    }

    /// Replays scripted discovery results; absent once the script runs out.
    struct ScriptedDiscovery {
        script: Mutex<VecDeque<Option<Vec<Stub>>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedDiscovery {
        fn new(script: Vec<Option<Vec<Stub>>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl DeviceDiscovery for ScriptedDiscovery {
        type Device = Stub;

        async fn discover(&self) -> Option<Vec<Stub>> {
            *self.calls.lock().unwrap() += 1;
            self.script.lock().unwrap().pop_front().flatten()
        }
    }

    fn names(devices: &[Stub]) -> Vec<&'static str> {
        devices.iter().map(|d| d.name).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_discovery_answers() {
        let devices = vec![member("Kitchen"), coordinator("Office", Some(3))];
        let discovery = ScriptedDiscovery::new(vec![None, None, Some(devices.clone())]);

        let started = Instant::now();
        let located = CoordinatorLocator::default()
            .locate(&discovery, DeviceFilter::coordinators())
            .await;

        assert_eq!(located.devices, Some(devices));
        assert_eq!(names(&located.candidates), vec!["Office"]);
        assert_eq!(discovery.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_all_attempts() {
        let discovery = ScriptedDiscovery::new(vec![]);

        let started = Instant::now();
        let located = CoordinatorLocator::default()
            .locate(&discovery, DeviceFilter::any())
            .await;

        assert!(located.nothing_discovered());
        assert!(located.candidates.is_empty());
        assert_eq!(discovery.calls(), 5);
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn filter_mismatch_does_not_retry() {
        let discovery = ScriptedDiscovery::new(vec![
            Some(vec![member("Kitchen"), member("Bedroom")]),
            Some(vec![coordinator("Office", Some(1))]),
        ]);

        let started = Instant::now();
        let located = CoordinatorLocator::default()
            .locate(&discovery, DeviceFilter::coordinators())
            .await;

        assert_eq!(located.devices.as_ref().map(Vec::len), Some(2));
        assert!(located.candidates.is_empty());
        assert!(located.first().is_none());
        assert_eq!(discovery.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_device_set_counts_as_absent() {
        let discovery = ScriptedDiscovery::new(vec![
            Some(vec![]),
            Some(vec![coordinator("Office", None)]),
        ]);

        let located = CoordinatorLocator::default()
            .locate(&discovery, DeviceFilter::any())
            .await;

        assert_eq!(names(&located.candidates), vec!["Office"]);
        assert_eq!(discovery.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn candidates_keep_discovery_order() {
        let discovery = ScriptedDiscovery::new(vec![Some(vec![
            coordinator("Patio", Some(0)),
            member("Kitchen"),
            coordinator("Den", Some(12)),
            coordinator("Office", Some(4)),
        ])]);

        let locator = CoordinatorLocator::default();
        let with_queue = locator
            .locate(&discovery, DeviceFilter::coordinators_with_queue())
            .await;
        assert_eq!(names(&with_queue.candidates), vec!["Den", "Office"]);
        assert_eq!(with_queue.first().map(|d| d.name), Some("Den"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let discovery = ScriptedDiscovery::new(vec![Some(vec![member("Kitchen")])]);
        let locator = CoordinatorLocator::new(LocatorConfig {
            attempts: 0,
            backoff: Duration::from_secs(1),
        });

        let located = locator.locate(&discovery, DeviceFilter::any()).await;
        assert_eq!(discovery.calls(), 1);
        assert_eq!(located.candidates.len(), 1);
    }

    #[test]
    fn filter_on_devices() {
        let mut device = Device {
            uuid: "RINCON_1".into(),
            ip: "192.168.1.10".into(),
            zone_name: "Office".into(),
            group_id: "G1".into(),
            group_name: "Office".into(),
            group_label: "Office".into(),
            role: DeviceRole::Coordinator,
            queue_depth: None,
        };

        assert!(DeviceFilter::coordinators().matches(&device));
        assert!(!DeviceFilter::coordinators_with_queue().matches(&device));
        device.queue_depth = Some(7);
        assert!(DeviceFilter::coordinators_with_queue().matches(&device));
        device.role = DeviceRole::Member;
        assert!(!DeviceFilter::coordinators().matches(&device));
        assert!(DeviceFilter::any().matches(&device));
    }
}
