//! Per-connection subscription manager.
//!
//! Tracks which vehicle ids a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::VehicleId;

/// Manages the set of vehicle subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed vehicle ids. If `subscribe_all` is true, this set is ignored.
    vehicle_ids: HashSet<VehicleId>,
    /// Whether the client subscribes to all vehicles (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds vehicle ids to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, ids: &[VehicleId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for id in ids {
            self.vehicle_ids.insert(id.clone());
        }
    }

    /// Removes vehicle ids from the subscription set.
    pub fn unsubscribe(&mut self, ids: &[VehicleId]) {
        for id in ids {
            self.vehicle_ids.remove(id);
        }
    }

    /// Returns `true` if an event scoped to the given vehicle should be
    /// delivered. Fleet-wide events (`None`) are delivered to every
    /// connection.
    #[must_use]
    pub fn matches(&self, vehicle_id: Option<&VehicleId>) -> bool {
        match vehicle_id {
            None => true,
            Some(id) => self.subscribe_all || self.vehicle_ids.contains(id),
        }
    }

    /// Returns the number of explicitly subscribed vehicle ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.vehicle_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_no_vehicle() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(Some(&VehicleId::from("VLM1"))));
    }

    #[test]
    fn fleet_wide_events_always_match() {
        let mgr = SubscriptionManager::new();
        assert!(mgr.matches(None));
    }

    #[test]
    fn subscribe_specific_vehicle() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[VehicleId::from("VLM1")], false);
        assert!(mgr.matches(Some(&VehicleId::from("VLM1"))));
        assert!(!mgr.matches(Some(&VehicleId::from("UMH1"))));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(Some(&VehicleId::from("VLM1"))));
        assert!(mgr.matches(Some(&VehicleId::from("UMHTIB"))));
    }

    #[test]
    fn unsubscribe_removes_vehicle() {
        let mut mgr = SubscriptionManager::new();
        let id = VehicleId::from("UMH2");
        mgr.subscribe(std::slice::from_ref(&id), false);
        assert!(mgr.matches(Some(&id)));
        mgr.unsubscribe(std::slice::from_ref(&id));
        assert!(!mgr.matches(Some(&id)));
    }

    #[test]
    fn count_tracks_explicit() {
        let mut mgr = SubscriptionManager::new();
        assert_eq!(mgr.count(), 0);
        mgr.subscribe(&[VehicleId::from("VLM1"), VehicleId::from("VLM2")], false);
        assert_eq!(mgr.count(), 2);
    }
}
