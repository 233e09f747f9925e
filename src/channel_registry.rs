// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A type-erased registry of broadcast channels, keyed by name.
//!
//! Collaborators that need to publish or subscribe to a named stream (raw
//! telemetry, resampled metrics, health status) look the channel up by key
//! instead of wiring it through constructor arguments. The first caller for
//! a given key creates the channel; every later caller gets a handle to the
//! same one.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;

/// Default capacity for channels created through this registry.
const DEFAULT_CAPACITY: usize = 1024;

/// A named registry of broadcast channels.
///
/// `name` prefixes every channel key, so that two registries (e.g. one per
/// microgrid instance) never collide even if given the same key.
pub struct ChannelRegistry {
    name: String,
    capacity: usize,
    senders: Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl ChannelRegistry {
    /// Creates a registry whose channels are named `"{name}-{key}"`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_CAPACITY)
    }

    /// Creates a registry with a non-default per-channel capacity.
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            senders: Mutex::new(HashMap::new()),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}-{}", self.name, key)
    }

    /// Returns the sender for `key`, creating the underlying channel on the
    /// first call for that key.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `key` was already registered with a
    /// different message type `T`.
    pub fn sender<T>(&self, key: &str) -> broadcast::Sender<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let full_key = self.full_key(key);
        let mut senders = self.senders.lock().expect("channel registry lock poisoned");

        let entry = senders.entry(full_key.clone()).or_insert_with(|| {
            let (tx, _rx) = broadcast::channel::<T>(self.capacity);
            Box::new(tx)
        });

        entry
            .downcast_ref::<broadcast::Sender<T>>()
            .unwrap_or_else(|| {
                panic!("channel `{full_key}` was already registered with a different message type")
            })
            .clone()
    }

    /// Returns a fresh receiver subscribed to `key`'s channel, creating the
    /// channel on the first call for that key.
    pub fn receiver<T>(&self, key: &str) -> broadcast::Receiver<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.sender::<T>(key).subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lazy_creation_shares_channel() {
        let registry = ChannelRegistry::new("microgrid-1");

        let tx = registry.sender::<u32>("soc");
        let mut rx1 = registry.receiver::<u32>("soc");
        let mut rx2 = registry.receiver::<u32>("soc");

        tx.send(42).unwrap();

        assert_eq!(rx1.recv().await.unwrap(), 42);
        assert_eq!(rx2.recv().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let registry = ChannelRegistry::new("microgrid-1");

        let soc_tx = registry.sender::<u32>("soc");
        let power_tx = registry.sender::<u32>("power");

        let mut soc_rx = registry.receiver::<u32>("soc");
        soc_tx.send(1).unwrap();
        power_tx.send(2).unwrap();

        assert_eq!(soc_rx.recv().await.unwrap(), 1);
    }

    #[test]
    #[should_panic(expected = "different message type")]
    fn test_type_mismatch_panics() {
        let registry = ChannelRegistry::new("microgrid-1");
        let _tx = registry.sender::<u32>("soc");
        let _tx2 = registry.sender::<String>("soc");
    }
}
