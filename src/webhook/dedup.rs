use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::{DeliveryReceipt, InboundMessage};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Key identifying one logical delivery across redelivery attempts.
pub struct DedupKey(String);

impl DedupKey {
    /// Key an inbound message on its business fields.
    ///
    /// The gateway's per-attempt `id` is deliberately excluded: it is not
    /// guaranteed stable across redeliveries, so keying on it would defeat
    /// deduplication. Two distinct messages with identical sender,
    /// recipient, and content inside one retry window collapse into one —
    /// a documented assumption of this contract, not a gateway guarantee.
    pub fn for_message(message: &InboundMessage) -> Self {
        Self(format!(
            "mo\n{}\n{}\n{}",
            message.from.raw(),
            message.to.raw(),
            message.content
        ))
    }

    /// Key a delivery receipt on its stable id and reported status.
    pub fn for_receipt(receipt: &DeliveryReceipt) -> Self {
        Self(format!(
            "dlr\n{}\n{}",
            receipt.id.as_str(),
            receipt.message_status
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of claiming a key in the cache.
pub enum Claim {
    /// First sighting inside the window; the caller owns processing now.
    Fresh,
    /// Another delivery attempt of this key is currently being processed.
    InFlight,
    /// This key was already durably processed inside the window.
    Done,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    InFlight(Instant),
    Done(Instant),
}

impl Entry {
    fn stamp(self) -> Instant {
        match self {
            Self::InFlight(at) | Self::Done(at) => at,
        }
    }
}

#[derive(Debug)]
/// Windowed bookkeeping for redelivered callbacks.
///
/// Tracks, per [`DedupKey`], whether a delivery attempt is in flight or
/// already completed. Entries expire after the configured window, which
/// should cover the gateway's redelivery schedule. Expired entries are
/// pruned opportunistically on access; the lock is only held for map
/// operations, never across awaits.
pub struct DedupCache {
    window: Duration,
    entries: Mutex<HashMap<DedupKey, Entry>>,
}

impl DedupCache {
    /// Default retry window entries are remembered for.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(600);

    /// Create a cache remembering keys for `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Claim `key` for processing.
    ///
    /// Inserts an in-flight entry when the key is unseen (or expired) and
    /// returns [`Claim::Fresh`]; otherwise reports the existing state.
    pub fn claim(&self, key: &DedupKey) -> Claim {
        self.claim_at(key, Instant::now())
    }

    /// Mark `key` as durably processed.
    pub fn complete(&self, key: &DedupKey) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.clone(), Entry::Done(Instant::now()));
    }

    /// Release a claim after failed processing so a redelivery can retry.
    pub fn release(&self, key: &DedupKey) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
    }

    fn claim_at(&self, key: &DedupKey, now: Instant) -> Claim {
        let mut entries = self.entries.lock().unwrap();
        let window = self.window;
        entries.retain(|_, entry| now.duration_since(entry.stamp()) < window);

        match entries.get(key) {
            Some(Entry::Done(_)) => Claim::Done,
            Some(Entry::InFlight(_)) => Claim::InFlight,
            None => {
                entries.insert(key.clone(), Entry::InFlight(now));
                Claim::Fresh
            }
        }
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
