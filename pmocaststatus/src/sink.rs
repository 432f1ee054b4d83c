//! State sink capability.
//!
//! The mapper never talks to a host object directly; it is handed an
//! implementation of [`StateSink`] at construction and pushes every derived
//! value through it. The sink also answers which channels are currently
//! observed, so expensive derivations can be skipped.

use crate::channels::ChannelValue;

/// Overall connectivity of the device session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connectivity::Online => "ONLINE",
            Connectivity::Offline => "OFFLINE",
        }
    }
}

/// Outbound seam towards the state store.
pub trait StateSink: Send + Sync {
    /// Publishes the overall device connectivity.
    fn set_connectivity(&self, connectivity: Connectivity);

    /// Publishes a typed value for one channel.
    fn update_channel(&self, channel_id: &str, value: ChannelValue);

    /// Whether at least one subscriber currently observes the channel.
    fn is_observed(&self, channel_id: &str) -> bool;

    /// Every channel identifier bound to the owning entity.
    fn channel_ids(&self) -> Vec<String>;
}
