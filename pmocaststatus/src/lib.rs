//! Translates cast receiver status snapshots into typed, named channel
//! values for an external state sink.
//!
//! The session layer that produces the snapshots and the store that
//! consumes the channel values are both collaborators behind traits; this
//! crate only maps and normalizes, keeping just enough state (volume,
//! app session id, last image source) to avoid redundant downstream work.

pub mod channels;
pub mod fetch;
pub mod model;
pub mod sink;
pub mod status;

pub use channels::{ChannelValue, GeoPoint, PlayPauseCommand};
pub use fetch::{FetchError, HttpImageFetcher, ImageContent, ImageFetcher};
pub use model::{
    DeviceStatus, Media, MediaStatus, MetadataType, MetadataValue, PlayerState,
    RunningApplication, Volume,
};
pub use sink::{Connectivity, StateSink};
pub use status::{CastStatusUpdater, coerce};
