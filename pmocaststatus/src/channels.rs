//! Channel identifiers and the typed channel state values.

use chrono::{DateTime, Local};

use crate::fetch::ImageContent;

// Application channels.
pub const CHANNEL_APP_NAME: &str = "app-name";
pub const CHANNEL_APP_ID: &str = "app-id";
pub const CHANNEL_STATUS_TEXT: &str = "app-status-text";
pub const CHANNEL_IDLING: &str = "app-idling";

// Volume channels.
pub const CHANNEL_VOLUME: &str = "volume-level";
pub const CHANNEL_MUTE: &str = "mute";

// Playback channels.
pub const CHANNEL_CONTROL: &str = "playback-control";
pub const CHANNEL_CURRENT_TIME: &str = "playback-position";
pub const CHANNEL_DURATION: &str = "duration";
pub const CHANNEL_METADATA_TYPE: &str = "metadata-type";

// Metadata channels with dedicated handling.
pub const CHANNEL_LOCATION: &str = "location";
pub const CHANNEL_IMAGE_SRC: &str = "image-source";
pub const CHANNEL_IMAGE: &str = "image";
pub const CHANNEL_BROADCAST_DATE: &str = "broadcast-date";
pub const CHANNEL_RELEASE_DATE: &str = "release-date";
pub const CHANNEL_CREATION_DATE: &str = "creation-date";

// Metadata keys whose name differs from the channel they feed.
pub const LOCATION_METADATA_LATITUDE: &str = "latitude";
pub const LOCATION_METADATA_LONGITUDE: &str = "longitude";
pub const IMAGES_METADATA_KEY: &str = "images";
pub const IMAGE_URL_FIELD: &str = "url";

/// Canaux projetés 1:1 depuis la clé de métadonnée du même nom.
///
/// The mapper intersects this set with the channel list the sink exposes;
/// everything else in the metadata payload is ignored.
pub const METADATA_SIMPLE_CHANNELS: &[&str] = &[
    "album-artist",
    "album-name",
    "artist",
    CHANNEL_BROADCAST_DATE,
    "composer",
    CHANNEL_CREATION_DATE,
    "disc-number",
    "episode-number",
    "location-name",
    CHANNEL_RELEASE_DATE,
    "season-number",
    "series-title",
    "studio",
    "subtitle",
    "title",
    "track-number",
];

/// Channels whose metadata value is an ISO-8601 instant string.
pub fn is_date_channel(channel_id: &str) -> bool {
    matches!(
        channel_id,
        CHANNEL_BROADCAST_DATE | CHANNEL_RELEASE_DATE | CHANNEL_CREATION_DATE
    )
}

/// Typed state value published to a channel.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelValue {
    /// No usable value; clears whatever the channel showed before.
    Undefined,
    Decimal(f64),
    /// Integer percentage, 0 to 100.
    Percent(u8),
    Text(String),
    Switch(bool),
    DateTime(DateTime<Local>),
    Location(GeoPoint),
    Control(PlayPauseCommand),
    Image(ImageContent),
}

/// Combined latitude/longitude value for the location channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Control signal implied by the player state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayPauseCommand {
    Play,
    Pause,
}
