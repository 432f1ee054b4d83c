//! Receiver-side snapshot types.
//!
//! These mirror the JSON payloads a cast receiver pushes over its session:
//! a device status (running applications, volume) and a media status
//! (player state, position, media item). Every snapshot is transient; the
//! mapper never retains one beyond a single call.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level device snapshot: running applications and device volume.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    #[serde(default)]
    pub applications: Option<Vec<RunningApplication>>,
    #[serde(default)]
    pub volume: Option<Volume>,
}

impl DeviceStatus {
    /// The application the receiver reports as active (first listed).
    pub fn running_app(&self) -> Option<&RunningApplication> {
        self.applications.as_ref().and_then(|apps| apps.first())
    }

    pub fn has_applications(&self) -> bool {
        self.applications
            .as_ref()
            .is_some_and(|apps| !apps.is_empty())
    }
}

/// One entry of the receiver's application list.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningApplication {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub is_idle_screen: bool,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Device volume: fractional level plus mute flag.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// 0.0 to 1.0.
    pub level: f32,
    #[serde(default)]
    pub muted: bool,
}

/// Playback snapshot for the current media session.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStatus {
    pub player_state: PlayerState,
    /// Playback position in seconds.
    #[serde(default)]
    pub current_time: f64,
    #[serde(default)]
    pub media: Option<Media>,
}

/// Player state reported by the receiver.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PlayerState {
    Idle,
    Buffering,
    Paused,
    Playing,
    /// Receiver-specific or unrecognized state string.
    Unknown(String),
}

impl From<String> for PlayerState {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "IDLE" => PlayerState::Idle,
            "BUFFERING" => PlayerState::Buffering,
            "PAUSED" => PlayerState::Paused,
            "PLAYING" => PlayerState::Playing,
            _ => PlayerState::Unknown(raw),
        }
    }
}

impl PlayerState {
    pub fn as_str(&self) -> &str {
        match self {
            PlayerState::Idle => "IDLE",
            PlayerState::Buffering => "BUFFERING",
            PlayerState::Paused => "PAUSED",
            PlayerState::Playing => "PLAYING",
            PlayerState::Unknown(raw) => raw.as_str(),
        }
    }

    /// True while a media session is underway (playing, paused, buffering).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PlayerState::Playing | PlayerState::Paused | PlayerState::Buffering
        )
    }
}

/// Media item carried by a playback snapshot.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Track length in seconds. Null while the receiver lines up the next
    /// track; that is a valid transient state, not an error.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub metadata_type: MetadataType,
    /// Free-form key/value payload describing the item.
    #[serde(default)]
    pub metadata: Option<HashMap<String, MetadataValue>>,
}

/// Metadata category of a media item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum MetadataType {
    #[default]
    Generic,
    Movie,
    TvShow,
    MusicTrack,
    Photo,
}

impl From<u8> for MetadataType {
    fn from(raw: u8) -> Self {
        match raw {
            1 => MetadataType::Movie,
            2 => MetadataType::TvShow,
            3 => MetadataType::MusicTrack,
            4 => MetadataType::Photo,
            _ => MetadataType::Generic,
        }
    }
}

impl MetadataType {
    /// Wire-compatible category label.
    pub fn name(&self) -> &'static str {
        match self {
            MetadataType::Generic => "GENERIC",
            MetadataType::Movie => "MOVIE",
            MetadataType::TvShow => "TV_SHOW",
            MetadataType::MusicTrack => "MUSIC_TRACK",
            MetadataType::Photo => "PHOTO",
        }
    }
}

/// Untyped metadata value, as a tagged variant.
///
/// `Timestamp` never arrives off the wire; the date-typed channels produce
/// it when they parse their ISO-8601 string. `Unsupported` is the explicit
/// branch for payloads the projection has no representation for.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum MetadataValue {
    Float(f64),
    Integer(i64),
    Text(String),
    /// List of string-keyed maps; the receiver uses this shape for images.
    List(Vec<HashMap<String, String>>),
    Timestamp(chrono::DateTime<chrono::Local>),
    Unsupported,
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    MetadataValue::Integer(integer)
                } else if let Some(float) = number.as_f64() {
                    MetadataValue::Float(float)
                } else {
                    MetadataValue::Unsupported
                }
            }
            Value::String(text) => MetadataValue::Text(text),
            Value::Array(items) => {
                let mut maps = Vec::with_capacity(items.len());
                for item in items {
                    let Value::Object(entries) = item else {
                        return MetadataValue::Unsupported;
                    };
                    // Only string fields survive; that is all the image
                    // entries carry that we consume.
                    let map = entries
                        .into_iter()
                        .filter_map(|(key, value)| match value {
                            Value::String(text) => Some((key, text)),
                            _ => None,
                        })
                        .collect();
                    maps.push(map);
                }
                MetadataValue::List(maps)
            }
            _ => MetadataValue::Unsupported,
        }
    }
}

impl MetadataValue {
    /// Numeric view, promoting integers to the float representation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(number) => Some(*number),
            MetadataValue::Integer(number) => Some(*number as f64),
            _ => None,
        }
    }

    pub fn as_string_maps(&self) -> Option<&[HashMap<String, String>]> {
        match self {
            MetadataValue::List(maps) => Some(maps),
            _ => None,
        }
    }

    /// Kind label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataValue::Float(_) => "float",
            MetadataValue::Integer(_) => "integer",
            MetadataValue::Text(_) => "string",
            MetadataValue::List(_) => "list",
            MetadataValue::Timestamp(_) => "date-time",
            MetadataValue::Unsupported => "unsupported",
        }
    }
}
