//! Maps receiver status snapshots onto named channel values.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::channels::{
    CHANNEL_APP_ID, CHANNEL_APP_NAME, CHANNEL_CONTROL, CHANNEL_CURRENT_TIME, CHANNEL_DURATION,
    CHANNEL_IDLING, CHANNEL_IMAGE, CHANNEL_IMAGE_SRC, CHANNEL_LOCATION, CHANNEL_METADATA_TYPE,
    CHANNEL_MUTE, CHANNEL_STATUS_TEXT, CHANNEL_VOLUME, ChannelValue, GeoPoint, IMAGE_URL_FIELD,
    IMAGES_METADATA_KEY, LOCATION_METADATA_LATITUDE, LOCATION_METADATA_LONGITUDE,
    METADATA_SIMPLE_CHANNELS, PlayPauseCommand, is_date_channel,
};
use crate::fetch::ImageFetcher;
use crate::model::{
    DeviceStatus, Media, MediaStatus, MetadataType, MetadataValue, PlayerState,
    RunningApplication, Volume,
};
use crate::sink::{Connectivity, StateSink};

/// Sentinel for "no volume cached yet" in the atomic slot.
const VOLUME_UNSET: u16 = u16::MAX;

/// Mutable mapper state surviving between updates of one device session.
#[derive(Debug, Default)]
struct SessionCache {
    /// Session id of the tracked application. Authoritative only while the
    /// receiver reports a running application; cleared otherwise.
    app_session_id: Option<String>,
    /// Last image source pushed downstream; identical sources are
    /// suppressed, including the "no image" source.
    image_src: Option<String>,
}

impl SessionCache {
    fn new() -> Self {
        Self::default()
    }
}

/// Translates receiver status snapshots into channel updates.
///
/// This doesn't query anything — it parses the snapshots handed in by the
/// session layer and pushes the derived values into the sink. Between
/// calls it keeps the last volume percentage, the app session id and the
/// last image source.
///
/// Every entry point runs synchronously to completion on the caller's
/// thread. The design assumes a single in-flight call from the message
/// path; only [`CastStatusUpdater::volume`] is meant for concurrent reads.
pub struct CastStatusUpdater {
    sink: Arc<dyn StateSink>,
    fetcher: Arc<dyn ImageFetcher>,
    cache: Mutex<SessionCache>,
    /// Last published volume percentage. Atomic so the accessor can run
    /// concurrently with the notification path without torn reads.
    volume: AtomicU16,
}

impl CastStatusUpdater {
    pub fn new(sink: Arc<dyn StateSink>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            sink,
            fetcher,
            cache: Mutex::new(SessionCache::new()),
            volume: AtomicU16::new(VOLUME_UNSET),
        }
    }

    /// Last cached volume percentage, if any volume snapshot was seen.
    pub fn volume(&self) -> Option<u8> {
        match self.volume.load(Ordering::Acquire) {
            VOLUME_UNSET => None,
            value => Some(value as u8),
        }
    }

    /// Session id of the application we started media on, if any.
    pub fn app_session_id(&self) -> Option<String> {
        self.cache.lock().unwrap().app_session_id.clone()
    }

    /// Records the session id of an application we launched media on.
    pub fn set_app_session_id(&self, session_id: Option<String>) {
        self.cache.lock().unwrap().app_session_id = session_id;
    }

    /// Publishes the overall connectivity without touching any channel.
    pub fn set_connectivity(&self, connectivity: Connectivity) {
        self.sink.set_connectivity(connectivity);
    }

    /// Processes a top-level device status snapshot, or its absence.
    pub fn process_status(&self, status: Option<&DeviceStatus>) {
        let Some(status) = status else {
            self.sink.set_connectivity(Connectivity::Offline);
            self.update_app_status(None);
            self.update_volume_status(None);
            return;
        };

        if !status.has_applications() {
            self.cache.lock().unwrap().app_session_id = None;
        }

        self.sink.set_connectivity(Connectivity::Online);
        self.update_app_status(status.running_app());
        self.update_volume_status(status.volume.as_ref());
    }

    /// Projects the running application onto the four app channels.
    ///
    /// All four are re-emitted on every call; with no application running
    /// the receiver shows its idle screen, hence the idling default.
    pub fn update_app_status(&self, application: Option<&RunningApplication>) {
        let mut name = ChannelValue::Undefined;
        let mut id = ChannelValue::Undefined;
        let mut status_text = ChannelValue::Undefined;
        let mut idling = ChannelValue::Switch(true);

        if let Some(application) = application {
            name = text_or_undefined(application.name.clone());
            id = text_or_undefined(application.app_id.clone());
            status_text = text_or_undefined(application.status_text.clone());
            idling = ChannelValue::Switch(application.is_idle_screen);
        }

        self.sink.update_channel(CHANNEL_APP_NAME, name);
        self.sink.update_channel(CHANNEL_APP_ID, id);
        self.sink.update_channel(CHANNEL_STATUS_TEXT, status_text);
        self.sink.update_channel(CHANNEL_IDLING, idling);
    }

    /// Projects the device volume; a missing volume snapshot is a no-op,
    /// not a reset.
    pub fn update_volume_status(&self, volume: Option<&Volume>) {
        let Some(volume) = volume else {
            return;
        };

        let percent = ((volume.level * 100.0).round() as i32).clamp(0, 100) as u8;
        self.volume.store(percent as u16, Ordering::Release);

        self.sink
            .update_channel(CHANNEL_VOLUME, ChannelValue::Percent(percent));
        self.sink
            .update_channel(CHANNEL_MUTE, ChannelValue::Switch(volume.muted));
    }

    /// Processes a playback snapshot, or its absence.
    pub fn update_media_status(&self, media_status: Option<&MediaStatus>) {
        debug!("Media status: {:?}", media_status);

        // In between tracks the receiver reports nothing at all.
        let Some(media_status) = media_status else {
            self.sink
                .update_channel(CHANNEL_CURRENT_TIME, ChannelValue::Undefined);
            self.update_media_info(None);
            return;
        };

        match &media_status.player_state {
            PlayerState::Idle => {}
            PlayerState::Paused => {
                self.sink.update_channel(
                    CHANNEL_CONTROL,
                    ChannelValue::Control(PlayPauseCommand::Pause),
                );
            }
            PlayerState::Buffering | PlayerState::Playing => {
                self.sink.update_channel(
                    CHANNEL_CONTROL,
                    ChannelValue::Control(PlayPauseCommand::Play),
                );
            }
            PlayerState::Unknown(raw) => {
                debug!("Unknown player state: {}", raw);
            }
        }

        self.sink.update_channel(
            CHANNEL_CURRENT_TIME,
            ChannelValue::Decimal(media_status.current_time),
        );

        // Playing, paused or buffering without a media payload is a
        // transient gap between tracks; keep whatever is already shown.
        if media_status.media.is_none() && media_status.player_state.is_active() {
            return;
        }

        self.update_media_info(media_status.media.as_ref());
    }

    fn update_media_info(&self, media: Option<&Media>) {
        let mut duration = ChannelValue::Undefined;
        let mut metadata_type = MetadataType::Generic;

        if let Some(media) = media {
            metadata_type = media.metadata_type;

            // duration stays null while the next track is being lined up.
            if let Some(seconds) = media.duration {
                duration = ChannelValue::Decimal(seconds);
            }
        }

        self.sink.update_channel(CHANNEL_DURATION, duration);
        self.sink.update_channel(
            CHANNEL_METADATA_TYPE,
            ChannelValue::Text(metadata_type.name().to_string()),
        );

        let empty = HashMap::new();
        let metadata = media
            .and_then(|media| media.metadata.as_ref())
            .unwrap_or(&empty);
        self.update_metadata(metadata);
    }

    fn update_metadata(&self, metadata: &HashMap<String, MetadataValue>) {
        self.update_location(metadata);
        self.update_image(metadata);

        for channel_id in self.sink.channel_ids() {
            if METADATA_SIMPLE_CHANNELS.contains(&channel_id.as_str()) {
                self.update_simple_channel(&channel_id, metadata);
            }
        }
    }

    /// Latitude and longitude combine into the single location channel.
    fn update_location(&self, metadata: &HashMap<String, MetadataValue>) {
        if !self.sink.is_observed(CHANNEL_LOCATION) {
            return;
        }

        let latitude = metadata
            .get(LOCATION_METADATA_LATITUDE)
            .and_then(MetadataValue::as_f64);
        let longitude = metadata
            .get(LOCATION_METADATA_LONGITUDE)
            .and_then(MetadataValue::as_f64);

        let value = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => ChannelValue::Location(GeoPoint {
                latitude,
                longitude,
            }),
            _ => ChannelValue::Undefined,
        };

        self.sink.update_channel(CHANNEL_LOCATION, value);
    }

    fn update_image(&self, metadata: &HashMap<String, MetadataValue>) {
        if !(self.sink.is_observed(CHANNEL_IMAGE) || self.sink.is_observed(CHANNEL_IMAGE_SRC)) {
            return;
        }

        // Channel name and metadata key don't match here.
        let image_src = metadata
            .get(IMAGES_METADATA_KEY)
            .and_then(MetadataValue::as_string_maps)
            .and_then(|images| {
                images
                    .iter()
                    .find_map(|image| image.get(IMAGE_URL_FIELD))
            })
            .cloned();

        {
            let mut cache = self.cache.lock().unwrap();
            // Same source as last time, nothing to re-publish or re-fetch.
            if cache.image_src == image_src {
                return;
            }
            cache.image_src = image_src.clone();
        }

        if self.sink.is_observed(CHANNEL_IMAGE_SRC) {
            self.sink
                .update_channel(CHANNEL_IMAGE_SRC, text_or_undefined(image_src.clone()));
        }

        if self.sink.is_observed(CHANNEL_IMAGE) {
            let value = match &image_src {
                Some(url) => self.fetch_image(url),
                None => ChannelValue::Undefined,
            };
            self.sink.update_channel(CHANNEL_IMAGE, value);
        }
    }

    fn fetch_image(&self, url: &str) -> ChannelValue {
        match self.fetcher.fetch(url) {
            Ok(content) => ChannelValue::Image(content),
            Err(err) => {
                warn!("Failed to fetch image at {}: {}", url, err);
                ChannelValue::Undefined
            }
        }
    }

    fn update_simple_channel(&self, channel_id: &str, metadata: &HashMap<String, MetadataValue>) {
        if !self.sink.is_observed(channel_id) {
            return;
        }

        let value = self.metadata_value(channel_id, metadata);
        let state = coerce(channel_id, value.as_ref());
        self.sink.update_channel(channel_id, state);
    }

    /// Looks up the metadata value backing a channel. The metadata key is
    /// the channel identifier itself; the three date channels carry an
    /// ISO-8601 instant string that becomes a local timestamp here.
    fn metadata_value(
        &self,
        channel_id: &str,
        metadata: &HashMap<String, MetadataValue>,
    ) -> Option<MetadataValue> {
        let value = metadata.get(channel_id)?;

        if !is_date_channel(channel_id) {
            return Some(value.clone());
        }

        let MetadataValue::Text(raw) = value else {
            warn!(
                "Channel {}: expected a date string, got {}",
                channel_id,
                value.kind()
            );
            return None;
        };

        match DateTime::parse_from_rfc3339(raw) {
            Ok(instant) => Some(MetadataValue::Timestamp(instant.with_timezone(&Local))),
            Err(err) => {
                warn!("Channel {}: unparsable date {:?}: {}", channel_id, raw, err);
                None
            }
        }
    }
}

fn text_or_undefined(value: Option<String>) -> ChannelValue {
    value.map_or(ChannelValue::Undefined, ChannelValue::Text)
}

/// Coerces an untyped metadata value into a typed channel state.
///
/// Total over its input; an unsupported kind degrades to undefined with a
/// diagnostic naming the channel.
pub fn coerce(channel_id: &str, value: Option<&MetadataValue>) -> ChannelValue {
    match value {
        None => ChannelValue::Undefined,
        Some(MetadataValue::Float(number)) => ChannelValue::Decimal(*number),
        // Integers share the decimal representation downstream.
        Some(MetadataValue::Integer(number)) => ChannelValue::Decimal(*number as f64),
        Some(MetadataValue::Text(text)) => ChannelValue::Text(text.clone()),
        Some(MetadataValue::Timestamp(instant)) => ChannelValue::DateTime(*instant),
        Some(other) => {
            warn!(
                "Channel {}: unsupported value kind {}",
                channel_id,
                other.kind()
            );
            ChannelValue::Undefined
        }
    }
}
