//! Feeds a few representative receiver snapshots through the mapper.
//!
//! The sink just prints every channel update, so this shows what a real
//! state store would receive for a typical cast session.
//!
//! Usage:
//!   cargo run --example status_demo

use std::collections::HashMap;
use std::sync::Arc;

use pmocaststatus::channels::METADATA_SIMPLE_CHANNELS;
use pmocaststatus::{
    CastStatusUpdater, ChannelValue, Connectivity, DeviceStatus, HttpImageFetcher, Media,
    MediaStatus, MetadataType, MetadataValue, PlayerState, RunningApplication, StateSink, Volume,
};

/// Prints everything the mapper derives.
struct PrintSink;

impl StateSink for PrintSink {
    fn set_connectivity(&self, connectivity: Connectivity) {
        println!("connectivity        -> {}", connectivity.as_str());
    }

    fn update_channel(&self, channel_id: &str, value: ChannelValue) {
        println!("{:<20}-> {:?}", channel_id, value);
    }

    fn is_observed(&self, _channel_id: &str) -> bool {
        true
    }

    fn channel_ids(&self) -> Vec<String> {
        METADATA_SIMPLE_CHANNELS
            .iter()
            .map(|id| id.to_string())
            .collect()
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let updater = CastStatusUpdater::new(Arc::new(PrintSink), Arc::new(HttpImageFetcher::new()));

    println!("── device comes online ──");
    let status = DeviceStatus {
        applications: Some(vec![RunningApplication {
            name: Some("Default Media Receiver".to_string()),
            app_id: Some("CC1AD845".to_string()),
            status_text: Some("Ready To Cast".to_string()),
            is_idle_screen: false,
            session_id: Some("7E2FF513-CDF6-9A91-2B28-3E3DE7BAC174".to_string()),
        }]),
        volume: Some(Volume {
            level: 0.37,
            muted: false,
        }),
    };
    updater.process_status(Some(&status));

    println!("── a track starts playing ──");
    let metadata = HashMap::from([
        (
            "title".to_string(),
            MetadataValue::Text("Clair de Lune".to_string()),
        ),
        (
            "artist".to_string(),
            MetadataValue::Text("Claude Debussy".to_string()),
        ),
        ("track-number".to_string(), MetadataValue::Integer(3)),
        (
            "release-date".to_string(),
            MetadataValue::Text("1905-01-01T00:00:00Z".to_string()),
        ),
    ]);
    let media_status = MediaStatus {
        player_state: PlayerState::Playing,
        current_time: 12.5,
        media: Some(Media {
            duration: Some(301.0),
            metadata_type: MetadataType::MusicTrack,
            metadata: Some(metadata),
        }),
    };
    updater.update_media_status(Some(&media_status));
    println!("cached volume: {:?}", updater.volume());

    println!("── receiver goes away ──");
    updater.process_status(None);
}
