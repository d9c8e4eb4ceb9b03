//! Astro Jump headless runner
//!
//! Plays one session with a simple autopilot standing in for the
//! accelerometer, stores the result and prints the final frame as JSON.
//!
//! Usage: `astro-jump [records.json] [seed]`

use std::path::{Path, PathBuf};

use glam::Vec2;

use astro_jump::assets::SpriteKind;
use astro_jump::input::{AccelSample, TiltInput};
use astro_jump::persistence::{JsonFileStore, RecordWriter};
use astro_jump::sim::{FrameSnapshot, Playfield};
use astro_jump::{Session, Settings, SpriteAtlas, SystemClock};

/// Frame time of the host display
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many frames (10 minutes of play)
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn main() {
    env_logger::init();
    log::info!("Astro Jump (headless) starting...");

    let mut args = std::env::args().skip(1);
    let records_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("astro_jump_records.json"));
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    let settings = Settings::load_from(Path::new("astro_jump_settings.json"));

    let mut atlas = SpriteAtlas::default();
    atlas.set(SpriteKind::Player, Some(Vec2::new(96.0, 128.0)));
    atlas.set(SpriteKind::GoodItem, Some(Vec2::new(64.0, 64.0)));
    atlas.set(SpriteKind::BadItem, Some(Vec2::new(72.0, 48.0)));

    let writer = RecordWriter::spawn(JsonFileStore::new(&records_path));
    let mut session = Session::start(
        seed,
        Playfield::new(1080.0, 2220.0),
        atlas,
        settings.clone(),
        writer,
        SystemClock,
    );
    let mut sensor = TiltInput::new(settings.tilt_filter(), session.tilt_latch());

    let mut frames = 0;
    while session.is_running() && frames < MAX_FRAMES {
        let snapshot = session.snapshot();
        sensor.on_sample(AccelSample::new(autopilot(&snapshot), 9.8, 0.0));
        session.advance(FRAME_DT);
        for event in session.drain_ui_events() {
            log::info!("UI event: {:?}", event);
        }
        frames += 1;
    }
    session.stop();

    match serde_json::to_string_pretty(session.snapshot().as_ref()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Snapshot not serializable: {}", e),
    }
    println!("Sessions on record: {}", session.history().len());
    session.shutdown();
}

/// Raw x reading that steers toward the lowest good item.
/// Device x is reversed relative to screen x.
fn autopilot(snapshot: &FrameSnapshot) -> f32 {
    let player = snapshot
        .sprites
        .iter()
        .find(|s| s.kind == SpriteKind::Player);
    let target = snapshot
        .sprites
        .iter()
        .filter(|s| s.kind == SpriteKind::GoodItem)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    match (player, target) {
        (Some(p), Some(t)) => (-(t.pos.x - p.pos.x) / 100.0).clamp(-3.0, 3.0),
        _ => 0.0,
    }
}
