//! Session driver
//!
//! Runs the fixed-step simulation from variable frame times, feeds it the
//! latest tilt reading, publishes a snapshot per frame and turns game-over into
//! its one-time side effects: a session record, a conditional high score
//! update (both on the record writer thread) and a `SessionEnded` UI event.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::assets::SpriteAtlas;
use crate::consts::*;
use crate::highscores::SessionRecord;
use crate::input::TiltLatch;
use crate::persistence::RecordWriter;
use crate::settings::Settings;
use crate::sim::{FrameSnapshot, GameEvent, GamePhase, GameState, Playfield, TickInput, tick};

/// Wall clock used to timestamp sessions
pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Discrete commands from UI buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiCommand {
    TogglePause,
    Pause,
    Resume,
    /// Abandon the session without recording it
    QuitToMenu,
}

/// Notifications for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiEvent {
    Paused,
    Resumed,
    /// The session is over; navigate to the game-over screen. Sent once per session.
    SessionEnded { score: u32, new_high_score: bool },
}

/// One play session plus everything around it
pub struct Session<C: Clock = SystemClock> {
    state: GameState,
    settings: Settings,
    tilt: Arc<TiltLatch>,
    /// Phase requested by UI commands since the last tick; the newest request wins
    requested_phase: Option<GamePhase>,
    accumulator: f32,
    records: RecordWriter,
    clock: C,
    high_score: u32,
    ui_events: Vec<UiEvent>,
    latest: Arc<FrameSnapshot>,
    running: bool,
}

impl<C: Clock> Session<C> {
    /// Start a fresh session
    pub fn start(
        seed: u64,
        playfield: Playfield,
        atlas: SpriteAtlas,
        settings: Settings,
        records: RecordWriter,
        clock: C,
    ) -> Self {
        let high_score = records.high_score();
        let state = Self::fresh_state(seed, playfield, atlas, &settings, &clock);
        let latest = Arc::new(FrameSnapshot::capture(&state, high_score));
        log::info!("Session started (seed {}, high score {})", seed, high_score);

        Self {
            state,
            settings,
            tilt: Arc::new(TiltLatch::new()),
            requested_phase: None,
            accumulator: 0.0,
            records,
            clock,
            high_score,
            ui_events: Vec::new(),
            latest,
            running: true,
        }
    }

    fn fresh_state(
        seed: u64,
        playfield: Playfield,
        atlas: SpriteAtlas,
        settings: &Settings,
        clock: &C,
    ) -> GameState {
        let mut state = GameState::new(seed, playfield, atlas, settings.controls());
        state.started_at_ms = clock.now_millis();
        state
    }

    /// Latch the sensor side writes filtered tilt into
    pub fn tilt_latch(&self) -> Arc<TiltLatch> {
        self.tilt.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Best score known to this session
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// False once the session ended, was quit, or was stopped
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply a UI button press
    pub fn command(&mut self, command: UiCommand) {
        match command {
            UiCommand::TogglePause => {
                // Flip whatever is already queued, not just the live phase
                match self.requested_phase.unwrap_or(self.state.phase) {
                    GamePhase::Active => self.requested_phase = Some(GamePhase::Paused),
                    GamePhase::Paused => self.requested_phase = Some(GamePhase::Active),
                    GamePhase::GameOver => {}
                }
            }
            UiCommand::Pause => self.requested_phase = Some(GamePhase::Paused),
            UiCommand::Resume => self.requested_phase = Some(GamePhase::Active),
            UiCommand::QuitToMenu => {
                log::info!("Quit to menu at score {}", self.state.score);
                self.stop();
            }
        }
    }

    /// Feed elapsed frame time; runs as many fixed ticks as fit.
    ///
    /// Returns the number of ticks run. The snapshot is republished either way.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.running && self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.run_tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        self.publish();
        substeps
    }

    /// Run exactly one tick and publish, ignoring the accumulator
    pub fn step(&mut self) {
        if !self.running {
            return;
        }
        self.run_tick();
        self.publish();
    }

    fn run_tick(&mut self) {
        let requested = self.requested_phase.take();
        let input = TickInput {
            tilt_x: self.tilt.load(),
            pause: requested == Some(GamePhase::Paused),
            resume: requested == Some(GamePhase::Active),
        };
        tick(&mut self.state, &input, SIM_DT);
        self.handle_events();
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Paused => self.ui_events.push(UiEvent::Paused),
                GameEvent::Resumed => self.ui_events.push(UiEvent::Resumed),
                GameEvent::Caught { id, kind } => log::debug!("Caught {:?} item {}", kind, id),
                GameEvent::Missed { id } => log::debug!("Missed good item {}", id),
                GameEvent::GameOver { score } => self.end(score),
            }
        }
    }

    fn end(&mut self, score: u32) {
        let timestamp = self.clock.now_millis();
        self.records.finish_session(score, timestamp);

        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
        }
        self.ui_events.push(UiEvent::SessionEnded {
            score,
            new_high_score,
        });
        self.running = false;
        log::info!(
            "Session ended after {} ms with score {}",
            timestamp - self.state.started_at_ms,
            score
        );
    }

    fn publish(&mut self) {
        self.latest = Arc::new(FrameSnapshot::capture(&self.state, self.high_score));
    }

    /// Latest published frame
    pub fn snapshot(&self) -> Arc<FrameSnapshot> {
        self.latest.clone()
    }

    /// Take pending UI notifications
    pub fn drain_ui_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.ui_events)
    }

    /// Stop ticking and spawning. The last snapshot stays available.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Session stopped");
        }
        self.running = false;
    }

    /// Begin a new session with fresh health and score, keeping settings and storage
    pub fn restart(&mut self, seed: u64) {
        self.high_score = self.records.high_score();
        self.state = Self::fresh_state(
            seed,
            self.state.playfield,
            self.state.atlas.clone(),
            &self.settings,
            &self.clock,
        );
        self.requested_phase = None;
        self.accumulator = 0.0;
        self.ui_events.clear();
        self.running = true;
        self.publish();
        log::info!("Session restarted (seed {})", seed);
    }

    /// Recorded sessions, newest first
    pub fn history(&self) -> Vec<SessionRecord> {
        self.records.sessions()
    }

    /// Stop and wait for queued record writes to finish
    pub fn shutdown(mut self) {
        self.stop();
        self.records.shutdown();
    }
}
