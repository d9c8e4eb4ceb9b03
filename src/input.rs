//! Accelerometer input
//!
//! The sensor delivers raw tri-axial samples on its own thread. `TiltFilter`
//! smooths the horizontal axis and snaps noise to zero; the result is stored in
//! a `TiltLatch` that the tick reads without waiting. Only the newest value
//! matters: there is no queue, and a stale reading is always acceptable.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// One raw accelerometer reading (m/s²)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Exponential smoothing with a dead zone on the horizontal axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiltFilter {
    /// Weight of the previous filtered value (0 = no smoothing)
    pub alpha: f32,
    /// Filtered values smaller than this become exactly zero
    pub dead_zone: f32,
    filtered: f32,
}

impl TiltFilter {
    pub fn new(alpha: f32, dead_zone: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            dead_zone,
            filtered: 0.0,
        }
    }

    /// Feed one sample and return the new filtered horizontal value.
    /// Non-finite readings are dropped and the previous value is kept.
    pub fn push(&mut self, sample: AccelSample) -> f32 {
        if !sample.x.is_finite() {
            return self.filtered;
        }
        self.filtered = self.alpha * self.filtered + (1.0 - self.alpha) * sample.x;
        if self.filtered.abs() < self.dead_zone {
            self.filtered = 0.0;
        }
        self.filtered
    }

    /// Current filtered value
    pub fn value(&self) -> f32 {
        self.filtered
    }
}

impl Default for TiltFilter {
    fn default() -> Self {
        Self::new(0.5, 0.01)
    }
}

/// Latest filtered tilt, shared between the sensor thread and the tick
#[derive(Debug, Default)]
pub struct TiltLatch {
    bits: AtomicU32,
}

impl TiltLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new value, replacing whatever was there
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Read the newest value; zero before anything was stored
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Sensor-side half: filter each sample and publish it to a latch
#[derive(Debug)]
pub struct TiltInput {
    filter: TiltFilter,
    latch: std::sync::Arc<TiltLatch>,
}

impl TiltInput {
    pub fn new(filter: TiltFilter, latch: std::sync::Arc<TiltLatch>) -> Self {
        Self { filter, latch }
    }

    /// Handle one sensor notification
    pub fn on_sample(&mut self, sample: AccelSample) {
        let value = self.filter.push(sample);
        self.latch.store(value);
    }
}
