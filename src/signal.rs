//! Vocal sensor sample decoding and cross-thread hand-off
//!
//! The microcontroller streams line-oriented JSON payloads (gain,
//! frequency, trigger buttons, calibration knobs). Decoding maps keys onto
//! a fixed `SignalSample` struct field by field; unknown keys are logged
//! and dropped, never turned into state. The serial/base64 transport layer
//! is an external collaborator - lines arrive here already de-framed.
//!
//! Producer and game loop share a single-slot `SignalCell`: the reader
//! thread applies partial updates under a lock, the loop copies one
//! snapshot per frame.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

/// Latest values decoded from the sensor stream
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSample {
    /// Vocal gain (raw sensor units, calibrated downstream)
    pub gain: f32,
    /// Dominant vocal frequency (drives the shot charge)
    pub frequency: f32,
    /// Shoot button level (edge detection happens in the game loop)
    pub shoot: bool,
    /// Pause button level
    pub pause: bool,
    /// Charge divider knob (0 = not reported)
    pub divider: f32,
    /// Gain calibration offset reported by the firmware (0 = not reported)
    pub threshold: f32,
}

impl Default for SignalSample {
    fn default() -> Self {
        Self {
            gain: 0.0,
            frequency: 0.0,
            shoot: false,
            pause: false,
            divider: 0.0,
            threshold: 0.0,
        }
    }
}

fn as_f32(value: &Value) -> Option<f32> {
    value.as_f64().map(|v| v as f32)
}

fn as_bool(value: &Value) -> Option<bool> {
    // The firmware reports booleans as true/false or 0/1
    value.as_bool().or_else(|| value.as_f64().map(|v| v != 0.0))
}

/// Apply one decoded message line onto the sample.
///
/// Messages are partial updates: only the keys present change fields.
/// Returns false (and logs) when the line is not a JSON object.
pub fn apply_line(sample: &mut SignalSample, line: &str) -> bool {
    let parsed: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("discarding unparseable signal line: {err}");
            return false;
        }
    };
    let Some(object) = parsed.as_object() else {
        log::debug!("discarding non-object signal payload");
        return false;
    };

    for (key, value) in object {
        let applied = match key.as_str() {
            "gain" => as_f32(value).map(|v| sample.gain = v),
            "frequency" => as_f32(value).map(|v| sample.frequency = v),
            "button_pressed_shoot" => as_bool(value).map(|v| sample.shoot = v),
            "button_pressed_pause" => as_bool(value).map(|v| sample.pause = v),
            "divider" => as_f32(value).map(|v| sample.divider = v),
            "threshold" => as_f32(value).map(|v| sample.threshold = v),
            _ => {
                log::warn!("dropping unknown signal key {key:?}");
                continue;
            }
        };
        if applied.is_none() {
            log::warn!("signal key {key:?} carried an unexpected value type");
        }
    }
    true
}

/// Edge detector for the shoot and pause triggers.
///
/// A rising edge is latched until a simulation step takes it, so a press
/// seen on a frame that runs no substep still fires on the next one. A
/// held button fires once per press.
#[derive(Debug, Clone, Default)]
pub struct TriggerLatch {
    prev_shoot: bool,
    prev_pause: bool,
    shoot: bool,
    pause: bool,
}

impl TriggerLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current button levels, latching rising edges
    pub fn observe(&mut self, sample: &SignalSample) {
        if sample.shoot && !self.prev_shoot {
            self.shoot = true;
        }
        if sample.pause && !self.prev_pause {
            self.pause = true;
        }
        self.prev_shoot = sample.shoot;
        self.prev_pause = sample.pause;
    }

    /// Consume a pending shoot press
    pub fn take_shoot(&mut self) -> bool {
        std::mem::take(&mut self.shoot)
    }

    /// Consume a pending pause press
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause)
    }
}

/// Single-slot, lock-protected "latest sample" cell shared between the
/// serial reader thread and the game loop.
#[derive(Debug, Clone, Default)]
pub struct SignalCell {
    inner: Arc<Mutex<SignalSample>>,
}

impl SignalCell {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SignalSample> {
        // A poisoned lock only means the producer panicked mid-write of a
        // plain-data struct; the last sample is still the best we have.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Producer side: apply a partial update to the shared sample
    pub fn update(&self, apply: impl FnOnce(&mut SignalSample)) {
        apply(&mut self.lock());
    }

    /// Consumer side: copy the latest sample (once per frame)
    pub fn snapshot(&self) -> SignalSample {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let mut sample = SignalSample::default();
        let ok = apply_line(
            &mut sample,
            r#"{"gain": 84.5, "frequency": 220.0, "button_pressed_shoot": true, "button_pressed_pause": false, "divider": 1000, "threshold": 70}"#,
        );
        assert!(ok);
        assert_eq!(sample.gain, 84.5);
        assert_eq!(sample.frequency, 220.0);
        assert!(sample.shoot);
        assert!(!sample.pause);
        assert_eq!(sample.divider, 1000.0);
        assert_eq!(sample.threshold, 70.0);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut sample = SignalSample {
            gain: 50.0,
            frequency: 100.0,
            ..SignalSample::default()
        };
        assert!(apply_line(&mut sample, r#"{"gain": 60.0}"#));
        assert_eq!(sample.gain, 60.0);
        assert_eq!(sample.frequency, 100.0);
    }

    #[test]
    fn test_unknown_keys_are_dropped_not_stored() {
        let mut sample = SignalSample::default();
        assert!(apply_line(
            &mut sample,
            r#"{"gain": 12.0, "mystery_knob": 999}"#
        ));
        assert_eq!(sample.gain, 12.0);
        assert_eq!(sample, SignalSample {
            gain: 12.0,
            ..SignalSample::default()
        });
    }

    #[test]
    fn test_numeric_booleans_accepted() {
        let mut sample = SignalSample::default();
        assert!(apply_line(&mut sample, r#"{"button_pressed_shoot": 1}"#));
        assert!(sample.shoot);
        assert!(apply_line(&mut sample, r#"{"button_pressed_shoot": 0}"#));
        assert!(!sample.shoot);
    }

    #[test]
    fn test_garbage_lines_are_rejected() {
        let mut sample = SignalSample::default();
        assert!(!apply_line(&mut sample, "not json"));
        assert!(!apply_line(&mut sample, "[1, 2, 3]"));
        assert_eq!(sample, SignalSample::default());
    }

    #[test]
    fn test_cell_latest_wins() {
        let cell = SignalCell::new();
        cell.update(|s| s.gain = 10.0);
        cell.update(|s| s.gain = 20.0);
        let snapshot = cell.snapshot();
        assert_eq!(snapshot.gain, 20.0);
        // Snapshot is a copy, later writes don't alias it
        cell.update(|s| s.gain = 30.0);
        assert_eq!(snapshot.gain, 20.0);
    }

    #[test]
    fn test_latch_holds_press_across_idle_frames() {
        let mut latch = TriggerLatch::new();
        let pressed = SignalSample {
            shoot: true,
            ..SignalSample::default()
        };
        // Several frames may pass before a simulation step runs
        latch.observe(&pressed);
        latch.observe(&pressed);
        latch.observe(&pressed);
        assert!(latch.take_shoot());
        assert!(!latch.take_shoot());
    }

    #[test]
    fn test_held_button_fires_once_per_press() {
        let mut latch = TriggerLatch::new();
        let pressed = SignalSample {
            pause: true,
            ..SignalSample::default()
        };
        latch.observe(&pressed);
        assert!(latch.take_pause());
        latch.observe(&pressed);
        assert!(!latch.take_pause());
        // Release re-arms the trigger
        latch.observe(&SignalSample::default());
        latch.observe(&pressed);
        assert!(latch.take_pause());
    }

    #[test]
    fn test_latch_tracks_triggers_independently() {
        let mut latch = TriggerLatch::new();
        latch.observe(&SignalSample {
            shoot: true,
            ..SignalSample::default()
        });
        assert!(!latch.take_pause());
        assert!(latch.take_shoot());
    }

    #[test]
    fn test_cell_is_shared_across_clones() {
        let cell = SignalCell::new();
        let producer = cell.clone();
        std::thread::spawn(move || {
            producer.update(|s| s.frequency = 440.0);
        })
        .join()
        .unwrap();
        assert_eq!(cell.snapshot().frequency, 440.0);
    }
}
