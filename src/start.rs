//! Start-light countdown.
//!
//! The countdown runs on real time, independent of the simulation tick rate:
//! red1 → red2 → red3 → green → lights off, each at a fixed delay from the
//! moment the sequence was (re)started.  Restarting discards every pending
//! transition, so a stage from an earlier race can never fire into a new one.

use crate::config::RaceConfig;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StartStage {
    /// Lights off: before the countdown, and again after the green.
    #[default]
    Idle,
    Red1,
    Red2,
    Red3,
    Green,
}

/// Cancellable fixed-delay countdown.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StartSequence {
    schedule: [(f32, StartStage); 5],
    elapsed: f32,
    next: usize,
    stage: StartStage,
    started: bool,
    running: bool,
}

impl Default for StartSequence {
    fn default() -> Self {
        Self::from_config(&RaceConfig::default())
    }
}

impl StartSequence {
    /// An idle sequence using the configured delays.  Nothing fires until
    /// [`restart`](Self::restart).
    pub fn from_config(config: &RaceConfig) -> Self {
        Self {
            schedule: [
                (config.start_red1_delay, StartStage::Red1),
                (config.start_red2_delay, StartStage::Red2),
                (config.start_red3_delay, StartStage::Red3),
                (config.start_green_delay, StartStage::Green),
                (config.start_lights_off_delay, StartStage::Idle),
            ],
            elapsed: 0.0,
            next: 0,
            stage: StartStage::Idle,
            started: false,
            running: false,
        }
    }

    /// Begin a fresh countdown, dropping anything still pending.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.next = 0;
        self.stage = StartStage::Idle;
        self.started = false;
        self.running = true;
    }

    /// Stop the countdown without firing the remaining stages.
    pub fn cancel(&mut self) {
        self.running = false;
        self.next = self.schedule.len();
    }

    pub fn stage(&self) -> StartStage {
        self.stage
    }

    /// The green light has shown for the current race.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Transitions are still pending.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `real_dt` seconds and return the stages that fired, in
    /// order.  A long frame can fire several at once.
    pub fn advance(&mut self, real_dt: f32) -> Vec<StartStage> {
        let mut fired = Vec::new();
        if !self.running {
            return fired;
        }
        self.elapsed += real_dt.max(0.0);
        while let Some(&(delay, stage)) = self.schedule.get(self.next) {
            if self.elapsed < delay {
                break;
            }
            self.next += 1;
            self.stage = stage;
            if stage == StartStage::Green {
                self.started = true;
            }
            fired.push(stage);
        }
        if self.next >= self.schedule.len() {
            self.running = false;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_restarted() {
        let mut sequence = StartSequence::default();
        assert!(sequence.advance(10.0).is_empty());
        assert!(!sequence.started());
    }

    #[test]
    fn stages_fire_in_order_at_their_delays() {
        let mut sequence = StartSequence::default();
        sequence.restart();
        assert!(sequence.advance(0.5).is_empty());
        assert_eq!(sequence.advance(0.2), vec![StartStage::Red1]);
        assert_eq!(sequence.advance(0.8), vec![StartStage::Red2]);
        assert_eq!(sequence.advance(0.8), vec![StartStage::Red3]);
        assert!(!sequence.started());
        assert_eq!(sequence.advance(0.8), vec![StartStage::Green]);
        assert!(sequence.started());
        assert_eq!(sequence.advance(1.5), vec![StartStage::Idle]);
        assert!(sequence.started(), "lights off does not stop the race");
        assert!(!sequence.is_running());
    }

    #[test]
    fn long_frame_fires_everything_due() {
        let mut sequence = StartSequence::default();
        sequence.restart();
        let fired = sequence.advance(3.2);
        assert_eq!(
            fired,
            vec![StartStage::Red1, StartStage::Red2, StartStage::Red3, StartStage::Green]
        );
        assert_eq!(sequence.stage(), StartStage::Green);
    }

    #[test]
    fn restart_discards_pending_stages() {
        let mut sequence = StartSequence::default();
        sequence.restart();
        sequence.advance(2.5);
        assert_eq!(sequence.stage(), StartStage::Red3);

        sequence.restart();
        assert_eq!(sequence.stage(), StartStage::Idle);
        // Green was 0.5 s away in the old countdown; it must not fire now.
        assert!(sequence.advance(0.5).is_empty());
        assert!(!sequence.started());
    }

    #[test]
    fn cancel_stops_everything() {
        let mut sequence = StartSequence::default();
        sequence.restart();
        sequence.cancel();
        assert!(sequence.advance(100.0).is_empty());
        assert!(!sequence.started());
    }
}
