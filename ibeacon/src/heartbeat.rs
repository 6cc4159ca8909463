//! The fixed blink cadence. Every iteration announces itself once, then the LED
//! is high for one half period and low for the next, forever.

/// Time each level is held, ms
pub const HEARTBEAT_HALF_PERIOD_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Drive the output to `level`, then hold it for `hold_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub level: Level,
    pub hold_ms: u64,
}

/// What the blink loop does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Beat {
    /// Emit the per-iteration log line
    Announce,
    Hold(Step),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Announce,
    High,
    Low,
}

/// Endless schedule of the blink loop: `Announce`, `Hold(High)`, `Hold(Low)`,
/// repeated.
#[derive(Clone, Debug)]
pub struct Heartbeat {
    phase: Phase,
    half_period_ms: u64,
    iteration: u32,
}

impl Heartbeat {
    pub const fn new() -> Self {
        Self::with_half_period(HEARTBEAT_HALF_PERIOD_MS)
    }

    pub const fn with_half_period(half_period_ms: u64) -> Self {
        Self {
            phase: Phase::Announce,
            half_period_ms,
            iteration: 0,
        }
    }

    /// Number of iterations started so far, wrapping
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Advance the schedule by one beat.
    pub fn beat(&mut self) -> Beat {
        let (beat, next) = match self.phase {
            Phase::Announce => {
                self.iteration = self.iteration.wrapping_add(1);
                (Beat::Announce, Phase::High)
            }
            Phase::High => (self.hold(Level::High), Phase::Low),
            Phase::Low => (self.hold(Level::Low), Phase::Announce),
        };
        self.phase = next;
        beat
    }

    fn hold(&self, level: Level) -> Beat {
        Beat::Hold(Step {
            level,
            hold_ms: self.half_period_ms,
        })
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Heartbeat {
    type Item = Beat;

    fn next(&mut self) -> Option<Beat> {
        Some(self.beat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Log(&'static str),
        Pin(Level),
        Wait(u64),
    }

    /// Records what an LED loop driven by a [`Heartbeat`] does, in order.
    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        clock_ms: u64,
    }

    impl Recorder {
        fn apply(&mut self, beat: Beat) {
            match beat {
                Beat::Announce => self.events.push(Event::Log("Hello from loop")),
                Beat::Hold(step) => {
                    self.events.push(Event::Pin(step.level));
                    self.events.push(Event::Wait(step.hold_ms));
                    self.clock_ms += step.hold_ms;
                }
            }
        }
    }

    fn run(beats: usize) -> Recorder {
        let mut rec = Recorder::default();
        for beat in Heartbeat::new().take(beats) {
            rec.apply(beat);
        }
        rec
    }

    #[test]
    fn iteration_logs_then_high_then_low() {
        let rec = run(6);
        assert_eq!(
            rec.events,
            vec![
                Event::Log("Hello from loop"),
                Event::Pin(Level::High),
                Event::Wait(1000),
                Event::Pin(Level::Low),
                Event::Wait(1000),
                Event::Log("Hello from loop"),
                Event::Pin(Level::High),
                Event::Wait(1000),
                Event::Pin(Level::Low),
                Event::Wait(1000),
            ]
        );
        assert_eq!(rec.clock_ms, 4000);
    }

    #[test]
    fn one_log_line_per_iteration() {
        let rec = run(3 * 500);
        let logs = rec
            .events
            .iter()
            .filter(|e| matches!(e, Event::Log(_)))
            .count();
        assert_eq!(logs, 500);
        assert_eq!(rec.clock_ms, 500 * 2000);
    }

    #[test]
    fn pin_alternates_once_per_half_period() {
        let levels: Vec<(Level, u64)> = Heartbeat::default()
            .take(3000)
            .filter_map(|b| match b {
                Beat::Hold(step) => Some((step.level, step.hold_ms)),
                Beat::Announce => None,
            })
            .collect();
        assert_eq!(levels.len(), 2000);
        assert_eq!(levels[0].0, Level::High);
        assert!(levels.windows(2).all(|w| w[0].0 != w[1].0));
        assert!(levels.iter().all(|&(_, ms)| ms == 1000));
    }

    #[test]
    fn counts_iterations() {
        let mut hb = Heartbeat::new();
        assert_eq!(hb.iteration(), 0);

        assert_eq!(hb.beat(), Beat::Announce);
        assert_eq!(hb.iteration(), 1);

        hb.beat();
        hb.beat();
        assert_eq!(hb.iteration(), 1);

        assert_eq!(hb.beat(), Beat::Announce);
        assert_eq!(hb.iteration(), 2);
    }

    #[test]
    fn never_ends() {
        assert!(Heartbeat::with_half_period(1).nth(1_000_000).is_some());
    }
}
