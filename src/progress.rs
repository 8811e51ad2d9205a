use minemap_logger::{log, LogSeverity::Info};
use std::time::{Duration, Instant};

/// Logs "<verb> <noun> n of N (p%) (ETA: Mm Ss)" every `interval` items.
pub struct Progress {
    verb: &'static str,
    noun: &'static str,
    total: usize,
    interval: usize,
    done: usize,
    started: Instant,
}

impl Progress {
    pub fn new(verb: &'static str, noun: &'static str, total: usize, interval: usize) -> Self {
        Self {
            verb,
            noun,
            total,
            interval: interval.max(1),
            done: 0,
            started: Instant::now(),
        }
    }

    pub fn sectors(total: usize) -> Self {
        Self::new("Processing", "sector", total, 200)
    }

    pub fn pixels(total: usize) -> Self {
        Self::new("Drawing", "pixel", total, 500_000)
    }

    /// Counts one item, logging before it when a report is due.
    pub fn tick(&mut self) {
        if self.done % self.interval == 0 {
            if let Some(line) = self.report(self.started.elapsed()) {
                log(line, Info);
            }
        }
        self.done += 1;
    }

    pub fn done(&self) -> usize {
        self.done
    }

    /// Progress line after `elapsed`, or `None` while there is no rate to go by.
    pub fn report(&self, elapsed: Duration) -> Option<String> {
        if self.done == 0 || self.total == 0 || elapsed.is_zero() {
            return None;
        }
        let elapsed = elapsed.as_secs_f64();
        let estimate = elapsed / self.done as f64 * self.total as f64;
        let remaining = (estimate - elapsed).max(0.0);
        let minutes = (remaining / 60.0) as u64;
        let seconds = (remaining - minutes as f64 * 60.0) as u64;
        let percent = 100.0 * self.done as f64 / self.total as f64;
        Some(format!(
            "{} {} {} of {} ({:.1}%) (ETA: {}m {}s)",
            self.verb, self.noun, self.done, self.total, percent, minutes, seconds
        ))
    }
}
