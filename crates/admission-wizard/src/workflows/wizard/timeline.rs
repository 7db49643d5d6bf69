use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

/// Time source for the wizard. `now` is the offset from the clock's origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time, measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Virtual clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Duration>,
    today: NaiveDate,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            now: Mutex::new(Duration::ZERO),
            today,
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    due: Duration,
    sequence: u64,
    action: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.sequence).cmp(&(other.due, other.sequence))
    }
}

/// Deferred callbacks ordered by due time, then by scheduling order.
/// Nothing is ever cancelled: every entry eventually comes out of `pop_due`.
#[derive(Debug)]
pub struct Timeline<T> {
    queue: BinaryHeap<Reverse<Scheduled<T>>>,
    sequence: u64,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, action: T) {
        self.sequence += 1;
        self.queue.push(Reverse(Scheduled {
            due,
            sequence: self.sequence,
            action,
        }));
    }

    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        match self.queue.peek() {
            Some(Reverse(next)) if next.due <= now => {
                self.queue.pop().map(|Reverse(entry)| entry.action)
            }
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(next)| next.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn entries_fire_in_due_order_then_fifo() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(2000), "payment");
        timeline.schedule(ms(1500), "lookup");
        timeline.schedule(ms(1500), "alert");

        assert_eq!(timeline.next_deadline(), Some(ms(1500)));
        assert_eq!(timeline.pop_due(ms(1499)), None);
        assert_eq!(timeline.pop_due(ms(1500)), Some("lookup"));
        assert_eq!(timeline.pop_due(ms(1500)), Some("alert"));
        assert_eq!(timeline.pop_due(ms(1999)), None);
        assert_eq!(timeline.pop_due(ms(5000)), Some("payment"));
        assert!(timeline.is_empty());
    }

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let today = NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date");
        let clock = ManualClock::new(today);
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(ms(250));
        clock.advance(ms(250));
        assert_eq!(clock.now(), ms(500));
        assert_eq!(clock.today(), today);
    }
}
