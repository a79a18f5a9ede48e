//! Virtual-time scheduler
//!
//! Timers are one-shot: `after` queues a task, `cancel` drops it, and the
//! owner pulls due tasks in deadline order with `pop_due`. Time only moves
//! when the owner says so, which keeps the game loop deterministic in tests.

use std::time::Duration;

/// Handle of a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `task` to run `delay` after the current time
    pub fn after(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    /// Drop a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Earliest deadline among pending timers
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Remove and return the earliest timer due at or before `until`.
    /// Ties fire in the order they were queued. The clock moves to the
    /// timer's deadline so anything it queues is measured from there.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id.0))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(index);
        self.now = self.now.max(timer.due);
        Some((timer.id, timer.task))
    }

    /// Move the clock forward to `until` (never backward)
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Push every deadline earlier than `until` up to `until`.
    /// Returns how many timers were late.
    pub fn rebase_overdue(&mut self, until: Duration) -> usize {
        let mut late = 0;
        for timer in self.timers.iter_mut().filter(|t| t.due < until) {
            timer.due = until;
            late += 1;
        }
        late
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut clock = Scheduler::new();
        clock.after(ms(30), 'c');
        clock.after(ms(10), 'a');
        clock.after(ms(20), 'b');

        let fired: Vec<char> = std::iter::from_fn(|| clock.pop_due(ms(100)).map(|(_, t)| t)).collect();
        assert_eq!(fired, vec!['a', 'b', 'c']);
        assert_eq!(clock.now(), ms(30));
    }

    #[test]
    fn test_ties_fire_in_queue_order() {
        let mut clock = Scheduler::new();
        clock.after(Duration::ZERO, 1);
        clock.after(Duration::ZERO, 2);
        assert_eq!(clock.pop_due(Duration::ZERO).map(|(_, t)| t), Some(1));
        assert_eq!(clock.pop_due(Duration::ZERO).map(|(_, t)| t), Some(2));
    }

    #[test]
    fn test_not_due_yet() {
        let mut clock = Scheduler::new();
        clock.after(ms(20), ());
        assert!(clock.pop_due(ms(19)).is_none());
        assert!(clock.pop_due(ms(20)).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut clock = Scheduler::new();
        let id = clock.after(ms(5), ());
        assert!(clock.is_pending(id));
        assert!(clock.cancel(id));
        assert!(!clock.cancel(id));
        assert!(clock.pop_due(ms(50)).is_none());
    }

    #[test]
    fn test_delay_measured_from_fired_deadline() {
        let mut clock = Scheduler::new();
        clock.after(ms(20), ());
        clock.pop_due(ms(35));
        clock.after(ms(20), ());
        assert_eq!(clock.next_due(), Some(ms(40)));
    }

    #[test]
    fn test_rebase_overdue() {
        let mut clock = Scheduler::new();
        clock.after(ms(10), ());
        clock.after(ms(500), ());
        assert_eq!(clock.rebase_overdue(ms(100)), 1);
        assert_eq!(clock.next_due(), Some(ms(100)));
    }
}
