use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Idle-debounce bookkeeping for autosave: one single-shot deadline per
/// dirty note. Every edit pushes that note's deadline out to `now + window`;
/// the event loop drains expired deadlines on its tick and flushes the
/// corresponding notes. An explicit flush (blur, note switch, quit) cancels
/// the pending deadline so the same content is not written twice.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadlines: HashMap<Uuid, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadlines: HashMap::new(),
        }
    }

    /// Reset the note's deadline: it will fire `window` after this edit
    /// unless another edit arrives first.
    pub fn note_edited(&mut self, id: Uuid, now: Instant) {
        self.deadlines.insert(id, now + self.window);
    }

    /// Drop the pending deadline, if any. Called when the note has just been
    /// flushed through another trigger, or deleted.
    pub fn cancel(&mut self, id: Uuid) {
        self.deadlines.remove(&id);
    }

    /// Drain every deadline that has expired by `now`.
    pub fn due(&mut self, now: Instant) -> Vec<Uuid> {
        let expired: Vec<Uuid> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            self.deadlines.remove(id);
        }
        expired
    }

    /// The soonest pending deadline, for sizing the event-loop poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(5);

    #[test]
    fn test_fires_after_window() {
        let mut debouncer = Debouncer::new(WINDOW);
        let id = Uuid::new_v4();
        let start = Instant::now();

        debouncer.note_edited(id, start);
        assert!(debouncer.due(start + Duration::from_secs(4)).is_empty());
        assert_eq!(debouncer.due(start + WINDOW), vec![id]);
    }

    #[test]
    fn test_edit_resets_deadline() {
        let mut debouncer = Debouncer::new(WINDOW);
        let id = Uuid::new_v4();
        let start = Instant::now();

        debouncer.note_edited(id, start);
        debouncer.note_edited(id, start + Duration::from_secs(3));

        // Old deadline must not fire; the new one does.
        assert!(debouncer.due(start + WINDOW).is_empty());
        assert_eq!(debouncer.due(start + Duration::from_secs(8)), vec![id]);
    }

    #[test]
    fn test_due_drains_once() {
        let mut debouncer = Debouncer::new(WINDOW);
        let id = Uuid::new_v4();
        let start = Instant::now();

        debouncer.note_edited(id, start);
        assert_eq!(debouncer.due(start + WINDOW).len(), 1);
        assert!(debouncer.due(start + WINDOW).is_empty());
    }

    #[test]
    fn test_cancel_suppresses() {
        let mut debouncer = Debouncer::new(WINDOW);
        let id = Uuid::new_v4();
        let start = Instant::now();

        debouncer.note_edited(id, start);
        debouncer.cancel(id);
        assert!(debouncer.due(start + WINDOW).is_empty());
    }

    #[test]
    fn test_deadlines_are_per_note() {
        let mut debouncer = Debouncer::new(WINDOW);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let start = Instant::now();

        debouncer.note_edited(a, start);
        debouncer.note_edited(b, start + Duration::from_secs(2));

        assert_eq!(debouncer.due(start + WINDOW), vec![a]);
        assert_eq!(debouncer.next_deadline(), Some(start + Duration::from_secs(7)));
    }
}
