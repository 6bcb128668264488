/// Handle to a task scheduled on a [`Timeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    id: TaskId,
    due_ms: u64,
    payload: T,
}

/// Simulated clock holding cancellable delayed tasks.
///
/// Tasks fire in due-time order when the clock is advanced past their due
/// time. Tasks sharing a due time fire in the order they were scheduled.
///
/// Test support: it drives the box and lightbox machines deterministically
/// in native tests. The browser build runs the same steps on `gloo` timeouts
/// owned by the components and never uses this type.
#[derive(Debug)]
pub struct Timeline<T> {
    now_ms: u64,
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn schedule(&mut self, delay_ms: u32, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Scheduled {
            id,
            due_ms: self.now_ms + u64::from(delay_ms),
            payload,
        });
        id
    }

    /// Returns false if the task already fired or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Move the clock forward and return the payloads of every task that came due
    pub fn advance(&mut self, ms: u32) -> Vec<T> {
        self.now_ms += u64::from(ms);
        let now = self.now_ms;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.due_ms <= now);
        self.tasks = waiting;

        // ids grow monotonically so they break ties in scheduling order
        due.sort_by_key(|task| (task.due_ms, task.id.0));
        due.into_iter().map(|task| task.payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(1500, "settled");
        timeline.schedule(300, "door");

        assert!(timeline.advance(299).is_empty());
        assert_eq!(timeline.advance(1), vec!["door"]);
        assert_eq!(timeline.pending(), 1);
        assert_eq!(timeline.advance(5000), vec!["settled"]);
        assert_eq!(timeline.now(), 5300);
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(100, 1);
        timeline.schedule(100, 2);
        timeline.schedule(50, 0);

        assert_eq!(timeline.advance(100), vec![0, 1, 2]);
    }

    #[test]
    fn test_cancel() {
        let mut timeline = Timeline::new();
        let door = timeline.schedule(300, "door");
        timeline.schedule(1500, "settled");

        assert!(timeline.cancel(door));
        assert!(!timeline.cancel(door));
        assert_eq!(timeline.advance(2000), vec!["settled"]);
    }

    #[test]
    fn test_cancel_all() {
        let mut timeline = Timeline::new();
        timeline.schedule(10, ());
        timeline.schedule(20, ());
        timeline.cancel_all();

        assert_eq!(timeline.pending(), 0);
        assert!(timeline.advance(100).is_empty());
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut timeline = Timeline::new();
        timeline.advance(1000);
        timeline.schedule(200, "late");

        assert!(timeline.advance(199).is_empty());
        assert_eq!(timeline.advance(1), vec!["late"]);
    }
}
