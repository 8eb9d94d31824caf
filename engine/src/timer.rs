use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A one-shot action the engine deferred to a later turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Photo delay elapsed; move to the next item
    AdvanceSlide,

    /// Hand the video path to the surface (deferred by one turn so dispatch
    /// never blocks on decoder preparation)
    StartVideo(PathBuf),

    /// Stop and start the whole playback cycle (error backoff)
    RestartCycle,

    /// Re-dispatch after manual navigation settled
    Redispatch,
}

impl Task {
    /// Discriminant used for kind-based cancellation
    fn kind(&self) -> TaskKind {
        match self {
            Self::AdvanceSlide => TaskKind::AdvanceSlide,
            Self::StartVideo(_) => TaskKind::StartVideo,
            Self::RestartCycle => TaskKind::RestartCycle,
            Self::Redispatch => TaskKind::Redispatch,
        }
    }
}

/// Task discriminant for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    AdvanceSlide,
    StartVideo,
    RestartCycle,
    Redispatch,
}

#[derive(Debug, Clone)]
struct Scheduled {
    deadline: Instant,
    task: Task,
}

/// Cancellable one-shot task queue for a single engine.
///
/// All state transitions run on one logical thread, so the queue is a plain
/// deadline list the engine drains on each `pump`. Cancellation is
/// idempotent and is invoked on every stop/destroy path; a cleared queue
/// guarantees no late task can resurrect a stopped engine.
#[derive(Debug, Default)]
pub struct TaskQueue {
    entries: Vec<Scheduled>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to fire `delay` after `now`.
    ///
    /// Any pending task of the same kind is replaced; the engine never wants
    /// two countdowns of one kind in flight.
    pub fn schedule(&mut self, task: Task, delay: Duration, now: Instant) {
        self.cancel(task.kind());
        self.entries.push(Scheduled {
            deadline: now + delay,
            task,
        });
    }

    /// Cancel every pending task of one kind (no-op if none pending)
    pub fn cancel(&mut self, kind: TaskKind) {
        self.entries.retain(|e| e.task.kind() != kind);
    }

    /// Cancel everything (no-op on an empty queue)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pop the earliest task whose deadline has passed
    pub fn pop_due(&mut self, now: Instant) -> Option<Task> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| e.deadline)
            .map(|(i, _)| i)?;

        Some(self.entries.remove(idx).task)
    }

    /// Time until the next deadline, if any task is pending
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.entries
            .iter()
            .map(|e| e.deadline.saturating_duration_since(now))
            .min()
    }

    /// Whether a task of this kind is pending
    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.entries.iter().any(|e| e.task.kind() == kind)
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_respects_deadlines() {
        let mut queue = TaskQueue::new();
        let now = Instant::now();

        queue.schedule(Task::AdvanceSlide, Duration::from_secs(10), now);

        assert_eq!(queue.pop_due(now), None);
        assert_eq!(queue.pop_due(now + Duration::from_secs(9)), None);
        assert_eq!(
            queue.pop_due(now + Duration::from_secs(10)),
            Some(Task::AdvanceSlide)
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_zero_delay_fires_immediately() {
        let mut queue = TaskQueue::new();
        let now = Instant::now();

        queue.schedule(
            Task::StartVideo(PathBuf::from("/tmp/a.mp4")),
            Duration::ZERO,
            now,
        );

        assert_eq!(
            queue.pop_due(now),
            Some(Task::StartVideo(PathBuf::from("/tmp/a.mp4")))
        );
    }

    #[test]
    fn test_earliest_deadline_pops_first() {
        let mut queue = TaskQueue::new();
        let now = Instant::now();

        queue.schedule(Task::AdvanceSlide, Duration::from_secs(5), now);
        queue.schedule(Task::RestartCycle, Duration::from_secs(1), now);

        let later = now + Duration::from_secs(10);
        assert_eq!(queue.pop_due(later), Some(Task::RestartCycle));
        assert_eq!(queue.pop_due(later), Some(Task::AdvanceSlide));
        assert_eq!(queue.pop_due(later), None);
    }

    #[test]
    fn test_schedule_replaces_same_kind() {
        let mut queue = TaskQueue::new();
        let now = Instant::now();

        queue.schedule(Task::AdvanceSlide, Duration::from_secs(5), now);
        queue.schedule(Task::AdvanceSlide, Duration::from_secs(20), now);

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(now + Duration::from_secs(6)), None);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut queue = TaskQueue::new();
        let now = Instant::now();

        queue.schedule(Task::AdvanceSlide, Duration::from_secs(5), now);
        queue.cancel(TaskKind::AdvanceSlide);
        queue.cancel(TaskKind::AdvanceSlide);

        assert!(queue.is_empty());

        queue.clear();
        queue.clear();
    }

    #[test]
    fn test_time_until_next() {
        let mut queue = TaskQueue::new();
        let now = Instant::now();

        assert_eq!(queue.time_until_next(now), None);

        queue.schedule(Task::AdvanceSlide, Duration::from_secs(10), now);
        queue.schedule(Task::RestartCycle, Duration::from_secs(1), now);

        assert_eq!(queue.time_until_next(now), Some(Duration::from_secs(1)));
        assert_eq!(
            queue.time_until_next(now + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
    }
}
