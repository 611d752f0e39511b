//! Ordered, duplicate-free worklist of job identifiers.

use std::collections::VecDeque;

use swapbatch_core::JobId;

/// FIFO queue of job ids selected for a run.
///
/// Insertion order is selection order; duplicates are ignored so a
/// double-click can never queue the same job twice. Before a run starts the
/// owning caller mutates it freely; during a run the worker holds the run's
/// snapshot exclusively.
#[derive(Debug, Default, Clone)]
pub struct JobQueue {
    ids: VecDeque<JobId>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` if it is not already queued. Returns whether it was added.
    pub fn enqueue(&mut self, id: JobId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push_back(id);
        true
    }

    /// Pop and return the head of the queue.
    pub fn dequeue_next(&mut self) -> Option<JobId> {
        self.ids.pop_front()
    }

    /// Drop every queued id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Point-in-time copy of the queued ids, in order.
    pub fn snapshot(&self) -> Vec<JobId> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<JobId> for JobQueue {
    fn from_iter<T: IntoIterator<Item = JobId>>(iter: T) -> Self {
        let mut queue = Self::new();
        for id in iter {
            queue.enqueue(id);
        }
        queue
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_preserves_insertion_order() {
        let mut queue = JobQueue::new();
        queue.enqueue(JobId::new("c"));
        queue.enqueue(JobId::new("a"));
        queue.enqueue(JobId::new("b"));

        assert_eq!(queue.dequeue_next(), Some(JobId::new("c")));
        assert_eq!(queue.dequeue_next(), Some(JobId::new("a")));
        assert_eq!(queue.dequeue_next(), Some(JobId::new("b")));
        assert_eq!(queue.dequeue_next(), None);
    }

    #[test]
    fn duplicate_enqueue_is_a_no_op() {
        let mut queue = JobQueue::new();
        assert!(queue.enqueue(JobId::new("clip")));
        assert!(!queue.enqueue(JobId::new("clip")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn dequeue_from_empty_returns_none() {
        let mut queue = JobQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue_next(), None);
    }

    #[test]
    fn clear_empties_the_queue() {
        let mut queue = JobQueue::new();
        queue.enqueue(JobId::new("a"));
        queue.enqueue(JobId::new("b"));
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn snapshot_is_a_point_in_time_copy() {
        let mut queue = JobQueue::new();
        queue.enqueue(JobId::new("a"));
        queue.enqueue(JobId::new("b"));

        let snapshot = queue.snapshot();
        queue.dequeue_next();

        assert_eq!(snapshot, vec![JobId::new("a"), JobId::new("b")]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn from_iterator_deduplicates() {
        let queue: JobQueue = ["a", "b", "a"].into_iter().map(JobId::new).collect();
        assert_eq!(queue.len(), 2);
    }
}
