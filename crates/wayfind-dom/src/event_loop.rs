//! Scheduler
//!
//! Virtual-clock event loop for deferred work: frame-boundary tasks
//! (`requestAnimationFrame`) and one-shot timers (`setTimeout`).
//! Tasks are plain data; whoever owns the scheduler decides how to run
//! them. Nothing is cancelable: scheduling twice runs twice.

use std::collections::VecDeque;

/// Timer task
#[derive(Debug, Clone)]
struct Timer<T> {
    due_ms: u64,
    seq: u64,
    task: T,
}

/// Deferred-work queue with virtual time
#[derive(Debug)]
pub struct Scheduler<T> {
    /// Tasks for the next frame boundary
    frame: VecDeque<T>,
    /// Pending one-shot timers
    timers: Vec<Timer<T>>,
    /// Insertion counter, orders timers with equal due time
    next_seq: u64,
    /// Current timestamp (ms)
    current_time: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            frame: VecDeque::new(),
            timers: Vec::new(),
            next_seq: 0,
            current_time: 0,
        }
    }

    /// Run `task` at the next frame boundary
    pub fn after_paint(&mut self, task: impl Into<T>) {
        self.frame.push_back(task.into());
    }

    /// Run `task` once `delay_ms` of virtual time has passed
    pub fn after(&mut self, delay_ms: u64, task: impl Into<T>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            due_ms: self.current_time + delay_ms,
            seq,
            task: task.into(),
        });
    }

    /// Take the tasks queued for this frame.
    /// Tasks queued while running them land in the following frame.
    pub fn take_frame(&mut self) -> Vec<T> {
        self.frame.drain(..).collect()
    }

    /// Pop the earliest timer due at or before `until`, moving the
    /// clock to its due time.
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let (idx, _) = self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))?;
        let timer = self.timers.remove(idx);
        self.current_time = self.current_time.max(timer.due_ms);
        Some(timer.task)
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, time_ms: u64) {
        self.current_time = self.current_time.max(time_ms);
    }

    /// Advance time by `delta_ms` and return everything that became due:
    /// the pending frame first, then timers in due order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<T> {
        let target = self.current_time + delta_ms;
        let mut ready = self.take_frame();
        while let Some(task) = self.pop_due(target) {
            ready.push(task);
        }
        self.advance_to(target);
        ready
    }

    /// Get current time
    pub fn now(&self) -> u64 {
        self.current_time
    }

    /// Time of the earliest pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.due_ms).min()
    }

    /// Number of queued frame tasks and timers
    pub fn pending(&self) -> usize {
        self.frame.len() + self.timers.len()
    }

    /// Check if there's pending work
    pub fn has_pending_work(&self) -> bool {
        self.pending() > 0
    }
}
