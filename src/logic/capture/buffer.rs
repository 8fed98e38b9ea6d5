//! Bounded Sample Buffer
//!
//! One mutex per buffer. Append, trim-to-bound and snapshot-and-reset all run
//! inside a single critical section, so readers never see a partial reset.

use std::collections::VecDeque;
use parking_lot::Mutex;

#[derive(Debug)]
pub struct BoundedBuffer<T> {
    inner: Mutex<VecDeque<T>>,
    capacity: usize,
}

impl<T: Clone> BoundedBuffer<T> {
    /// `capacity` of 0 is bumped to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity.min(4096))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append, evicting the oldest entries past capacity (FIFO)
    pub fn push(&self, item: T) {
        let mut buffer = self.inner.lock();
        buffer.push_back(item);
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of current contents, oldest first
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Take everything and leave the buffer empty, atomically
    pub fn snapshot_and_reset(&self) -> Vec<T> {
        let mut buffer = self.inner.lock();
        std::mem::take(&mut *buffer).into()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}
