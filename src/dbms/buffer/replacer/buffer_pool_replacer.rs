#[cfg(test)]
use mockall::automock;

use crate::dbms::types::FrameId;

#[derive(Debug, PartialEq, Eq)]
pub enum BufferPoolReplacerError {
    /// Frame is out of range
    FrameOutOfRange(String),
    /// Frame has never been recorded as accessed
    FrameNotTracked(String),
    /// Frame is tracked but not currently evictable
    FrameNotEvictable(String),
}

#[cfg_attr(test, automock)]
pub trait IBufferPoolReplacer {
    /// Select a frame to remove from the buffer pool, untrack it, and
    /// return its ID. If no frame is evictable, return `None`.
    fn evict(&mut self) -> Result<Option<FrameId>, BufferPoolReplacerError>;
    /// Record an access to the given frame at the current logical time.
    /// Starts tracking the frame if it was untracked.
    fn record_access(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError>;
    /// Mark the given frame as a candidate for eviction, or withdraw it
    /// from candidacy. The frame must have been accessed at least once.
    fn set_evictable(
        &mut self,
        frame_id: FrameId,
        evictable: bool,
    ) -> Result<(), BufferPoolReplacerError>;
    /// Untrack the given frame regardless of its access history, e.g.
    /// after the buffer pool deletes the page it holds. The frame must be
    /// evictable; untracked frames are ignored.
    fn remove(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError>;
    /// Return the number of evictable frames currently in the replacer.
    fn size(&self) -> Result<usize, BufferPoolReplacerError>;
}
