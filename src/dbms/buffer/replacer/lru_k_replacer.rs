use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::dbms::types::FrameId;

use super::buffer_pool_replacer::{BufferPoolReplacerError, IBufferPoolReplacer};

struct LRUKNode {
    /// Oldest-first timestamps of the most recent accesses, at most `k` of
    /// them, so the front is the k-th most recent access once the node has
    /// seen `k` accesses.
    history: VecDeque<u64>,
    is_evictable: bool,
}

/// Selects the evictable frame whose k-th most recent access is furthest in
/// the past. Frames with fewer than `k` recorded accesses have infinite
/// backward k-distance and are preferred; ties between them fall back to
/// classical LRU on the most recent access.
pub struct LRUKReplacer {
    node_store: HashMap<FrameId, LRUKNode>,
    current_timestamp: u64,
    curr_size: usize,
    replacer_size: usize,
    k: usize,
}

impl LRUKReplacer {
    /// Creates a new [`LRUKReplacer`] tracking frames `0..num_frames`.
    pub fn new(num_frames: usize, k: usize) -> Self {
        LRUKReplacer {
            node_store: HashMap::new(),
            current_timestamp: 0,
            curr_size: 0,
            replacer_size: num_frames,
            k,
        }
    }

    fn check_frame_id(&self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError> {
        if frame_id >= self.replacer_size {
            return Err(BufferPoolReplacerError::FrameOutOfRange(format!(
                "frame_id {} is out of range",
                frame_id
            )));
        }
        Ok(())
    }
}

impl IBufferPoolReplacer for LRUKReplacer {
    fn evict(&mut self) -> Result<Option<FrameId>, BufferPoolReplacerError> {
        if self.curr_size == 0 {
            return Ok(None);
        }

        let mut victim: Option<FrameId> = None;
        // Backward k-distance of the best candidate so far (`None` meaning
        // infinite) and its most recent access.
        let mut victim_key: Option<(Option<u64>, u64)> = None;

        for (&frame_id, node) in &self.node_store {
            if !node.is_evictable {
                continue;
            }
            let latest = match node.history.back() {
                Some(&timestamp) => timestamp,
                None => continue,
            };
            let distance = if node.history.len() >= self.k {
                // Front of the bounded history is the k-th most recent access.
                node.history
                    .front()
                    .map(|&front| self.current_timestamp - front)
            } else {
                None
            };

            let supersedes = match (&victim_key, distance) {
                (None, _) => true,
                // An infinite distance beats any finite one.
                (Some((Some(_), _)), None) => true,
                (Some((Some(best), _)), Some(d)) => d > *best,
                // Both infinite: the frame whose most recent access is
                // oldest wins.
                (Some((None, best_latest)), None) => latest < *best_latest,
                (Some((None, _)), Some(_)) => false,
            };
            if supersedes {
                victim = Some(frame_id);
                victim_key = Some((distance, latest));
            }
        }

        if let Some(frame_id) = victim {
            self.node_store.remove(&frame_id);
            self.curr_size -= 1;
            debug!("lru-k victim: frame {}", frame_id);
        }
        Ok(victim)
    }

    fn record_access(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError> {
        self.check_frame_id(frame_id)?;

        self.current_timestamp += 1;
        let timestamp = self.current_timestamp;
        let k = self.k;

        let node = self.node_store.entry(frame_id).or_insert_with(|| LRUKNode {
            history: VecDeque::with_capacity(k),
            is_evictable: false,
        });
        node.history.push_back(timestamp);
        if node.history.len() > k {
            node.history.pop_front();
        }
        Ok(())
    }

    fn set_evictable(
        &mut self,
        frame_id: FrameId,
        evictable: bool,
    ) -> Result<(), BufferPoolReplacerError> {
        self.check_frame_id(frame_id)?;

        let node = match self.node_store.get_mut(&frame_id) {
            Some(node) => node,
            None => {
                return Err(BufferPoolReplacerError::FrameNotTracked(format!(
                    "frame_id {} has no recorded access",
                    frame_id
                )))
            }
        };

        if node.is_evictable != evictable {
            node.is_evictable = evictable;
            if evictable {
                self.curr_size += 1;
            } else {
                self.curr_size -= 1;
            }
        }
        Ok(())
    }

    fn remove(&mut self, frame_id: FrameId) -> Result<(), BufferPoolReplacerError> {
        self.check_frame_id(frame_id)?;

        match self.node_store.get(&frame_id) {
            None => Ok(()),
            Some(node) if !node.is_evictable => {
                Err(BufferPoolReplacerError::FrameNotEvictable(format!(
                    "frame_id {} is pinned and cannot be removed",
                    frame_id
                )))
            }
            Some(_) => {
                self.node_store.remove(&frame_id);
                self.curr_size -= 1;
                Ok(())
            }
        }
    }

    fn size(&self) -> Result<usize, BufferPoolReplacerError> {
        Ok(self.curr_size)
    }
}
