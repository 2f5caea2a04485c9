use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use log::debug;
use xxhash_rust::xxh3::Xxh3Builder;

use crate::dbms::buffer::frame::{Frame, IFrame};
use crate::dbms::buffer::replacer::{BufferPoolReplacerError, IBufferPoolReplacer, LRUKReplacer};
use crate::dbms::buffer::types::{
    DiskManagerGeneric, FrameGeneric, PageTable, ReadOnlyFrame, ReplacerGeneric, WritableFrame,
};
use crate::dbms::config::PoolConfig;
use crate::dbms::storage::disk::{DiskManagerError, IDiskManager};
use crate::dbms::types::{FrameId, PageId};

#[derive(Debug, PartialEq, Eq)]
pub enum BufferPoolManagerError {
    /// No free frame and no evictable victim to make room for a page
    NoFrameAvailable,
    /// The requested page is not resident in the buffer pool
    PageNotInPool,
    /// Unpin of a page whose pin count is already zero
    PageNotPinned,
    /// The page still has outstanding pins
    PagePinned,
    /// The page has unflushed modifications
    PageDirty,
    ReplacerError(BufferPoolReplacerError),
    DiskManagerError(DiskManagerError),
}

pub trait IBufferPoolManager {
    /// Allocate a brand new page, pin it in a frame, and return the frame
    /// as writable. The page ID is readable from the returned handle. The
    /// handle must be dropped before the matching `unpin_page` call.
    fn new_page(&self) -> Result<WritableFrame, BufferPoolManagerError>;
    /// Fetch the requested page as readable from the buffer pool, reading
    /// it from disk if it is not resident. Pins the page.
    fn fetch_page(&self, page_id: PageId) -> Result<ReadOnlyFrame, BufferPoolManagerError>;
    /// Fetch the requested page as writable from the buffer pool. Pins the
    /// page.
    fn fetch_page_writable(
        &self,
        page_id: PageId,
    ) -> Result<WritableFrame, BufferPoolManagerError>;
    /// Drop one pin on the target page. A true `is_dirty` marks the frame
    /// dirty; a false one never clears dirtiness left by another writer.
    fn unpin_page(&self, page_id: PageId, is_dirty: bool)
        -> Result<(), BufferPoolManagerError>;
    /// Write the target page to disk and mark it clean. Ignores pin state.
    fn flush_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError>;
    /// Flush every resident page to disk.
    fn flush_all_pages(&self) -> Result<(), BufferPoolManagerError>;
    /// Drop the target page from the pool and release its backing storage.
    /// Deleting a page that is not resident succeeds vacuously; deleting a
    /// pinned or dirty page is refused.
    fn delete_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError>;
}

pub struct BufferPoolManager {
    replacer: Arc<RwLock<ReplacerGeneric>>,
    disk_manager: Arc<RwLock<DiskManagerGeneric>>,
    /// page_id -> frame_id
    page_table: Arc<RwLock<PageTable>>,
    free_frames: Arc<RwLock<VecDeque<FrameId>>>,
    // N.B. Concurrent mutability on each individual frame, not the array
    // itself
    frames: Arc<Vec<RwLock<FrameGeneric>>>,
}

impl BufferPoolManager {
    pub fn new(
        pool_size: usize,
        replacer: ReplacerGeneric,
        disk_manager: DiskManagerGeneric,
    ) -> BufferPoolManager {
        BufferPoolManager {
            replacer: Arc::new(RwLock::new(replacer)),
            disk_manager: Arc::new(RwLock::new(disk_manager)),
            page_table: Arc::new(RwLock::new(HashMap::with_hasher(Xxh3Builder::new()))),
            // All frames start free
            free_frames: Arc::new(RwLock::new((0..pool_size).collect())),
            // Fill the pool with unassigned frames
            frames: Arc::new(
                (0..pool_size)
                    .map(|_| RwLock::new(Box::new(Frame::new()) as FrameGeneric))
                    .collect(),
            ),
        }
    }

    /// Build a pool from a validated [`PoolConfig`], wiring up an LRU-K
    /// replacer of the configured size.
    pub fn with_config(config: &PoolConfig, disk_manager: DiskManagerGeneric) -> BufferPoolManager {
        let replacer = LRUKReplacer::new(config.pool_size, config.replacer_k);
        Self::new(config.pool_size, Box::new(replacer), disk_manager)
    }

    /// Secure a frame for a new resident page: pop the free list, or evict
    /// a victim, writing it back to disk first if dirty. The returned frame
    /// is out of the free list, out of the page table, and untracked by the
    /// replacer.
    fn acquire_frame(
        &self,
        page_table: &mut PageTable,
        replacer: &mut ReplacerGeneric,
        free_frames: &mut VecDeque<FrameId>,
        disk_manager: &mut DiskManagerGeneric,
    ) -> Result<FrameId, BufferPoolManagerError> {
        if let Some(frame_id) = free_frames.pop_front() {
            return Ok(frame_id);
        }

        let frame_id = match replacer
            .evict()
            .map_err(BufferPoolManagerError::ReplacerError)?
        {
            Some(frame_id) => frame_id,
            None => return Err(BufferPoolManagerError::NoFrameAvailable),
        };

        let mut frame = self.frames[frame_id].write().unwrap();
        if let Some(victim_page_id) = frame.page_id() {
            if frame.is_dirty() {
                debug!(
                    "writing back dirty page {} evicted from frame {}",
                    victim_page_id, frame_id
                );
                disk_manager
                    .write_page(victim_page_id, frame.data())
                    .map_err(BufferPoolManagerError::DiskManagerError)?;
                frame.set_clean();
            }
            page_table.remove(&victim_page_id);
        }

        Ok(frame_id)
    }

    /// Put an acquired frame back on the free list after a failed
    /// allocation or disk read, so it is not leaked.
    fn release_frame(&self, free_frames: &mut VecDeque<FrameId>, frame_id: FrameId) {
        let mut frame = self.frames[frame_id].write().unwrap();
        frame.reset();
        free_frames.push_back(frame_id);
    }

    /// Allocate a new page in a frame, pinned, and return its frame ID
    fn new_page_frame(&self) -> Result<FrameId, BufferPoolManagerError> {
        let mut page_table = self.page_table.write().unwrap();
        let mut replacer = self.replacer.write().unwrap();
        let mut free_frames = self.free_frames.write().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        let frame_id =
            self.acquire_frame(&mut page_table, &mut replacer, &mut free_frames, &mut disk_manager)?;

        let page_id = match disk_manager.allocate_page() {
            Ok(page_id) => page_id,
            Err(e) => {
                self.release_frame(&mut free_frames, frame_id);
                return Err(BufferPoolManagerError::DiskManagerError(e));
            }
        };

        {
            let mut frame = self.frames[frame_id].write().unwrap();
            frame.reset();
            frame.assign(page_id);
            frame.increase_pin_count();
        }

        page_table.insert(page_id, frame_id);
        replacer
            .record_access(frame_id)
            .map_err(BufferPoolManagerError::ReplacerError)?;
        replacer
            .set_evictable(frame_id, false)
            .map_err(BufferPoolManagerError::ReplacerError)?;

        debug!("new page {} resident in frame {}", page_id, frame_id);
        Ok(frame_id)
    }

    /// Fetch a page, from disk if needed, pin it, and return its frame ID
    fn fetch_page_frame(&self, page_id: PageId) -> Result<FrameId, BufferPoolManagerError> {
        let mut page_table = self.page_table.write().unwrap();
        let mut replacer = self.replacer.write().unwrap();

        // If the page is resident, pin it and return it immediately.
        if let Some(&frame_id) = page_table.get(&page_id) {
            let mut frame = self.frames[frame_id].write().unwrap();
            frame.increase_pin_count();
            drop(frame);
            replacer
                .record_access(frame_id)
                .map_err(BufferPoolManagerError::ReplacerError)?;
            replacer
                .set_evictable(frame_id, false)
                .map_err(BufferPoolManagerError::ReplacerError)?;
            return Ok(frame_id);
        }

        // Not resident: secure a frame and read the page in from disk.
        let mut free_frames = self.free_frames.write().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        let frame_id =
            self.acquire_frame(&mut page_table, &mut replacer, &mut free_frames, &mut disk_manager)?;

        {
            let mut frame = self.frames[frame_id].write().unwrap();
            frame.reset();
            match disk_manager.read_page(page_id) {
                Ok(data) => {
                    frame.load_data(data);
                    frame.assign(page_id);
                    frame.increase_pin_count();
                }
                Err(e) => {
                    drop(frame);
                    self.release_frame(&mut free_frames, frame_id);
                    return Err(BufferPoolManagerError::DiskManagerError(e));
                }
            }
        }

        page_table.insert(page_id, frame_id);
        replacer
            .record_access(frame_id)
            .map_err(BufferPoolManagerError::ReplacerError)?;
        replacer
            .set_evictable(frame_id, false)
            .map_err(BufferPoolManagerError::ReplacerError)?;

        debug!("page {} loaded from disk into frame {}", page_id, frame_id);
        Ok(frame_id)
    }
}

impl IBufferPoolManager for BufferPoolManager {
    fn new_page(&self) -> Result<WritableFrame, BufferPoolManagerError> {
        let frame_id = self.new_page_frame()?;
        Ok(self.frames[frame_id].write().unwrap())
    }

    fn fetch_page(&self, page_id: PageId) -> Result<ReadOnlyFrame, BufferPoolManagerError> {
        let frame_id = self.fetch_page_frame(page_id)?;
        Ok(self.frames[frame_id].read().unwrap())
    }

    fn fetch_page_writable(
        &self,
        page_id: PageId,
    ) -> Result<WritableFrame, BufferPoolManagerError> {
        let frame_id = self.fetch_page_frame(page_id)?;
        Ok(self.frames[frame_id].write().unwrap())
    }

    fn unpin_page(
        &self,
        page_id: PageId,
        is_dirty: bool,
    ) -> Result<(), BufferPoolManagerError> {
        let page_table = self.page_table.read().unwrap();
        let mut replacer = self.replacer.write().unwrap();

        let frame_id = match page_table.get(&page_id) {
            Some(&frame_id) => frame_id,
            None => return Err(BufferPoolManagerError::PageNotInPool),
        };

        let mut frame = self.frames[frame_id].write().unwrap();
        if frame.pin_count() == 0 {
            return Err(BufferPoolManagerError::PageNotPinned);
        }
        frame.decrease_pin_count();
        if is_dirty {
            frame.set_dirty();
        }
        if frame.pin_count() == 0 {
            replacer
                .set_evictable(frame_id, true)
                .map_err(BufferPoolManagerError::ReplacerError)?;
        }
        Ok(())
    }

    fn flush_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError> {
        let page_table = self.page_table.read().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        let frame_id = match page_table.get(&page_id) {
            Some(&frame_id) => frame_id,
            None => return Err(BufferPoolManagerError::PageNotInPool),
        };

        let mut frame = self.frames[frame_id].write().unwrap();
        disk_manager
            .write_page(page_id, frame.data())
            .map_err(BufferPoolManagerError::DiskManagerError)?;
        frame.set_clean();
        Ok(())
    }

    fn flush_all_pages(&self) -> Result<(), BufferPoolManagerError> {
        let page_table = self.page_table.read().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        for (&page_id, &frame_id) in page_table.iter() {
            let mut frame = self.frames[frame_id].write().unwrap();
            disk_manager
                .write_page(page_id, frame.data())
                .map_err(BufferPoolManagerError::DiskManagerError)?;
            frame.set_clean();
        }
        Ok(())
    }

    fn delete_page(&self, page_id: PageId) -> Result<(), BufferPoolManagerError> {
        let mut page_table = self.page_table.write().unwrap();
        let mut replacer = self.replacer.write().unwrap();
        let mut free_frames = self.free_frames.write().unwrap();
        let mut disk_manager = self.disk_manager.write().unwrap();

        let frame_id = match page_table.get(&page_id) {
            // Deleting a page that is not resident succeeds vacuously.
            Some(&frame_id) => frame_id,
            None => return Ok(()),
        };

        let mut frame = self.frames[frame_id].write().unwrap();
        if frame.pin_count() != 0 {
            return Err(BufferPoolManagerError::PagePinned);
        }
        if frame.is_dirty() {
            return Err(BufferPoolManagerError::PageDirty);
        }

        frame.reset();
        drop(frame);

        page_table.remove(&page_id);
        replacer
            .remove(frame_id)
            .map_err(BufferPoolManagerError::ReplacerError)?;
        free_frames.push_back(frame_id);
        disk_manager
            .deallocate_page(page_id)
            .map_err(BufferPoolManagerError::DiskManagerError)?;

        debug!("deleted page {} from frame {}", page_id, frame_id);
        Ok(())
    }
}
