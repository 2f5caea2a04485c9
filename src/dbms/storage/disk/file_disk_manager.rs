use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use crate::dbms::types::{PageData, PageId, PAGE_SIZE};

use super::{DiskManagerError, IDiskManager};

/// Disk manager backed by a single database file, with pages stored
/// contiguously at `page_id * PAGE_SIZE`.
pub struct FileDiskManager {
    file: File,
    next_page_id: PageId,
}

impl FileDiskManager {
    /// Open the database file at `path`, creating it if absent. The next
    /// page ID to hand out continues from the file's current length, so
    /// IDs stay unique across reopens.
    pub fn open(path: &Path) -> Result<Self, DiskManagerError> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        let len = file
            .metadata()
            .map_err(|e| DiskManagerError::Io(e.to_string()))?
            .len();
        let next_page_id = (len / PAGE_SIZE as u64) as PageId;
        debug!(
            "opened database file {:?}, {} pages on disk",
            path, next_page_id
        );
        Ok(Self { file, next_page_id })
    }

    fn offset(page_id: PageId) -> u64 {
        page_id as u64 * PAGE_SIZE as u64
    }
}

impl IDiskManager for FileDiskManager {
    fn write_page(&mut self, page_id: PageId, page: &PageData) -> Result<(), DiskManagerError> {
        if page_id >= self.next_page_id {
            return Err(DiskManagerError::PageNotFound);
        }
        self.file
            .seek(SeekFrom::Start(Self::offset(page_id)))
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        self.file
            .write_all(page)
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        self.file
            .flush()
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        Ok(())
    }

    fn read_page(&mut self, page_id: PageId) -> Result<PageData, DiskManagerError> {
        if page_id >= self.next_page_id {
            return Err(DiskManagerError::PageNotFound);
        }
        self.file
            .seek(SeekFrom::Start(Self::offset(page_id)))
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        let mut page = [0u8; PAGE_SIZE];
        self.file
            .read_exact(&mut page)
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        Ok(page)
    }

    fn allocate_page(&mut self) -> Result<PageId, DiskManagerError> {
        let page_id = self.next_page_id;
        // Extend the file with a zeroed slot so later reads of a page that
        // was never written still succeed.
        self.file
            .seek(SeekFrom::Start(Self::offset(page_id)))
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        self.file
            .write_all(&[0u8; PAGE_SIZE])
            .map_err(|e| DiskManagerError::Io(e.to_string()))?;
        self.next_page_id += 1;
        Ok(page_id)
    }

    fn deallocate_page(&mut self, _page_id: PageId) -> Result<(), DiskManagerError> {
        // The slot stays in the file; there is no compaction. The ID is
        // never handed out again because the allocation counter only grows.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let mut disk_manager = FileDiskManager::open(&dir.path().join("test.db")).unwrap();

        let page_id = disk_manager.allocate_page().unwrap();
        let page = [42u8; PAGE_SIZE];
        disk_manager.write_page(page_id, &page).unwrap();
        assert_eq!(disk_manager.read_page(page_id).unwrap(), page);
    }

    #[rstest]
    fn test_allocated_page_reads_zeroed() {
        let dir = tempdir().unwrap();
        let mut disk_manager = FileDiskManager::open(&dir.path().join("test.db")).unwrap();

        let page_id = disk_manager.allocate_page().unwrap();
        assert_eq!(disk_manager.read_page(page_id).unwrap(), [0u8; PAGE_SIZE]);
    }

    #[rstest]
    fn test_unallocated_page_not_found() {
        let dir = tempdir().unwrap();
        let mut disk_manager = FileDiskManager::open(&dir.path().join("test.db")).unwrap();

        assert_eq!(
            disk_manager.read_page(0),
            Err(DiskManagerError::PageNotFound)
        );
        assert_eq!(
            disk_manager.write_page(0, &[1u8; PAGE_SIZE]),
            Err(DiskManagerError::PageNotFound)
        );
    }

    #[rstest]
    fn test_allocate_page_ids_increase() {
        let dir = tempdir().unwrap();
        let mut disk_manager = FileDiskManager::open(&dir.path().join("test.db")).unwrap();

        assert_eq!(disk_manager.allocate_page().unwrap(), 0);
        assert_eq!(disk_manager.allocate_page().unwrap(), 1);
        assert_eq!(disk_manager.allocate_page().unwrap(), 2);
    }

    #[rstest]
    fn test_pages_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let page_id = {
            let mut disk_manager = FileDiskManager::open(&path).unwrap();
            let page_id = disk_manager.allocate_page().unwrap();
            disk_manager.write_page(page_id, &[7u8; PAGE_SIZE]).unwrap();
            page_id
        };

        let mut reopened = FileDiskManager::open(&path).unwrap();
        assert_eq!(reopened.read_page(page_id).unwrap(), [7u8; PAGE_SIZE]);
        // The allocation counter continues past the persisted pages.
        assert_eq!(reopened.allocate_page().unwrap(), page_id + 1);
    }
}
