#[cfg(test)]
use mockall::automock;

use crate::dbms::types::{PageData, PageId};

#[derive(Debug, PartialEq, Eq)]
pub enum DiskManagerError {
    /// The page was never allocated, or has been deallocated
    PageNotFound,
    /// Underlying I/O failure
    Io(String),
}

#[cfg_attr(test, automock)]
pub trait IDiskManager {
    /// Persist a page image in the slot for `page_id`.
    fn write_page(&mut self, page_id: PageId, page: &PageData) -> Result<(), DiskManagerError>;
    /// Read back the page image stored for `page_id`.
    fn read_page(&mut self, page_id: PageId) -> Result<PageData, DiskManagerError>;
    /// Mint a fresh page ID and reserve its backing slot. IDs are strictly
    /// increasing and never reused, even after deallocation.
    fn allocate_page(&mut self) -> Result<PageId, DiskManagerError>;
    /// Release the backing slot for `page_id`.
    fn deallocate_page(&mut self, page_id: PageId) -> Result<(), DiskManagerError>;
}
