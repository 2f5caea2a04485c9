use crate::dbms::types::{PageData, PageId, PAGE_SIZE};

pub trait IFrame {
    /// Get the ID of the page currently held by this frame, or `None` if
    /// the frame is unassigned.
    fn page_id(&self) -> Option<PageId>;
    /// Get a readable view of the frame's data
    fn data(&self) -> &PageData;
    /// Overwrite the whole frame with a page image read from disk. Does not
    /// mark the frame dirty.
    fn load_data(&mut self, data: PageData);
    /// Write a slice of the frame, starting from the given offset, and set
    /// the frame to dirty
    fn write_data(&mut self, offset: usize, data: &[u8]);
    /// Get whether the frame has diverged from its disk copy
    fn is_dirty(&self) -> bool;
    /// Set the frame to dirty
    fn set_dirty(&mut self);
    /// Set the frame to clean
    fn set_clean(&mut self);
    /// Get the number of outstanding pins on the frame
    fn pin_count(&self) -> usize;
    /// Increase the pin count of the frame by 1
    fn increase_pin_count(&mut self);
    /// Decrease the pin count of the frame by 1
    fn decrease_pin_count(&mut self);
    /// Assign the frame to the given page
    fn assign(&mut self, page_id: PageId);
    /// Return the frame to its unassigned state: zeroed data, clean,
    /// unpinned, no page ID. Called on every reassignment before the new
    /// page's contents are read in.
    fn reset(&mut self);
}

pub struct Frame {
    data: Box<PageData>,
    page_id: Option<PageId>,
    pin_count: usize,
    is_dirty: bool,
}

impl Frame {
    pub fn new() -> Frame {
        Frame {
            data: Box::new([0; PAGE_SIZE]),
            page_id: None,
            pin_count: 0,
            is_dirty: false,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl IFrame for Frame {
    fn page_id(&self) -> Option<PageId> {
        self.page_id
    }

    fn data(&self) -> &PageData {
        &self.data
    }

    fn load_data(&mut self, data: PageData) {
        *self.data = data;
    }

    fn write_data(&mut self, offset: usize, data: &[u8]) {
        self.is_dirty = true;
        self.data[offset..offset + data.len()].copy_from_slice(data);
    }

    fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    fn set_dirty(&mut self) {
        self.is_dirty = true;
    }

    fn set_clean(&mut self) {
        self.is_dirty = false;
    }

    fn pin_count(&self) -> usize {
        self.pin_count
    }

    fn increase_pin_count(&mut self) {
        self.pin_count += 1;
    }

    fn decrease_pin_count(&mut self) {
        self.pin_count = self.pin_count.saturating_sub(1);
    }

    fn assign(&mut self, page_id: PageId) {
        self.page_id = Some(page_id);
    }

    fn reset(&mut self) {
        self.data.fill(0);
        self.page_id = None;
        self.pin_count = 0;
        self.is_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_frame_is_unassigned() {
        let frame = Frame::new();
        assert_eq!(frame.page_id(), None);
        assert_eq!(frame.pin_count(), 0);
        assert!(!frame.is_dirty());
        assert_eq!(frame.data()[..], [0; PAGE_SIZE]);
    }

    #[rstest]
    fn test_write_data() {
        let mut frame = Frame::new();
        assert!(!frame.is_dirty());

        let new_data = [1; 16];
        frame.write_data(32, &new_data);

        let data = frame.data();
        assert_eq!(data[0..32], [0; 32]);
        assert_eq!(data[32..48], new_data);
        assert_eq!(data[48..PAGE_SIZE], [0; PAGE_SIZE - 48]);
        assert!(frame.is_dirty());
    }

    #[rstest]
    fn test_load_data_does_not_dirty() {
        let mut frame = Frame::new();
        frame.load_data([7; PAGE_SIZE]);
        assert_eq!(frame.data()[..], [7; PAGE_SIZE]);
        assert!(!frame.is_dirty());
    }

    #[rstest]
    fn test_assign() {
        let mut frame = Frame::new();
        frame.assign(123);
        assert_eq!(frame.page_id(), Some(123));
    }

    #[rstest]
    fn test_set_dirty_clean() {
        let mut frame = Frame::new();
        assert!(!frame.is_dirty());
        frame.set_dirty();
        assert!(frame.is_dirty());
        frame.set_clean();
        assert!(!frame.is_dirty());
    }

    #[rstest]
    fn test_pin_count() {
        let mut frame = Frame::new();
        assert_eq!(frame.pin_count(), 0);
        frame.increase_pin_count();
        frame.increase_pin_count();
        assert_eq!(frame.pin_count(), 2);
        frame.decrease_pin_count();
        assert_eq!(frame.pin_count(), 1);
    }

    #[rstest]
    fn test_decrease_pin_count_saturates() {
        let mut frame = Frame::new();
        frame.decrease_pin_count();
        assert_eq!(frame.pin_count(), 0);
    }

    #[rstest]
    fn test_reset() {
        let mut frame = Frame::new();
        frame.assign(7);
        frame.increase_pin_count();
        frame.write_data(0, &[9; 64]);

        frame.reset();

        assert_eq!(frame.page_id(), None);
        assert_eq!(frame.pin_count(), 0);
        assert!(!frame.is_dirty());
        assert_eq!(frame.data()[..], [0; PAGE_SIZE]);
    }
}
