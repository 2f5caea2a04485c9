use crate::dbms::buffer::replacer::LRUKReplacer;
use crate::dbms::storage::disk::testing::InMemoryDiskManager;

use super::BufferPoolManager;

/// Build a pool manager over an in-memory disk manager and an LRU-K
/// replacer, for use in tests.
pub fn create_testing_pool_manager(pool_size: usize, replacer_k: usize) -> BufferPoolManager {
    let disk_manager = InMemoryDiskManager::new();
    let replacer = LRUKReplacer::new(pool_size, replacer_k);
    BufferPoolManager::new(pool_size, Box::new(replacer), Box::new(disk_manager))
}
