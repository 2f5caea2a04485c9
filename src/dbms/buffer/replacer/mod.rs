pub mod buffer_pool_replacer;
pub mod lru_k_replacer;

pub use buffer_pool_replacer::{BufferPoolReplacerError, IBufferPoolReplacer};
pub use lru_k_replacer::LRUKReplacer;

#[cfg(test)]
pub use buffer_pool_replacer::MockIBufferPoolReplacer;
