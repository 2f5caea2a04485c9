pub mod frame;
pub mod pool_manager;
pub mod replacer;
pub mod types;
