use std::collections::HashMap;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use xxhash_rust::xxh3::Xxh3Builder;

use crate::dbms::buffer::frame::IFrame;
use crate::dbms::buffer::replacer::IBufferPoolReplacer;
use crate::dbms::storage::disk::IDiskManager;
use crate::dbms::types::{FrameId, PageId};

pub type ReplacerGeneric = Box<dyn IBufferPoolReplacer + Send + Sync>;
pub type DiskManagerGeneric = Box<dyn IDiskManager + Send + Sync>;
pub type FrameGeneric = Box<dyn IFrame + Send + Sync>;

/// page_id -> frame index for the pages currently resident in the pool
pub type PageTable = HashMap<PageId, FrameId, Xxh3Builder>;

pub type ReadOnlyFrame<'a> = RwLockReadGuard<'a, FrameGeneric>;
pub type WritableFrame<'a> = RwLockWriteGuard<'a, FrameGeneric>;
