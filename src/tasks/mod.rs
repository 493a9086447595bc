//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Reclamation: Removes entries that have reached the cache interval

mod reaper;

pub(crate) use reaper::{spawn_reaper, ReaperHandle};
