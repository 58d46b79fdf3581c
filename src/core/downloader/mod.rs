mod client;

pub use client::{CacheStatus, Downloader};
