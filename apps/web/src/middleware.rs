//! # ミドルウェア

mod cache_control;

pub use cache_control::no_cache;
