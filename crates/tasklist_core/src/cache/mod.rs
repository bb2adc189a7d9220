//! Client-side caching of store reads.

pub mod query_cache;
