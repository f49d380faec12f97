//! Core utilities: deterministic time management

pub mod time;
