// src/lib.rs

//! Schedule Crawler Library
//!
//! Extracts class schedules from a university's public schedule pages and
//! serves them through a self-refreshing cache of groups and teachers.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
