//! Allocator bridge service library.
//!
//! This crate primarily ships the `bridge-server` binary, but the full
//! surface is exposed as a library so the allocator process can embed the
//! bridge directly and so integration tests can drive it in-process.

pub mod allocator;
pub mod api;
pub mod config;
pub mod dispatch;
pub mod multipart;
pub mod state;
