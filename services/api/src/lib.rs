//! REST backend for the opencourse learning platform: auth with OTP email
//! verification, course and lesson management, enrollment, progress tracking,
//! and the admin surface.

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod infra;
pub mod router;
pub mod state;
pub mod usecase;
