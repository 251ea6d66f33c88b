//! Utilities shared by the CrowdGuard server and client.

pub mod logger;
pub mod time;
