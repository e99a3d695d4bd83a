//! Cold-tier backend: S3-compatible archival storage.
//!
//! Wraps the AWS SDK against an account-scoped custom endpoint (the cold
//! store is S3-compatible, not AWS proper, so the region is a fixed `"auto"`
//! sentinel). Used for durable archival copies of manuscripts and videos and
//! for presigned direct uploads of large files.

mod client;
mod settings;

pub use client::ColdTierClient;
pub use settings::{ColdTierSettings, COLD_TIER_REGION};
