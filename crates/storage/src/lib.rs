//! Storage abstraction for paper-vault tier operations.
//!
//! This crate provides the tier-agnostic interface for moving manuscript and
//! video assets between object stores. Two backends implement it:
//!
//! - **Hot tier** (`paper-vault-storage-http`) - low-latency HTTP object
//!   store used for live serving and signed access
//! - **Cold tier** (`paper-vault-storage-s3`) - S3-compatible store used for
//!   durable archival copies
//!
//! Both tiers share one contract (`TierClient`): upload with an explicit
//! upsert flag, download, single/batch delete, copy and move (copy never
//! deletes the source), and signed-URL issuance with an absolute expiry.
//!
//! An in-memory implementation (`MemoryTierClient`) backs tests of code
//! layered on top of the contract.

mod error;
pub mod memory;
mod traits;
mod types;

pub use error::StorageError;
pub use memory::MemoryTierClient;
pub use traits::TierClient;
pub use types::{
    AccessDirection, SignedAccessGrant, UploadOptions, UploadReceipt,
    DEFAULT_SIGNED_URL_TTL_SECS, METADATA_KEY_ORIGINAL_FILENAME, METADATA_KEY_SUBJECT_ID,
    METADATA_KEY_UPLOADED_AT, METADATA_KEY_UPLOADED_BY, STREAMING_SIGNED_URL_TTL_SECS,
};
