//! Hot-tier backend: HTTP object-store protocol.
//!
//! Wraps the low-latency object store that serves active manuscripts and
//! videos. The protocol is plain HTTP(S): binary upload with content-type
//! and metadata headers, byte download, single and batch delete, server-side
//! copy/move, and signing endpoints for read and write grants.

mod client;
mod settings;

pub use client::HotTierClient;
pub use settings::HotTierSettings;
