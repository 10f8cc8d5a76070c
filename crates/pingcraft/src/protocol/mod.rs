//! Protocol module for pingcraft.
//!
//! This module contains the probe request types, the status client seam and
//! the network implementation of both Minecraft status protocols.

pub mod bedrock;
pub mod client;
pub mod java;
pub mod motd;
pub mod srv;
pub mod types;

pub use client::{BedrockStatus, JavaStatus, NetStatusClient, StatusClient};
pub use types::{ProbeRequest, RawTarget, Variant};
