// ABOUTME: SSH support for reaching the Podman machine VM.
// ABOUTME: Registers identities with the agent and seeds known_hosts on first contact.

mod client;
mod error;
mod trust;

pub use client::{Session, SessionConfig};
pub use error::{Error, Result};
pub use trust::{HostTrust, SshTrust};
