//! IRC protocol layer: transport, framing, handshake, and the two halves of
//! a running session.

pub mod error;
pub mod framer;
pub mod handshake;
pub mod message;
pub mod router;
pub mod sender;
pub mod session;
pub mod transport;
pub mod writer;
