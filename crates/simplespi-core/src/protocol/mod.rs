//! Link framing
//!
//! The device under test has no "ready" signal: it only sees the clock when
//! the host starts a transaction, and it needs time to move data between its
//! SPI buffer and memory. Everything in here is therefore paced by fixed
//! delays, and the only integrity check is a best-effort echo of the first
//! record of every patch.

pub mod control;
pub mod echo;
pub mod message;
pub mod receive;
pub mod record;
