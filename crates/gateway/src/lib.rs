//! Request router service library.
//!
//! A stateless pass-through in front of the directory, registry, and ledger
//! services. Forwards requests, relays upstream statuses and bodies,
//! translates connection failures, and keeps short-lived login sessions in
//! the shared cache. No reservation logic lives here.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod upstream;
