//! Application layer correlating asynchronous gateway flows with their callers.
//!
//! `Session` is the entry point: it starts flows, arms the `PendingRegistry`
//! for the ones that leave the app, and hands activity-return events to the
//! `ResultCorrelator`, which completes each pending request exactly once with
//! a `CanonicalResult` or a tagged rejection.

pub mod correlator;
pub mod deferred;
pub mod normalizer;
pub mod registry;
pub mod session;
