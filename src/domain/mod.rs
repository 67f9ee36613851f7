//! Domain types shared by every flow: flow kinds, request objects, native
//! gateway results, activity-return events and the gateway ports.

pub mod event;
pub mod flow;
pub mod nonce;
pub mod ports;
pub mod request;
