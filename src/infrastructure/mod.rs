//! Gateway adapters implementing the domain ports.

pub mod sandbox;
