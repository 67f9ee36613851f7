//! Script-driven host surface: reads bridge calls, plays them against a
//! session and writes the outcomes.

pub mod csv;
pub mod response_writer;
pub mod runner;
