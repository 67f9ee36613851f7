use super::csv::call_reader::CallType;
use crate::error::{BridgeError, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallStatus {
    Resolved { value: Value },
    Rejected { code: &'static str, message: String },
    /// Launched; the outcome arrives with a later activity result.
    Pending,
    /// Still pending when the script ended.
    Unresolved,
}

impl CallStatus {
    pub fn resolved(value: impl Serialize) -> Result<Self> {
        Ok(CallStatus::Resolved {
            value: serde_json::to_value(value)?,
        })
    }

    pub fn rejected(err: &BridgeError) -> Self {
        let rejection = err.rejection();
        CallStatus::Rejected {
            code: rejection.code,
            message: rejection.message,
        }
    }
}

/// Settled (or parked) outcome of one script line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallOutcome {
    /// 1-based record number in the script.
    pub call: usize,
    pub op: CallType,
    #[serde(flatten)]
    pub status: CallStatus,
}

/// Writes outcomes as JSON lines.
pub struct ResponseWriter<W: Write> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_outcome(&mut self, outcome: &CallOutcome) -> Result<()> {
        serde_json::to_writer(&mut self.writer, outcome)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
