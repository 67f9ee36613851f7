use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Bridge operation named in the `op` column of a call script.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Setup,
    Card,
    Venmo,
    VenmoAvailable,
    GooglePayAvailable,
    GooglePay,
    ApplePayAvailable,
    ApplePay,
    ActivityResult,
}

/// One row of a call script. Argument meaning depends on `op`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct BridgeCall {
    pub op: CallType,
    #[serde(default)]
    pub arg1: Option<String>,
    #[serde(default)]
    pub arg2: Option<String>,
    #[serde(default)]
    pub arg3: Option<String>,
    #[serde(default)]
    pub arg4: Option<String>,
}

/// Reads bridge calls from a CSV source with header `op,arg1,arg2,arg3,arg4`.
///
/// Fields are trimmed and rows may omit trailing arguments.
pub struct CallReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CallReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes calls in script order.
    pub fn calls(self) -> impl Iterator<Item = Result<BridgeCall>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BridgeError::from))
    }
}
