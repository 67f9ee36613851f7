use clap::ValueEnum;

pub const DEFAULT_CURRENCY_CODE: &str = "USD";

/// What a flow-start does when its flow kind already has a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SlotPolicy {
    /// Reject the new flow with `FlowInProgress`; the pending one is untouched.
    #[default]
    RejectWhenArmed,
    /// Replace the pending handle. The earlier caller is abandoned.
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Currency code sent with every Google Pay transaction.
    pub currency_code: String,
    pub slot_policy: SlotPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            slot_policy: SlotPolicy::default(),
        }
    }
}

impl BridgeConfig {
    pub fn with_currency_code(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = currency_code.into();
        self
    }

    pub fn with_slot_policy(mut self, slot_policy: SlotPolicy) -> Self {
        self.slot_policy = slot_policy;
        self
    }
}
