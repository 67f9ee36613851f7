use super::normalizer::{self, CanonicalResult};
use super::registry::PendingRegistry;
use crate::domain::event::ActivityResult;
use crate::domain::flow::FlowKind;
use crate::domain::ports::Gateways;
use crate::error::{BridgeError, Result};
use tracing::{debug, info};

/// Routes an activity-return event to the pending request it belongs to.
///
/// The event's request code names the flow, so only that flow's gateway is
/// asked to interpret it and only that slot is completed.
pub struct ResultCorrelator<'a> {
    gateways: &'a Gateways,
    registry: &'a PendingRegistry,
}

impl<'a> ResultCorrelator<'a> {
    pub fn new(gateways: &'a Gateways, registry: &'a PendingRegistry) -> Self {
        Self { gateways, registry }
    }

    /// Returns the flow whose pending request was completed, or `None` if the
    /// event matched nothing and was dropped.
    pub async fn dispatch(&self, event: &ActivityResult) -> Option<FlowKind> {
        let Some(kind) = event.flow_kind() else {
            debug!(
                request_code = event.request_code,
                "activity result for unknown request code, dropping"
            );
            return None;
        };
        if !self.registry.is_armed(kind).await {
            debug!(flow = %kind, "activity result with no pending request, dropping");
            return None;
        }

        let outcome = match kind {
            FlowKind::VenmoAuthorize => self.resolve_venmo(event).await,
            FlowKind::GooglePayAuthorize => self.resolve_google_pay(event).await,
            FlowKind::ApplePayAuthorize => self.resolve_apple_pay(event).await,
            FlowKind::CardTokenize | FlowKind::GooglePayAvailability => return None,
        };

        match &outcome {
            Ok(_) => info!(flow = %kind, "flow resolved"),
            Err(e) => info!(flow = %kind, code = e.tag(), error = %e, "flow rejected"),
        }
        self.registry
            .complete_and_clear(kind, outcome)
            .await
            .then_some(kind)
    }

    async fn resolve_venmo(&self, event: &ActivityResult) -> Result<CanonicalResult> {
        let account = self
            .gateways
            .venmo
            .on_activity_result(event)
            .await
            .map_err(BridgeError::Venmo)?;

        // Device data is collected only once the account nonce is in hand.
        let device_data = self
            .gateways
            .device_data
            .collect_device_data()
            .await
            .map_err(BridgeError::Venmo)?;
        debug!(device_data_len = device_data.len(), "device data collected");

        Ok(normalizer::venmo(account))
    }

    async fn resolve_google_pay(&self, event: &ActivityResult) -> Result<CanonicalResult> {
        let nonce = self.gateways.google_pay.on_activity_result(event).await?;
        Ok(normalizer::payment_method(nonce))
    }

    async fn resolve_apple_pay(&self, event: &ActivityResult) -> Result<CanonicalResult> {
        let nonce = self.gateways.apple_pay.on_payment_authorized(event).await?;
        Ok(normalizer::payment_method(nonce))
    }
}
