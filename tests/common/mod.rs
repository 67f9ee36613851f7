#![allow(dead_code)]

use async_trait::async_trait;
use braintree_bridge::config::BridgeConfig;
use braintree_bridge::domain::event::{ActivityResult, RESULT_OK};
use braintree_bridge::domain::flow::FlowKind;
use braintree_bridge::domain::nonce::{CardNonce, PaymentMethodNonce, VenmoAccountNonce};
use braintree_bridge::domain::ports::{
    ApplePayGateway, CardGateway, DeviceDataCollector, GatewayFactory, GatewayResult, Gateways,
    GooglePayGateway, VenmoGateway,
};
use braintree_bridge::domain::request::{ApplePayRequest, Card, GooglePayRequest, VenmoRequest};
use braintree_bridge::error::GatewayError;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn venmo_success() -> ActivityResult {
    ActivityResult::for_flow(
        FlowKind::VenmoAuthorize,
        RESULT_OK,
        json!({"nonce": "venmo-nonce-1", "username": "some-venmo-user"}),
    )
}

pub fn google_pay_success(nonce: &str) -> ActivityResult {
    ActivityResult::for_flow(FlowKind::GooglePayAuthorize, RESULT_OK, json!({ "nonce": nonce }))
}

pub fn apple_pay_success(nonce: &str) -> ActivityResult {
    ActivityResult::for_flow(FlowKind::ApplePayAuthorize, RESULT_OK, json!({ "nonce": nonce }))
}

pub fn line_items(amount: &str) -> String {
    json!([{ "label": "Total", "amount": amount }]).to_string()
}

pub fn failure(kind: FlowKind, message: &str) -> ActivityResult {
    ActivityResult::for_flow(kind, RESULT_OK, json!({ "error": message }))
}

pub fn config() -> BridgeConfig {
    BridgeConfig::default()
}

/// Counts how often each gateway is asked to interpret an activity result.
#[derive(Default, Clone)]
pub struct InterpretCounts {
    pub venmo: Arc<AtomicUsize>,
    pub google_pay: Arc<AtomicUsize>,
    pub apple_pay: Arc<AtomicUsize>,
    pub device_data: Arc<AtomicUsize>,
}

impl InterpretCounts {
    pub fn venmo(&self) -> usize {
        self.venmo.load(Ordering::SeqCst)
    }

    pub fn google_pay(&self) -> usize {
        self.google_pay.load(Ordering::SeqCst)
    }

    pub fn apple_pay(&self) -> usize {
        self.apple_pay.load(Ordering::SeqCst)
    }

    pub fn device_data(&self) -> usize {
        self.device_data.load(Ordering::SeqCst)
    }
}

/// Gateways that echo the event payload and count every interpretation.
#[derive(Default, Clone)]
pub struct CountingGateways {
    pub counts: InterpretCounts,
}

impl GatewayFactory for CountingGateways {
    fn connect(&self, _authorization: &str) -> Gateways {
        Gateways {
            card: Box::new(self.clone()),
            venmo: Box::new(self.clone()),
            google_pay: Box::new(self.clone()),
            apple_pay: Box::new(self.clone()),
            device_data: Box::new(self.clone()),
        }
    }
}

fn nonce_from(payload: &Value) -> GatewayResult<String> {
    payload["nonce"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GatewayError::new("no nonce in payload"))
}

#[async_trait]
impl CardGateway for CountingGateways {
    async fn tokenize(&self, card: Card) -> GatewayResult<CardNonce> {
        Ok(CardNonce {
            nonce: "counted-nonce".to_string(),
            card_type: "Visa".to_string(),
            expiration_month: card.expiration_month,
            expiration_year: card.expiration_year,
            cardholder_name: Some("Test Holder".to_string()),
            last_two: "11".to_string(),
            last_four: "1111".to_string(),
            bin: "411111".to_string(),
        })
    }
}

#[async_trait]
impl VenmoGateway for CountingGateways {
    async fn tokenize_venmo_account(&self, _request: &VenmoRequest) -> GatewayResult<()> {
        Ok(())
    }

    async fn on_activity_result(&self, event: &ActivityResult) -> GatewayResult<VenmoAccountNonce> {
        self.counts.venmo.fetch_add(1, Ordering::SeqCst);
        Ok(VenmoAccountNonce {
            nonce: nonce_from(&event.payload)?,
            username: "counted-user".to_string(),
        })
    }

    async fn is_app_switch_available(&self) -> GatewayResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl GooglePayGateway for CountingGateways {
    async fn is_ready_to_pay(&self) -> GatewayResult<bool> {
        Ok(true)
    }

    async fn request_payment(&self, _request: &GooglePayRequest) -> GatewayResult<()> {
        Ok(())
    }

    async fn on_activity_result(
        &self,
        event: &ActivityResult,
    ) -> GatewayResult<PaymentMethodNonce> {
        self.counts.google_pay.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentMethodNonce {
            nonce: nonce_from(&event.payload)?,
        })
    }
}

#[async_trait]
impl ApplePayGateway for CountingGateways {
    async fn can_make_payments(&self, supported_networks: &[String]) -> GatewayResult<bool> {
        Ok(!supported_networks.is_empty())
    }

    async fn present_payment_sheet(&self, _request: &ApplePayRequest) -> GatewayResult<()> {
        Ok(())
    }

    async fn on_payment_authorized(
        &self,
        event: &ActivityResult,
    ) -> GatewayResult<PaymentMethodNonce> {
        self.counts.apple_pay.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentMethodNonce {
            nonce: nonce_from(&event.payload)?,
        })
    }
}

#[async_trait]
impl DeviceDataCollector for CountingGateways {
    async fn collect_device_data(&self) -> GatewayResult<String> {
        self.counts.device_data.fetch_add(1, Ordering::SeqCst);
        Ok("{}".to_string())
    }
}
