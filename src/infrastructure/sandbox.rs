use crate::domain::event::ActivityResult;
use crate::domain::nonce::{CardNonce, PaymentMethodNonce, VenmoAccountNonce};
use crate::domain::ports::{
    ApplePayGateway, CardGateway, DeviceDataCollector, GatewayFactory, GatewayResult, Gateways,
    GooglePayGateway, VenmoGateway,
};
use crate::domain::request::{ApplePayRequest, Card, GooglePayRequest, VenmoRequest};
use crate::error::GatewayError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Nonce returned for every card the sandbox accepts.
pub const SANDBOX_CARD_NONCE: &str = "fake-nonce";
/// Networks the sandbox wallet holds a card for.
pub const SANDBOX_WALLET_NETWORKS: [&str; 4] = ["AmEx", "Visa", "MasterCard", "Discover"];

/// An external activity launched through the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum LaunchRecord {
    Venmo(VenmoRequest),
    GooglePay(GooglePayRequest),
    ApplePay(ApplePayRequest),
}

#[derive(Debug, Clone)]
struct SandboxBehavior {
    google_pay_ready: bool,
    apple_pay_ready: bool,
    device_data_failure: Option<String>,
    launch_failure: Option<String>,
}

impl Default for SandboxBehavior {
    fn default() -> Self {
        Self {
            google_pay_ready: true,
            apple_pay_ready: true,
            device_data_failure: None,
            launch_failure: None,
        }
    }
}

/// Deterministic stand-in for the native payment SDK.
///
/// Card numbers are Luhn-checked and tokenized to [`SANDBOX_CARD_NONCE`].
/// Venmo and the wallet sheets read their outcome from the event payload:
/// `{"nonce": .., "username": ..}` / `{"nonce": ..}` on success, or
/// `{"error": ".."}`. An empty authorization fails every remote call.
#[derive(Default, Clone)]
pub struct SandboxGateways {
    behavior: SandboxBehavior,
    launches: Arc<RwLock<Vec<LaunchRecord>>>,
}

impl SandboxGateways {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_google_pay_ready(mut self, ready: bool) -> Self {
        self.behavior.google_pay_ready = ready;
        self
    }

    pub fn with_apple_pay_ready(mut self, ready: bool) -> Self {
        self.behavior.apple_pay_ready = ready;
        self
    }

    pub fn with_device_data_failure(mut self, message: impl Into<String>) -> Self {
        self.behavior.device_data_failure = Some(message.into());
        self
    }

    pub fn with_launch_failure(mut self, message: impl Into<String>) -> Self {
        self.behavior.launch_failure = Some(message.into());
        self
    }

    /// Every activity launched so far, across all sessions built by this factory.
    pub async fn launches(&self) -> Vec<LaunchRecord> {
        self.launches.read().await.clone()
    }
}

impl GatewayFactory for SandboxGateways {
    fn connect(&self, authorization: &str) -> Gateways {
        let client = SandboxClient {
            authorization: authorization.to_string(),
            behavior: self.behavior.clone(),
            launches: self.launches.clone(),
        };
        Gateways {
            card: Box::new(client.clone()),
            venmo: Box::new(client.clone()),
            google_pay: Box::new(client.clone()),
            apple_pay: Box::new(client.clone()),
            device_data: Box::new(client),
        }
    }
}

#[derive(Clone)]
struct SandboxClient {
    authorization: String,
    behavior: SandboxBehavior,
    launches: Arc<RwLock<Vec<LaunchRecord>>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadOutcome<T> {
    Failure { error: String },
    Success(T),
}

impl SandboxClient {
    fn authenticate(&self) -> GatewayResult<()> {
        if self.authorization.trim().is_empty() {
            return Err(GatewayError::new("Authorization fingerprint is invalid"));
        }
        Ok(())
    }

    async fn launch(&self, record: LaunchRecord) -> GatewayResult<()> {
        self.authenticate()?;
        if let Some(message) = &self.behavior.launch_failure {
            return Err(GatewayError::new(message.clone()));
        }
        self.launches.write().await.push(record);
        Ok(())
    }

    fn interpret<T: DeserializeOwned>(
        &self,
        event: &ActivityResult,
        product: &str,
    ) -> GatewayResult<T> {
        self.authenticate()?;
        if event.is_canceled() {
            return Err(GatewayError::new(format!("User canceled {product}.")));
        }
        match serde_json::from_value::<PayloadOutcome<T>>(event.payload.clone()) {
            Ok(PayloadOutcome::Success(value)) => Ok(value),
            Ok(PayloadOutcome::Failure { error }) => Err(GatewayError::new(error)),
            Err(e) => Err(GatewayError::new(format!(
                "Unable to read {product} response: {e}"
            ))),
        }
    }
}

fn luhn_valid(number: &str) -> bool {
    if number.len() < 12 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| match i % 2 {
            0 => d,
            _ if d * 2 > 9 => d * 2 - 9,
            _ => d * 2,
        })
        .sum();
    sum % 10 == 0
}

fn card_network(number: &str) -> &'static str {
    let prefix = |len: usize| number.get(..len).and_then(|p| p.parse::<u32>().ok());
    match (prefix(1), prefix(2), prefix(4)) {
        (Some(4), _, _) => "Visa",
        (_, Some(34 | 37), _) => "AMEX",
        (_, Some(51..=55), _) | (_, _, Some(2221..=2720)) => "MasterCard",
        (_, Some(65), _) | (_, _, Some(6011)) => "Discover",
        _ => "Unknown",
    }
}

#[async_trait]
impl CardGateway for SandboxClient {
    async fn tokenize(&self, card: Card) -> GatewayResult<CardNonce> {
        self.authenticate()?;
        let number = card.number.trim();
        if !luhn_valid(number) {
            return Err(GatewayError::new("Credit card number is invalid"));
        }
        Ok(CardNonce {
            nonce: SANDBOX_CARD_NONCE.to_string(),
            card_type: card_network(number).to_string(),
            expiration_month: card.expiration_month,
            expiration_year: card.expiration_year,
            cardholder_name: None,
            last_two: number[number.len() - 2..].to_string(),
            last_four: number[number.len() - 4..].to_string(),
            bin: number[..6].to_string(),
        })
    }
}

#[async_trait]
impl VenmoGateway for SandboxClient {
    async fn tokenize_venmo_account(&self, request: &VenmoRequest) -> GatewayResult<()> {
        self.launch(LaunchRecord::Venmo(request.clone())).await
    }

    async fn on_activity_result(&self, event: &ActivityResult) -> GatewayResult<VenmoAccountNonce> {
        self.interpret(event, "Venmo")
    }

    async fn is_app_switch_available(&self) -> GatewayResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl GooglePayGateway for SandboxClient {
    async fn is_ready_to_pay(&self) -> GatewayResult<bool> {
        self.authenticate()?;
        Ok(self.behavior.google_pay_ready)
    }

    async fn request_payment(&self, request: &GooglePayRequest) -> GatewayResult<()> {
        self.launch(LaunchRecord::GooglePay(request.clone())).await
    }

    async fn on_activity_result(
        &self,
        event: &ActivityResult,
    ) -> GatewayResult<PaymentMethodNonce> {
        self.interpret(event, "Google Pay")
    }
}

#[async_trait]
impl ApplePayGateway for SandboxClient {
    async fn can_make_payments(&self, supported_networks: &[String]) -> GatewayResult<bool> {
        Ok(self.behavior.apple_pay_ready
            && supported_networks
                .iter()
                .any(|network| SANDBOX_WALLET_NETWORKS.contains(&network.as_str())))
    }

    async fn present_payment_sheet(&self, request: &ApplePayRequest) -> GatewayResult<()> {
        self.launch(LaunchRecord::ApplePay(request.clone())).await
    }

    async fn on_payment_authorized(
        &self,
        event: &ActivityResult,
    ) -> GatewayResult<PaymentMethodNonce> {
        self.interpret(event, "Apple Pay")
    }
}

#[async_trait]
impl DeviceDataCollector for SandboxClient {
    async fn collect_device_data(&self) -> GatewayResult<String> {
        self.authenticate()?;
        if let Some(message) = &self.behavior.device_data_failure {
            return Err(GatewayError::new(message.clone()));
        }
        Ok(serde_json::json!({ "correlation_id": "sandbox-correlation-id" }).to_string())
    }
}
