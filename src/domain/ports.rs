use super::event::ActivityResult;
use super::nonce::{CardNonce, PaymentMethodNonce, VenmoAccountNonce};
use super::request::{ApplePayRequest, Card, GooglePayRequest, VenmoRequest};
use crate::error::GatewayError;
use async_trait::async_trait;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[async_trait]
pub trait CardGateway: Send + Sync {
    async fn tokenize(&self, card: Card) -> GatewayResult<CardNonce>;
}

#[async_trait]
pub trait VenmoGateway: Send + Sync {
    /// Hands control to the Venmo app. `Ok` means the switch was launched,
    /// not that the account was authorized.
    async fn tokenize_venmo_account(&self, request: &VenmoRequest) -> GatewayResult<()>;
    async fn on_activity_result(&self, event: &ActivityResult) -> GatewayResult<VenmoAccountNonce>;
    async fn is_app_switch_available(&self) -> GatewayResult<bool>;
}

#[async_trait]
pub trait GooglePayGateway: Send + Sync {
    async fn is_ready_to_pay(&self) -> GatewayResult<bool>;
    /// Opens the payment sheet. Completion arrives as an activity result.
    async fn request_payment(&self, request: &GooglePayRequest) -> GatewayResult<()>;
    async fn on_activity_result(&self, event: &ActivityResult)
    -> GatewayResult<PaymentMethodNonce>;
}

#[async_trait]
pub trait ApplePayGateway: Send + Sync {
    /// Whether the device can pay with at least one of `supported_networks`.
    async fn can_make_payments(&self, supported_networks: &[String]) -> GatewayResult<bool>;
    /// Presents the payment sheet. The authorized payment arrives later as a
    /// tagged event.
    async fn present_payment_sheet(&self, request: &ApplePayRequest) -> GatewayResult<()>;
    async fn on_payment_authorized(
        &self,
        event: &ActivityResult,
    ) -> GatewayResult<PaymentMethodNonce>;
}

#[async_trait]
pub trait DeviceDataCollector: Send + Sync {
    async fn collect_device_data(&self) -> GatewayResult<String>;
}

pub type CardGatewayBox = Box<dyn CardGateway>;
pub type VenmoGatewayBox = Box<dyn VenmoGateway>;
pub type GooglePayGatewayBox = Box<dyn GooglePayGateway>;
pub type ApplePayGatewayBox = Box<dyn ApplePayGateway>;
pub type DeviceDataCollectorBox = Box<dyn DeviceDataCollector>;

/// The adapter set one session talks to, all built from the same
/// authorization.
pub struct Gateways {
    pub card: CardGatewayBox,
    pub venmo: VenmoGatewayBox,
    pub google_pay: GooglePayGatewayBox,
    pub apple_pay: ApplePayGatewayBox,
    pub device_data: DeviceDataCollectorBox,
}

/// Client-configuration capability: builds a fresh adapter set from an
/// authorization token. The token is not validated here; a bad one shows
/// up when a gateway call fails to authenticate.
pub trait GatewayFactory: Send + Sync {
    fn connect(&self, authorization: &str) -> Gateways;
}
