use super::correlator::ResultCorrelator;
use super::deferred::Deferred;
use super::normalizer::{self, CanonicalResult};
use super::registry::PendingRegistry;
use crate::config::{BridgeConfig, SlotPolicy};
use crate::domain::event::ActivityResult;
use crate::domain::flow::{FlowKind, PaymentMethodUsage};
use crate::domain::ports::{GatewayFactory, Gateways};
use crate::domain::request::{
    ApplePayLineItem, ApplePayRequest, Card, GooglePayRequest, Price, VenmoRequest,
    default_supported_networks,
};
use crate::error::{BridgeError, GatewayError, Result};
use tracing::{debug, info, warn};

/// One authorized connection to the payment gateways.
///
/// `setup` builds a new session from an authorization token. Replacing a
/// session drops its pending requests, which abandons their callers.
/// Flow-start operations return immediately; asynchronous flows hand back a
/// [`Deferred`] that the host completes by calling
/// [`Session::on_activity_result`] when control returns.
pub struct Session {
    gateways: Gateways,
    registry: PendingRegistry,
    config: BridgeConfig,
}

impl Session {
    /// Creates a session whose gateways are all built from `authorization`.
    ///
    /// The token is not checked; if it is bad, the first gateway call that
    /// needs it fails.
    pub fn setup(factory: &dyn GatewayFactory, authorization: &str, config: BridgeConfig) -> Self {
        info!(
            currency = %config.currency_code,
            slot_policy = ?config.slot_policy,
            "setting up gateway session"
        );
        Self {
            gateways: factory.connect(authorization),
            registry: PendingRegistry::new(),
            config,
        }
    }

    pub async fn is_pending(&self, kind: FlowKind) -> bool {
        self.registry.is_armed(kind).await
    }

    pub async fn get_card_nonce(
        &self,
        card_number: &str,
        expiration_month: &str,
        expiration_year: &str,
        cvv: Option<&str>,
    ) -> Result<CanonicalResult> {
        let card = Card {
            number: card_number.to_string(),
            expiration_month: expiration_month.to_string(),
            expiration_year: expiration_year.to_string(),
            cvv: cvv.map(str::to_string),
        };
        let nonce = self.gateways.card.tokenize(card).await?;
        debug!(card_network = %nonce.card_type, "card tokenized");
        Ok(normalizer::card(nonce))
    }

    /// Starts the Venmo app switch. `payment_method_usage` must be
    /// `"singleUse"` or `"multiUse"`; anything else is a `VenmoError`.
    pub async fn authorize_venmo(&self, vault: bool, payment_method_usage: &str) -> Deferred {
        let kind = FlowKind::VenmoAuthorize;
        let usage = match payment_method_usage.parse::<PaymentMethodUsage>() {
            Ok(usage) => usage,
            Err(e) => {
                let err = BridgeError::Venmo(GatewayError::new(e.to_string()));
                return Deferred::rejected(kind, err);
            }
        };
        let request = VenmoRequest::new(usage).with_vault(vault);

        let deferred = match self.arm(kind).await {
            Ok(deferred) => deferred,
            Err(e) => return Deferred::rejected(kind, e),
        };
        if let Err(e) = self.gateways.venmo.tokenize_venmo_account(&request).await {
            warn!(flow = %kind, error = %e, "failed to launch external activity");
            self.registry
                .complete_and_clear(kind, Err(BridgeError::Venmo(e)))
                .await;
        }
        deferred
    }

    pub async fn is_venmo_available(&self) -> Result<bool> {
        self.gateways
            .venmo
            .is_app_switch_available()
            .await
            .map_err(BridgeError::from)
    }

    pub async fn is_google_pay_available(&self) -> Result<bool> {
        self.gateways
            .google_pay
            .is_ready_to_pay()
            .await
            .map_err(BridgeError::from)
    }

    /// Opens the Google Pay sheet for a final `price` in the configured
    /// currency.
    pub async fn authorize_google_pay(
        &self,
        price: &str,
        billing_address_required: bool,
    ) -> Deferred {
        let kind = FlowKind::GooglePayAuthorize;
        let price = match price.parse::<Price>() {
            Ok(price) => price,
            Err(e) => return Deferred::rejected(kind, e),
        };
        let request = GooglePayRequest::new(price, self.config.currency_code.clone())
            .with_billing_address_required(billing_address_required);

        let deferred = match self.arm(kind).await {
            Ok(deferred) => deferred,
            Err(e) => return Deferred::rejected(kind, e),
        };
        if let Err(e) = self.gateways.google_pay.request_payment(&request).await {
            warn!(flow = %kind, error = %e, "failed to launch external activity");
            self.registry
                .complete_and_clear(kind, Err(BridgeError::Gateway(e)))
                .await;
        }
        deferred
    }

    /// Whether Apple Pay can be used with any of `supported_networks`,
    /// AmEx, Visa and MasterCard when none are given.
    pub async fn is_apple_pay_available(
        &self,
        supported_networks: Option<Vec<String>>,
    ) -> Result<bool> {
        let networks = supported_networks.unwrap_or_else(default_supported_networks);
        self.gateways
            .apple_pay
            .can_make_payments(&networks)
            .await
            .map_err(BridgeError::from)
    }

    /// Presents the Apple Pay sheet for `line_items`, a JSON array of
    /// `{"label", "amount"}` objects with decimal-string amounts.
    pub async fn authorize_apple_pay(
        &self,
        merchant_id: &str,
        line_items: &str,
        contact_fields: Option<Vec<String>>,
        supported_networks: Option<Vec<String>>,
    ) -> Deferred {
        let kind = FlowKind::ApplePayAuthorize;
        let items = match ApplePayLineItem::parse_all(line_items) {
            Ok(items) => items,
            Err(e) => return Deferred::rejected(kind, e),
        };
        let request = ApplePayRequest::new(merchant_id, items, self.config.currency_code.clone())
            .with_billing_contact_fields(contact_fields)
            .with_supported_networks(supported_networks);

        let deferred = match self.arm(kind).await {
            Ok(deferred) => deferred,
            Err(e) => return Deferred::rejected(kind, e),
        };
        if let Err(e) = self.gateways.apple_pay.present_payment_sheet(&request).await {
            warn!(flow = %kind, error = %e, "failed to present payment sheet");
            self.registry
                .complete_and_clear(kind, Err(BridgeError::Gateway(e)))
                .await;
        }
        deferred
    }

    /// Entry point for the host's "external activity returned" signal.
    pub async fn on_activity_result(&self, event: &ActivityResult) -> Option<FlowKind> {
        ResultCorrelator::new(&self.gateways, &self.registry)
            .dispatch(event)
            .await
    }

    async fn arm(&self, kind: FlowKind) -> Result<Deferred> {
        let (handle, deferred) = Deferred::channel(kind);
        match self.config.slot_policy {
            SlotPolicy::RejectWhenArmed => {
                if self.registry.try_arm(kind, handle).await.is_err() {
                    warn!(flow = %kind, "flow already in progress, rejecting new request");
                    return Err(BridgeError::FlowInProgress(kind));
                }
            }
            SlotPolicy::Overwrite => {
                if self.registry.arm(kind, handle).await.is_some() {
                    warn!(flow = %kind, "pending request overwritten, earlier caller abandoned");
                }
            }
        }
        Ok(deferred)
    }
}
