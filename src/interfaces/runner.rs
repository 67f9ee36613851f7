use super::csv::call_reader::{BridgeCall, CallType};
use super::response_writer::{CallOutcome, CallStatus, ResponseWriter};
use crate::application::deferred::Deferred;
use crate::application::normalizer::CanonicalResult;
use crate::application::session::Session;
use crate::config::BridgeConfig;
use crate::domain::event::{ActivityResult, RESULT_OK};
use crate::domain::flow::FlowKind;
use crate::domain::ports::GatewayFactory;
use crate::error::{BridgeError, Result};
use serde_json::Value;
use std::io::Write;
use tracing::{debug, error};

/// Plays bridge calls against a session the way a host application would,
/// writing one outcome per settled call.
///
/// Asynchronous flows are parked as `pending` and reported again once an
/// `activity_result` call settles them.
pub struct ScriptRunner<'a, W: Write> {
    factory: &'a dyn GatewayFactory,
    config: BridgeConfig,
    session: Option<Session>,
    pending: Vec<(usize, CallType, Deferred)>,
    writer: ResponseWriter<W>,
}

impl<'a, W: Write> ScriptRunner<'a, W> {
    pub fn new(factory: &'a dyn GatewayFactory, config: BridgeConfig, writer: W) -> Self {
        Self {
            factory,
            config,
            session: None,
            pending: Vec::new(),
            writer: ResponseWriter::new(writer),
        }
    }

    /// Runs every call in order. Unreadable rows are logged and skipped.
    pub async fn run(
        mut self,
        calls: impl Iterator<Item = Result<BridgeCall>>,
    ) -> Result<ResponseWriter<W>> {
        for (index, call) in calls.enumerate() {
            match call {
                Ok(call) => self.execute(index + 1, call).await?,
                Err(e) => error!("Error reading bridge call {}: {}", index + 1, e),
            }
        }
        self.finish()
    }

    pub async fn execute(&mut self, number: usize, call: BridgeCall) -> Result<()> {
        debug!(call = number, op = ?call.op, "executing bridge call");
        let status = match self.dispatch(number, &call).await {
            Ok(Some(status)) => status,
            Ok(None) => CallStatus::Pending,
            Err(e) => CallStatus::rejected(&e),
        };
        // An activity result only reports the flows it settled.
        if call.op != CallType::ActivityResult || !matches!(status, CallStatus::Pending) {
            self.emit(number, call.op, status)?;
        }
        self.sweep()
    }

    /// Reports anything still waiting and hands back the writer.
    pub fn finish(mut self) -> Result<ResponseWriter<W>> {
        self.sweep()?;
        for (number, op, _) in std::mem::take(&mut self.pending) {
            self.emit(number, op, CallStatus::Unresolved)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// `Ok(None)` means the call parked a deferred result.
    async fn dispatch(&mut self, number: usize, call: &BridgeCall) -> Result<Option<CallStatus>> {
        match call.op {
            CallType::Setup => {
                let token = call.arg1.as_deref().unwrap_or_default();
                self.session = Some(Session::setup(self.factory, token, self.config.clone()));
                CallStatus::resolved(true).map(Some)
            }
            CallType::Card => {
                let result = self
                    .session()?
                    .get_card_nonce(
                        required(&call.arg1, "cardNumber")?,
                        required(&call.arg2, "expirationMonth")?,
                        required(&call.arg3, "expirationYear")?,
                        call.arg4.as_deref(),
                    )
                    .await?;
                CallStatus::resolved(result).map(Some)
            }
            CallType::VenmoAvailable => {
                CallStatus::resolved(self.session()?.is_venmo_available().await?).map(Some)
            }
            CallType::GooglePayAvailable => {
                CallStatus::resolved(self.session()?.is_google_pay_available().await?).map(Some)
            }
            CallType::Venmo => {
                let vault = parse_bool(&call.arg1, "vault", false)?;
                let usage = call.arg2.as_deref().unwrap_or("singleUse");
                let deferred = self.session()?.authorize_venmo(vault, usage).await;
                self.park(number, call.op, deferred)
            }
            CallType::GooglePay => {
                let price = required(&call.arg1, "price")?;
                let billing_address_required =
                    parse_bool(&call.arg2, "billingAddressRequired", true)?;
                let deferred = self
                    .session()?
                    .authorize_google_pay(price, billing_address_required)
                    .await;
                self.park(number, call.op, deferred)
            }
            CallType::ApplePayAvailable => {
                let networks = list(&call.arg1);
                CallStatus::resolved(self.session()?.is_apple_pay_available(networks).await?)
                    .map(Some)
            }
            CallType::ApplePay => {
                let merchant_id = required(&call.arg1, "merchantId")?;
                let line_items = required(&call.arg2, "lineItems")?;
                let deferred = self
                    .session()?
                    .authorize_apple_pay(
                        merchant_id,
                        line_items,
                        list(&call.arg3),
                        list(&call.arg4),
                    )
                    .await;
                self.park(number, call.op, deferred)
            }
            CallType::ActivityResult => {
                let event = activity_result(call)?;
                if self.session()?.on_activity_result(&event).await.is_none() {
                    debug!(call = number, "activity result matched no pending flow");
                }
                Ok(None)
            }
        }
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(BridgeError::NotInitialized)
    }

    fn park(
        &mut self,
        number: usize,
        op: CallType,
        mut deferred: Deferred,
    ) -> Result<Option<CallStatus>> {
        match deferred.try_take() {
            Some(outcome) => settled(outcome).map(Some),
            None => {
                debug!(call = number, flow = %deferred.kind(), "waiting for activity result");
                self.pending.push((number, op, deferred));
                Ok(None)
            }
        }
    }

    fn sweep(&mut self) -> Result<()> {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for (number, op, mut deferred) in std::mem::take(&mut self.pending) {
            match deferred.try_take() {
                Some(outcome) => {
                    let status = settled(outcome)?;
                    self.emit(number, op, status)?;
                }
                None => still_pending.push((number, op, deferred)),
            }
        }
        self.pending = still_pending;
        Ok(())
    }

    fn emit(&mut self, call: usize, op: CallType, status: CallStatus) -> Result<()> {
        self.writer.write_outcome(&CallOutcome { call, op, status })
    }
}

fn settled(outcome: Result<CanonicalResult>) -> Result<CallStatus> {
    match outcome {
        Ok(result) => CallStatus::resolved(result),
        Err(e) => Ok(CallStatus::rejected(&e)),
    }
}

fn required<'c>(arg: &'c Option<String>, name: &str) -> Result<&'c str> {
    arg.as_deref()
        .ok_or_else(|| BridgeError::InvalidArgument(format!("missing {name}")))
}

fn parse_bool(arg: &Option<String>, name: &str, default: bool) -> Result<bool> {
    match arg.as_deref() {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            BridgeError::InvalidArgument(format!("{name} must be true or false, got '{raw}'"))
        }),
    }
}

/// A `|`-separated list such as `Visa|AmEx`; `None` when the argument is absent.
fn list(arg: &Option<String>) -> Option<Vec<String>> {
    arg.as_deref().map(|raw| {
        raw.split('|')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// `arg1` names the flow (`venmo`, `google_pay`, `apple_pay`) or gives a raw request code,
/// `arg2` is the result code (default `RESULT_OK`), `arg3` the JSON payload.
fn activity_result(call: &BridgeCall) -> Result<ActivityResult> {
    let target = required(&call.arg1, "request code")?;
    let request_code = match target {
        "venmo" => FlowKind::VenmoAuthorize.request_code(),
        "google_pay" => FlowKind::GooglePayAuthorize.request_code(),
        "apple_pay" => FlowKind::ApplePayAuthorize.request_code(),
        raw => raw.parse().ok(),
    }
    .ok_or_else(|| BridgeError::InvalidArgument(format!("unknown request code '{target}'")))?;

    let result_code = match call.arg2.as_deref() {
        None => RESULT_OK,
        Some(raw) => raw
            .parse()
            .map_err(|_| BridgeError::InvalidArgument(format!("invalid result code '{raw}'")))?,
    };
    let payload = match call.arg3.as_deref() {
        None => Value::Null,
        Some(raw) => serde_json::from_str(raw)?,
    };
    Ok(ActivityResult::new(request_code, result_code, payload))
}
