//! The defaulting authority: the collaborator that fills schema defaults
//! into a declaration before it is compiled.
//!
//! Transport is out of scope. This module owns what is sent, how answers
//! are interpreted and the startup liveness gate; implementations of
//! [`DefaultingAuthority`] own the wire.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::ConvertError;

/// Fills schema defaults into a declaration.
pub trait DefaultingAuthority {
    /// Succeeds once the authority answers.
    fn probe(&self) -> Result<(), ConvertError>;

    /// Return the fully defaulted form of `declaration` (an `ADC` tree).
    fn add_defaults(&self, declaration: &Map<String, Value>)
        -> Result<Map<String, Value>, ConvertError>;
}

/// For declarations that arrive already defaulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Predefaulted;

impl DefaultingAuthority for Predefaulted {
    fn probe(&self) -> Result<(), ConvertError> {
        Ok(())
    }

    fn add_defaults(
        &self,
        declaration: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ConvertError> {
        Ok(declaration.clone())
    }
}

/// Where defaulting requests are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityKind {
    /// A standalone schema validator.
    Validator,
    /// A device's declarative API, used in dry-run mode.
    Device,
}

impl AuthorityKind {
    /// Request path for defaulting calls.
    pub fn defaults_path(self) -> &'static str {
        match self {
            Self::Validator => "/validate",
            Self::Device => "/mgmt/shared/appsvcs/declare?show=full",
        }
    }

    /// Request path for the liveness probe.
    pub fn probe_path(self) -> &'static str {
        match self {
            Self::Validator => "/any",
            Self::Device => "/mgmt/shared/appsvcs/info",
        }
    }
}

/// The JSON body sent to an authority of `kind`.
pub fn shape_request(kind: AuthorityKind, declaration: &Map<String, Value>) -> Value {
    match kind {
        AuthorityKind::Validator => {
            let mut body = declaration.clone();
            body.insert("scratch".to_string(), json!("defaults-only"));
            Value::Object(body)
        }
        AuthorityKind::Device => json!({
            "class": "AS3",
            "action": "dry-run",
            "persist": false,
            "declaration": declaration,
        }),
    }
}

/// A raw authority answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityResponse {
    pub status: u16,
    pub body: String,
}

impl AuthorityResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Turn an authority answer into the defaulted declaration.
///
/// `request` is the declaration that was sent; device answers without a
/// `declaration` field fall back to it. An asynchronous (202) answer is a
/// failure: the pipeline never polls.
pub fn interpret_response(
    kind: AuthorityKind,
    request: &Map<String, Value>,
    response: &AuthorityResponse,
) -> Result<Map<String, Value>, ConvertError> {
    match response.status {
        200 => {
            let parsed: Value = serde_json::from_str(&response.body)
                .map_err(|err| upstream(200, format!("response is not JSON: {err}")))?;
            let Value::Object(mut body) = parsed else {
                return Err(upstream(200, "response is not a JSON object"));
            };
            match kind {
                AuthorityKind::Validator => Ok(body),
                AuthorityKind::Device => match body.remove("declaration") {
                    Some(Value::Object(declaration)) => Ok(declaration),
                    Some(_) => Err(upstream(200, "response 'declaration' is not an object")),
                    None => Ok(request.clone()),
                },
            }
        }
        202 => Err(upstream(
            202,
            format!(
                "authority switched to asynchronous mode; not supported: {}",
                response.body
            ),
        )),
        status => Err(upstream(status, response.body.clone())),
    }
}

fn upstream(status: u16, message: impl Into<String>) -> ConvertError {
    ConvertError::UpstreamDefaultingFailure {
        status: status.to_string(),
        message: message.into(),
    }
}

/// Replays captured authority answers and records what it was sent.
#[derive(Debug)]
pub struct RecordedAuthority {
    kind: AuthorityKind,
    probe_status: u16,
    response: AuthorityResponse,
    sent: Mutex<Vec<Value>>,
}

impl RecordedAuthority {
    pub fn new(kind: AuthorityKind, response: AuthorityResponse) -> Self {
        Self {
            kind,
            probe_status: 200,
            response,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_probe_status(mut self, status: u16) -> Self {
        self.probe_status = status;
        self
    }

    /// Request bodies shaped so far.
    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl DefaultingAuthority for RecordedAuthority {
    fn probe(&self) -> Result<(), ConvertError> {
        if self.probe_status == 200 {
            Ok(())
        } else {
            Err(upstream(
                self.probe_status,
                format!("probe of {} failed", self.kind.probe_path()),
            ))
        }
    }

    fn add_defaults(
        &self,
        declaration: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ConvertError> {
        let request = shape_request(self.kind, declaration);
        debug!(path = self.kind.defaults_path(), "defaulting request shaped");
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request);
        }
        interpret_response(self.kind, declaration, &self.response)
    }
}

/// Liveness gate policy: fixed attempts at a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            interval: Duration::from_secs(10),
        }
    }
}

/// Block until `authority` answers its probe, or fail once `policy` is
/// exhausted.
pub fn wait_for_authority(
    authority: &dyn DefaultingAuthority,
    policy: ProbePolicy,
) -> Result<(), ConvertError> {
    let attempts = policy.attempts.max(1);
    let mut last = None;
    for attempt in 1..=attempts {
        match authority.probe() {
            Ok(()) => return Ok(()),
            Err(err) => {
                warn!(
                    attempt,
                    remaining = attempts - attempt,
                    error = %err,
                    "defaulting authority not ready"
                );
                last = Some(err);
            }
        }
        if attempt < attempts {
            thread::sleep(policy.interval);
        }
    }
    Err(ConvertError::UpstreamDefaultingFailure {
        status: "unavailable".to_string(),
        message: format!(
            "defaulting authority not available after {attempts} attempts{}",
            last.map(|err| format!(": {err}")).unwrap_or_default()
        ),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use serde_json::{json, Map, Value};

    use super::{
        interpret_response, shape_request, wait_for_authority, AuthorityKind, AuthorityResponse,
        DefaultingAuthority, ProbePolicy, RecordedAuthority,
    };
    use crate::error::ConvertError;

    fn declaration() -> Map<String, Value> {
        json!({"class": "ADC", "schemaVersion": "3.40.0"})
            .as_object()
            .cloned()
            .expect("object")
    }

    #[test]
    fn validator_requests_ask_for_defaults_only() {
        let body = shape_request(AuthorityKind::Validator, &declaration());
        assert_eq!(body["scratch"], json!("defaults-only"));
        assert_eq!(body["class"], json!("ADC"));
    }

    #[test]
    fn device_requests_use_dry_run_envelope() {
        let body = shape_request(AuthorityKind::Device, &declaration());
        assert_eq!(
            body,
            json!({
                "class": "AS3",
                "action": "dry-run",
                "persist": false,
                "declaration": {"class": "ADC", "schemaVersion": "3.40.0"}
            })
        );
    }

    #[test]
    fn device_answers_unwrap_declaration_or_fall_back() {
        let request = declaration();
        let with = AuthorityResponse::new(200, r#"{"declaration": {"class": "ADC", "id": "x"}}"#);
        let out = interpret_response(AuthorityKind::Device, &request, &with).expect("unwrap");
        assert_eq!(out["id"], json!("x"));

        let without = AuthorityResponse::new(200, r#"{"results": []}"#);
        let out = interpret_response(AuthorityKind::Device, &request, &without).expect("fallback");
        assert_eq!(out, request);
    }

    #[test]
    fn async_and_error_answers_fail() {
        let request = declaration();
        let pending = AuthorityResponse::new(202, r#"{"id": "task"}"#);
        let err = interpret_response(AuthorityKind::Device, &request, &pending).expect_err("202");
        assert!(matches!(
            err,
            ConvertError::UpstreamDefaultingFailure { ref status, .. } if status == "202"
        ));

        let rejected = AuthorityResponse::new(422, "invalid declaration");
        let err =
            interpret_response(AuthorityKind::Validator, &request, &rejected).expect_err("422");
        assert_eq!(
            err,
            ConvertError::UpstreamDefaultingFailure {
                status: "422".to_string(),
                message: "invalid declaration".to_string()
            }
        );
    }

    #[test]
    fn recorded_authority_records_shaped_requests() {
        let authority = RecordedAuthority::new(
            AuthorityKind::Validator,
            AuthorityResponse::new(200, r#"{"class": "ADC", "filled": true}"#),
        );
        let out = authority.add_defaults(&declaration()).expect("defaults");
        assert_eq!(out["filled"], json!(true));
        assert_eq!(authority.sent()[0]["scratch"], json!("defaults-only"));
    }

    struct Flaky {
        failures_left: Cell<u32>,
    }

    impl DefaultingAuthority for Flaky {
        fn probe(&self) -> Result<(), ConvertError> {
            if self.failures_left.get() == 0 {
                return Ok(());
            }
            self.failures_left.set(self.failures_left.get() - 1);
            Err(ConvertError::UpstreamDefaultingFailure {
                status: "503".to_string(),
                message: "starting".to_string(),
            })
        }

        fn add_defaults(
            &self,
            declaration: &Map<String, Value>,
        ) -> Result<Map<String, Value>, ConvertError> {
            Ok(declaration.clone())
        }
    }

    #[test]
    fn liveness_gate_retries_then_gives_up() {
        let quick = |attempts| ProbePolicy {
            attempts,
            interval: Duration::ZERO,
        };
        let flaky = Flaky {
            failures_left: Cell::new(2),
        };
        wait_for_authority(&flaky, quick(3)).expect("third attempt succeeds");

        let down = RecordedAuthority::new(AuthorityKind::Device, AuthorityResponse::new(200, "{}"))
            .with_probe_status(503);
        let err = wait_for_authority(&down, quick(2)).expect_err("exhausted");
        assert!(matches!(
            err,
            ConvertError::UpstreamDefaultingFailure { ref status, .. } if status == "unavailable"
        ));
    }

    #[test]
    fn default_probe_policy() {
        assert_eq!(
            ProbePolicy::default(),
            ProbePolicy {
                attempts: 60,
                interval: Duration::from_secs(10)
            }
        );
    }
}
