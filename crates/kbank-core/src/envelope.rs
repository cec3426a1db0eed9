//! The `{success, code, message, data}` wrapper around every API response.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::validation::{validate, Presence, Schema, ValidationError, Validator};

/// Uniform response wrapper.
///
/// `data` is checked against `T` only for successful envelopes. A failure
/// envelope's payload (usually error parameters) is kept untyped in
/// `details`.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    /// Stable machine-readable identifier, e.g. `SUCCESS`, `NOT_FOUND`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    pub data: Presence<T>,
    pub details: Option<Value>,
}

impl<T: Schema> Schema for Envelope<T> {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let success = v.required(obj, "success", Validator::boolean);
        let code = v.required(obj, "code", Validator::string);
        let message = v.required(obj, "message", Validator::string);

        let (data, details) = match success {
            Some(false) => {
                let details = obj.get("data").filter(|d| !d.is_null()).cloned();
                (Some(Presence::Absent), details)
            }
            _ => (v.nullable(obj, "data", T::parse), None),
        };

        Some(Envelope {
            success: success?,
            code: code?,
            message: message?,
            data: data?,
            details,
        })
    }
}

impl<T> Envelope<T> {
    /// Payload of a successful envelope.
    ///
    /// `success = false` becomes [`Error::Application`]; a successful
    /// envelope without a payload is a validation failure on `data`.
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(Error::application(self.code, self.message));
        }
        match self.data {
            Presence::Value(data) => Ok(data),
            Presence::Null => Err(missing_data(Some(Value::Null)).into()),
            Presence::Absent => Err(missing_data(None).into()),
        }
    }

    /// Like [`Envelope::into_result`] but tolerates a missing payload.
    pub fn into_optional(self) -> Result<Option<T>> {
        if !self.success {
            return Err(Error::application(self.code, self.message));
        }
        Ok(self.data.into_option())
    }

    /// Code and message of a successful envelope; the payload is ignored.
    pub fn into_ack(self) -> Result<Ack> {
        if !self.success {
            return Err(Error::application(self.code, self.message));
        }
        Ok(Ack {
            code: self.code,
            message: self.message,
        })
    }
}

fn missing_data(actual: Option<Value>) -> ValidationError {
    ValidationError::single("data", "payload when success is true", actual)
}

/// Acknowledgement for operations whose response carries no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub code: String,
    pub message: String,
}

/// Validate a raw response body as `Envelope<T>` and return its payload.
pub fn unwrap_envelope<T: Schema>(raw: &Value) -> Result<T> {
    let envelope: Envelope<T> = validate(raw)?;
    debug!(code = %envelope.code, success = envelope.success, "Envelope unwrapped");
    envelope.into_result()
}

/// Validate a raw response body as an envelope and acknowledge it.
pub fn unwrap_ack(raw: &Value) -> Result<Ack> {
    let envelope: Envelope<Value> = validate(raw)?;
    envelope.into_ack()
}

/// Parse only the envelope fields, if `raw` looks like a failure envelope.
///
/// Used on non-2xx responses to prefer the backend's code and message over
/// a bare status.
pub fn failure_of(raw: &Value) -> Option<Error> {
    let envelope: Envelope<Value> = validate(raw).ok()?;
    if envelope.success {
        None
    } else {
        Some(Error::application(envelope.code, envelope.message))
    }
}
