#![forbid(unsafe_code)]

//! JSON shapes exchanged with the prediction service.

use crate::form::{Field, FormInput};
use crate::metrics::PredictionMetrics;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Fallback shown when a rejected request carries no usable message.
pub const DEFAULT_REJECTION: &str = "Failed to get prediction";

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub county: String,
    pub city: String,
    /// `null` when the typed year has no leading integer.
    pub model_year: Option<i64>,
    pub make: String,
    pub model: String,
    pub ev_type: String,
    pub cafv_eligibility: String,
    pub electric_utility: String,
}

impl PredictionRequest {
    pub fn from_form(input: &FormInput) -> Self {
        let raw_year = input.get(Field::ModelYear);
        let model_year = parse_leading_int(raw_year);
        if model_year.is_none() {
            warn!(model_year = raw_year, "model year is not an integer, sending null");
        }
        Self {
            county: input.get(Field::County).to_owned(),
            city: input.get(Field::City).to_owned(),
            model_year,
            make: input.get(Field::Make).to_owned(),
            model: input.get(Field::Model).to_owned(),
            ev_type: input.get(Field::EvType).to_owned(),
            cafv_eligibility: input.get(Field::CafvEligibility).to_owned(),
            electric_utility: input.get(Field::ElectricUtility).to_owned(),
        }
    }
}

/// Parse the leading base-10 integer of `text`.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit. `None` when no digit follows, or on `i64` overflow. A browser
/// `parseInt` would yield a huge float for such input; sending `null`
/// instead is intentional since no model year is that large.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Status line and body of a service reply, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// What a prediction reply means for the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Prediction {
        metrics: PredictionMetrics,
        unit: Option<String>,
    },
    /// Non-2xx; the message to show.
    Rejected(String),
    /// 2xx whose body is not JSON at all; treated like a failed request.
    Unreadable,
    /// 2xx JSON that does not carry a usable prediction.
    Malformed(MalformedReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    NotSuccessful,
    MissingPrediction,
    MissingElectricRange,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    #[serde(default)]
    success: Value,
    #[serde(default)]
    prediction: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Value,
}

/// Map a raw reply onto [`Reply`].
pub fn interpret(reply: &HttpReply) -> Reply {
    if !reply.is_success() {
        let message = error_message(&reply.body)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION.to_owned());
        return Reply::Rejected(message);
    }

    let Ok(body) = serde_json::from_str::<SuccessBody>(&reply.body) else {
        return Reply::Unreadable;
    };
    if !is_truthy(&body.success) {
        return Reply::Malformed(MalformedReason::NotSuccessful);
    }
    if !is_truthy(&body.prediction) {
        return Reply::Malformed(MalformedReason::MissingPrediction);
    }
    let Some(range) = body.prediction.get("electricRange").and_then(Value::as_f64) else {
        return Reply::Malformed(MalformedReason::MissingElectricRange);
    };
    let unit = body
        .prediction
        .get("unit")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Reply::Prediction {
        metrics: PredictionMetrics::from_range(range),
        unit,
    }
}

/// Loose truthiness, as the service's web clients read these flags.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/model-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub model_type: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub target_variable: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error message carried by a non-2xx body, if any.
pub(crate) fn error_message(body: &str) -> Option<String> {
    match serde_json::from_str::<ErrorBody>(body).ok()?.error {
        Value::String(msg) => Some(msg),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn leading_int_follows_prefix_rules() {
        assert_eq!(parse_leading_int("2024"), Some(2024));
        assert_eq!(parse_leading_int("  2024"), Some(2024));
        assert_eq!(parse_leading_int("2024abc"), Some(2024));
        assert_eq!(parse_leading_int("20.9"), Some(20));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn request_serializes_year_as_number_or_null() {
        let input = FormInput::new()
            .with(Field::County, "King")
            .with(Field::ModelYear, "2022")
            .with(Field::CafvEligibility, "Eligible");
        let value = serde_json::to_value(PredictionRequest::from_form(&input)).unwrap();
        assert_eq!(value["modelYear"], json!(2022));
        assert_eq!(value["county"], json!("King"));
        assert_eq!(value["cafvEligibility"], json!("Eligible"));
        assert_eq!(value.as_object().unwrap().len(), 8);

        let input = input.with(Field::ModelYear, "soon");
        let value = serde_json::to_value(PredictionRequest::from_form(&input)).unwrap();
        assert_eq!(value["modelYear"], Value::Null);
    }

    #[test]
    fn success_reply_yields_metrics() {
        let reply = HttpReply::new(
            200,
            r#"{"success":true,"prediction":{"electricRange":300,"unit":"miles"}}"#,
        );
        assert_eq!(
            interpret(&reply),
            Reply::Prediction {
                metrics: PredictionMetrics::from_range(300.0),
                unit: Some("miles".into()),
            }
        );
    }

    #[test]
    fn rejected_reply_uses_server_message_or_fallback() {
        let reply = HttpReply::new(400, r#"{"error":"bad county"}"#);
        assert_eq!(interpret(&reply), Reply::Rejected("bad county".into()));

        for body in ["", "not json", r#"{"error":""}"#, r#"{"detail":"x"}"#] {
            assert_eq!(
                interpret(&HttpReply::new(500, body)),
                Reply::Rejected(DEFAULT_REJECTION.into()),
                "{body}"
            );
        }
    }

    #[test]
    fn non_json_success_body_is_unreadable() {
        for body in ["<html>gateway</html>", "", "{\"success\":"] {
            assert_eq!(interpret(&HttpReply::new(200, body)), Reply::Unreadable, "{body}");
        }
    }

    #[test]
    fn malformed_success_replies_are_classified() {
        let cases = [
            (r#"{"prediction":{"electricRange":1}}"#, MalformedReason::NotSuccessful),
            (r#"{"success":false}"#, MalformedReason::NotSuccessful),
            (r#"{"success":true}"#, MalformedReason::MissingPrediction),
            (r#"{"success":true,"prediction":null}"#, MalformedReason::MissingPrediction),
            (
                r#"{"success":true,"prediction":{"electricRange":"300"}}"#,
                MalformedReason::MissingElectricRange,
            ),
        ];
        for (body, reason) in cases {
            assert_eq!(
                interpret(&HttpReply::new(200, body)),
                Reply::Malformed(reason),
                "{body}"
            );
        }
    }
}
