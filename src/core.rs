//! Core domain types for alertgate
//!
//! This module defines the alert records accepted by the collectors and the
//! trait contract that lets one collector implementation throttle any of
//! them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// The dimension along which business alerts are rate limited.
///
/// Two alerts of the same category share one cooldown window; alerts of
/// different categories never suppress each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCategory {
    /// A request-rate limiter tripped.
    RateLimit,
    /// An external quota (SMS credits, API budget) is close to exhausted.
    Quota,
    /// A request exceeded its latency threshold.
    SlowRequest,
    /// The error rate of an endpoint is above its threshold.
    HighError,
    /// A machine-level resource (CPU, memory, disk) is running out.
    Resource,
    /// Anything the fixed categories do not cover.
    Custom,
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertCategory::RateLimit => "rate-limit",
            AlertCategory::Quota => "quota",
            AlertCategory::SlowRequest => "slow-request",
            AlertCategory::HighError => "high-error",
            AlertCategory::Resource => "resource",
            AlertCategory::Custom => "custom",
        };
        f.write_str(label)
    }
}

/// Caller-supplied priority label. Only selects the glyph shown in the
/// message header; it plays no part in admission or routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// Fallback for anything the parser does not recognize.
    #[default]
    Unknown,
}

impl Severity {
    /// Parses a severity label, ignoring case. Unrecognized labels
    /// (including the empty string) map to [`Severity::Unknown`].
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }
}

impl From<&str> for Severity {
    fn from(label: &str) -> Self {
        Severity::parse(label)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A single measurement attached to a business alert.
///
/// Closed over the handful of shapes alerts actually carry, so every value
/// has a print representation without resorting to dynamic typing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(value) => f.write_str(value),
            MetricValue::Integer(value) => write!(f, "{}", value),
            MetricValue::Float(value) => write!(f, "{}", value),
            MetricValue::Bool(value) => write!(f, "{}", value),
            MetricValue::List(values) => f.write_str(&values.join(", ")),
        }
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Integer(value.into())
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        MetricValue::Integer(value.into())
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

impl From<Vec<String>> for MetricValue {
    fn from(values: Vec<String>) -> Self {
        MetricValue::List(values)
    }
}

/// One business alert occurrence.
///
/// Immutable once constructed; a collector reads it and never hands it
/// back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessAlert {
    /// Category the cooldown window is tracked under.
    pub category: AlertCategory,
    /// Short headline shown near the top of the message.
    pub title: String,
    /// Free-form details appended as a trailing section. May be empty.
    pub description: String,
    /// Name of the service that raised the alert.
    pub service: String,
    /// Method or endpoint the alert relates to, when one applies.
    pub method: Option<String>,
    pub severity: Severity,
    /// Supporting measurements, rendered in key order.
    pub metrics: BTreeMap<String, MetricValue>,
}

/// A panic caught at an RPC boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcPanicAlert {
    /// The RPC method that panicked.
    pub method: String,
    /// Stringified panic payload.
    pub panic_value: String,
    /// Captured stack trace. Truncated at render time, never here.
    pub stack: String,
}

/// A panic caught while serving an HTTP request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpPanicAlert {
    /// HTTP method of the failing request.
    pub method: String,
    pub url: String,
    /// Address of the client whose request triggered the panic.
    pub remote_addr: String,
    /// Stringified panic payload.
    pub panic_value: String,
    /// Captured stack trace. Truncated at render time, never here.
    pub stack: String,
}

// =============================================================================
// Collector contract
// =============================================================================

/// A record that can be funneled through a rate-limited collector.
///
/// The key partitions the cooldown bookkeeping: records sharing a key share
/// one window. A unit key turns the collector into a single-slot limiter
/// where every record contends for the same window.
pub trait AlertRecord: Send + Sync {
    type Key: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static;

    /// The key this record is throttled under.
    fn throttle_key(&self) -> Self::Key;
}

impl AlertRecord for BusinessAlert {
    type Key = AlertCategory;

    fn throttle_key(&self) -> Self::Key {
        self.category
    }
}

impl AlertRecord for RpcPanicAlert {
    type Key = ();

    fn throttle_key(&self) -> Self::Key {}
}

impl AlertRecord for HttpPanicAlert {
    type Key = ();

    fn throttle_key(&self) -> Self::Key {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("critical"), Severity::Critical);
        assert_eq!(Severity::parse("HIGH"), Severity::High);
        assert_eq!(Severity::parse("Medium"), Severity::Medium);
        assert_eq!(Severity::parse("low"), Severity::Low);
    }

    #[test]
    fn test_severity_parse_falls_back_to_unknown() {
        assert_eq!(Severity::parse(""), Severity::Unknown);
        assert_eq!(Severity::parse("urgent"), Severity::Unknown);
        assert_eq!(Severity::default(), Severity::Unknown);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(AlertCategory::RateLimit.to_string(), "rate-limit");
        assert_eq!(AlertCategory::Quota.to_string(), "quota");
        assert_eq!(AlertCategory::SlowRequest.to_string(), "slow-request");
        assert_eq!(AlertCategory::HighError.to_string(), "high-error");
        assert_eq!(AlertCategory::Resource.to_string(), "resource");
        assert_eq!(AlertCategory::Custom.to_string(), "custom");
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::from("120req/min").to_string(), "120req/min");
        assert_eq!(MetricValue::from(120).to_string(), "120");
        assert_eq!(MetricValue::from(1.5).to_string(), "1.5");
        assert_eq!(MetricValue::from(true).to_string(), "true");
        assert_eq!(
            MetricValue::List(vec!["a".to_string(), "b".to_string()]).to_string(),
            "a, b"
        );
    }

    #[test]
    fn test_business_alert_serializes_with_stable_labels() {
        let alert = BusinessAlert {
            category: AlertCategory::SlowRequest,
            title: "slow query".to_string(),
            description: String::new(),
            service: "order-service".to_string(),
            method: None,
            severity: Severity::High,
            metrics: BTreeMap::new(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["category"], "slow-request");
        assert_eq!(json["severity"], "high");
    }

    #[test]
    fn test_panic_records_share_a_single_throttle_slot() {
        let first = RpcPanicAlert {
            method: "CreateOrder".to_string(),
            panic_value: "index out of range".to_string(),
            stack: String::new(),
        };
        let second = RpcPanicAlert {
            method: "CancelOrder".to_string(),
            panic_value: "nil dereference".to_string(),
            stack: String::new(),
        };
        assert_eq!(first.throttle_key(), second.throttle_key());
    }
}
