// Strong typing over strings. Newtypes for timestamps, record ids and request tokens.
// Shared data model for the calculator, session, and view layers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;
use crate::schema;

/// Wall-clock time in epoch milliseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Opaque, session-unique identifier of a history record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(String);

impl HistoryId {
    pub fn new(id: impl Into<String>) -> Self {
        HistoryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token identifying one outstanding insight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        RequestId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        RequestId(self.0 + 1)
    }
}

/// The closed set of supported primitives.
///
/// Deserializes through [`FromStr`], so names are case-insensitive wherever
/// they arrive (config, records, JS arguments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
pub enum ShapeKind {
    #[default]
    Square,
    Rectangle,
    Circle,
    Triangle,
    Parallelogram,
}

impl ShapeKind {
    /// All shapes, in selector order.
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Square,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Parallelogram,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Square => "Square",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Parallelogram => "Parallelogram",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownShape(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ShapeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Numeric dimensions entered for the selected shape, keyed by schema field key.
///
/// Always holds exactly the keys of one shape's schema; keys outside it are
/// rejected by [`InputValues::set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct InputValues {
    values: BTreeMap<String, f64>,
}

impl InputValues {
    /// Zero-filled values for every field of `shape`'s schema.
    pub fn for_shape(shape: ShapeKind) -> Self {
        let values = schema::schema_for(shape)
            .fields
            .iter()
            .map(|field| (field.key.to_string(), 0.0))
            .collect();
        InputValues { values }
    }

    /// Value for `key`, or 0 when the key is absent.
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Store `value` under an existing key. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for InputValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        InputValues {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Area and perimeter of one computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ComputationResult {
    pub area: f64,
    pub perimeter: f64,
}

impl ComputationResult {
    /// A result is usable unless either value is NaN. Infinities pass.
    pub fn is_usable(&self) -> bool {
        !self.area.is_nan() && !self.perimeter.is_nan()
    }
}

/// Immutable snapshot of one past computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub shape: ShapeKind,
    pub inputs: InputValues,
    pub area: f64,
    pub perimeter: f64,
    pub timestamp: Timestamp,
}

/// What the insight collaborator is asked about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRequest {
    pub shape: ShapeKind,
    pub area: f64,
    pub perimeter: f64,
}

/// Issued by a successful `calculate`; hand the request to the insight
/// service and report back with the same `request_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightTicket {
    pub request_id: RequestId,
    pub request: InsightRequest,
}

/// Log verbosity requested by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Engine configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub initial_shape: ShapeKind,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub insight: InsightSettings,
}

/// Settings for the generative-text insight call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSettings {
    /// Credential for the text-generation API. No key means every insight
    /// request falls back to the canned sentence.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL, without the `/models/...` suffix.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
}

impl Default for InsightSettings {
    fn default() -> Self {
        InsightSettings {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            system_instruction: default_system_instruction(),
        }
    }
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_system_instruction() -> String {
    "You are a geometric expert and educator. Keep responses concise, professional, \
     and insightful. Use Markdown for formatting."
        .to_string()
}
