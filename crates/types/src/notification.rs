//! Notification records shown in the dashboard's notification panel.
//!
//! A [`Notification`] is the only persisted entity. Its wire shape is a
//! camelCase JSON object whose `createdAt` field is written as RFC 3339 UTC
//! with millisecond precision and read back from either RFC 3339 or epoch
//! milliseconds.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of notification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// First-run greeting.
    Welcome,
    /// Invitation to the guided product tour.
    Tour,
    /// Release note or product update.
    Update,
    /// Confirmation of a completed action.
    Success,
    /// General information.
    Info,
}

impl NotificationKind {
    /// Every kind, in declaration order.
    pub const ALL: [NotificationKind; 5] = [Self::Welcome, Self::Tour, Self::Update, Self::Success, Self::Info];

    /// Lower-case identifier used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Tour => "tour",
            Self::Update => "update",
            Self::Success => "success",
            Self::Info => "info",
        }
    }

    /// Glyph rendered next to the notification title.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Welcome => "★",
            Self::Tour => "➜",
            Self::Update => "↻",
            Self::Success => "✔",
            Self::Info => "ℹ",
        }
    }

    /// Whether the panel offers a "start tour" action for this kind.
    pub fn offers_tour(&self) -> bool {
        match self {
            Self::Tour => true,
            Self::Welcome | Self::Update | Self::Success | Self::Info => false,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ParseNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "welcome" => Ok(Self::Welcome),
            "tour" => Ok(Self::Tour),
            "update" => Ok(Self::Update),
            "success" => Ok(Self::Success),
            "info" => Ok(Self::Info),
            _ => Err(ParseNotificationKindError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNotificationKindError(String);

impl fmt::Display for ParseNotificationKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid notification kind '{}'; expected one of welcome, tour, update, success, info",
            self.0
        )
    }
}

impl Error for ParseNotificationKindError {}

/// A single notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Identifier, unique within a collection and stable for the record's lifetime.
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Creation instant; only used to render relative ages.
    #[serde(with = "created_at")]
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// Build an unread notification.
    pub fn new(
        id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            created_at,
            read: false,
        }
    }
}

/// Number of records with `read == false`.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|notification| !notification.read).count()
}

/// Serde adapter for `createdAt`.
///
/// Writes RFC 3339 UTC with millisecond precision. Reads RFC 3339 strings,
/// epoch milliseconds as a number, or epoch milliseconds as a numeric string.
pub mod created_at {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(millis) => from_millis(millis).ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}"))),
            RawTimestamp::Text(text) => parse(&text).ok_or_else(|| D::Error::custom(format!("unrecognized timestamp: {text}"))),
        }
    }

    /// Parse an RFC 3339 string or a string of epoch milliseconds.
    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        let trimmed = text.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(parsed.with_timezone(&Utc));
        }
        trimmed.parse::<i64>().ok().and_then(from_millis)
    }

    fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(millis).single()
    }
}
