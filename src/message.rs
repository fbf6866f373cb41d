//! Push message builder
//!
//! A [`PushMessage`] describes one notification: who receives it, which
//! security profile the Ionic API should use, and what the devices display.
//! It is built with chained setters and serialized with [`PushMessage::to_json`].
//!
//! ```rust
//! use ionic_push::message::{DestinationKind, PushMessage};
//!
//! let message = PushMessage::create("my-security-profile")
//!     .send_to(DestinationKind::Emails)
//!     .to("user@example.com")
//!     .message("A message to your user")
//!     .ios_badge(1);
//!
//! let json = message.to_json().unwrap();
//! assert!(json.starts_with(r#"{"emails":"user@example.com""#));
//! ```

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};

/// How the destination address identifies recipients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DestinationKind {
    /// Device push tokens
    #[default]
    Tokens,
    /// Email addresses of Ionic-authenticated users
    Emails,
}

impl DestinationKind {
    /// Payload key for this kind
    pub fn key(self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Emails => "emails",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DestinationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokens" => Ok(Self::Tokens),
            "emails" => Ok(Self::Emails),
            other => Err(AppError::validation(
                "destination kind",
                format!("expected 'tokens' or 'emails', got '{other}'"),
            )),
        }
    }
}

/// One push notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushMessage {
    destination_kind: DestinationKind,
    destination_address: Option<String>,
    profile: String,
    body: String,
    title: Option<String>,
    ios_badge: Option<u32>,
    ios_sound: Option<String>,
    android_sound: Option<String>,
    android_icon: Option<String>,
    payload: Option<serde_json::Map<String, serde_json::Value>>,
}

impl PushMessage {
    /// Start a message for the given security profile
    pub fn create(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            ..Default::default()
        }
    }

    pub fn send_to(mut self, kind: DestinationKind) -> Self {
        self.destination_kind = kind;
        self
    }

    /// Set the destination token or email
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.destination_address = Some(address.into());
        self
    }

    pub fn message(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn ios_badge(mut self, badge: u32) -> Self {
        self.ios_badge = Some(badge);
        self
    }

    pub fn ios_sound(mut self, sound: impl Into<String>) -> Self {
        self.ios_sound = Some(sound.into());
        self
    }

    pub fn android_sound(mut self, sound: impl Into<String>) -> Self {
        self.android_sound = Some(sound.into());
        self
    }

    pub fn android_icon(mut self, icon: impl Into<String>) -> Self {
        self.android_icon = Some(icon.into());
        self
    }

    /// Attach custom data delivered alongside the notification
    pub fn payload(mut self, data: serde_json::Map<String, serde_json::Value>) -> Self {
        self.payload = Some(data);
        self
    }

    pub fn destination_kind(&self) -> DestinationKind {
        self.destination_kind
    }

    pub fn destination_address(&self) -> Option<&str> {
        self.destination_address.as_deref()
    }

    pub fn security_profile(&self) -> &str {
        &self.profile
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Borrowed view with the wire layout of the Ionic Push API
    pub fn to_payload(&self) -> Payload<'_> {
        Payload { message: self }
    }

    /// Serialize to the compact JSON request body.
    ///
    /// Fails only when the security profile is empty.
    pub fn to_json(&self) -> AppResult<String> {
        if self.profile.trim().is_empty() {
            return Err(AppError::validation(
                "profile",
                "a security profile is required",
            ));
        }
        Ok(serde_json::to_string(&self.to_payload())?)
    }
}

/// Serializable form of a [`PushMessage`].
///
/// Keys are written in a fixed order, so equal messages always produce the
/// same bytes.
pub struct Payload<'a> {
    message: &'a PushMessage,
}

impl Serialize for Payload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let message = self.message;
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(
            message.destination_kind.key(),
            &message.destination_address,
        )?;
        map.serialize_entry("profile", &message.profile)?;
        map.serialize_entry(
            "notification",
            &Notification {
                message: &message.body,
                title: message.title.as_deref(),
                ios: Ios {
                    badge: message.ios_badge,
                    sound: message.ios_sound.as_deref(),
                }
                .non_empty(),
                android: Android {
                    sound: message.android_sound.as_deref(),
                    icon: message.android_icon.as_deref(),
                }
                .non_empty(),
                payload: message.payload.as_ref(),
            },
        )?;
        map.end()
    }
}

#[derive(Serialize)]
struct Notification<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ios: Option<Ios<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    android: Option<Android<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

#[derive(Serialize)]
struct Ios<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
}

impl Ios<'_> {
    fn non_empty(self) -> Option<Self> {
        (self.badge.is_some() || self.sound.is_some()).then_some(self)
    }
}

#[derive(Serialize)]
struct Android<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
}

impl Android<'_> {
    fn non_empty(self) -> Option<Self> {
        (self.sound.is_some() || self.icon.is_some()).then_some(self)
    }
}
