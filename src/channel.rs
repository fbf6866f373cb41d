//! Ionic Push notification channel
//!
//! The host application hands the channel a recipient and a notification.
//! The notification builds a [`PushMessage`], the recipient supplies the
//! address when the message has none, and the channel performs a single
//! POST against the Ionic Push API.
//!
//! ```rust,no_run
//! use ionic_push::channel::{Addressable, IonicPushChannel, PushMessageProducer};
//! use ionic_push::config::IonicPushConfig;
//! use ionic_push::message::PushMessage;
//!
//! struct User { device_token: String }
//!
//! impl Addressable for User {
//!     fn route_for_ionic_push(&self) -> Option<String> {
//!         Some(self.device_token.clone())
//!     }
//! }
//!
//! struct OrderShipped;
//!
//! impl PushMessageProducer for OrderShipped {
//!     fn to_ionic_push(&self, _recipient: &dyn Addressable) -> PushMessage {
//!         PushMessage::create("production").message("Your order has shipped")
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let channel = IonicPushChannel::from_config(IonicPushConfig::with_key("IonicKey"))?;
//! channel.send(&User { device_token: "device_token".into() }, &OrderShipped)?;
//! # Ok(())
//! # }
//! ```

use tracing::{debug, info, warn};

use crate::config::IonicPushConfig;
use crate::errors::{AppError, AppResult};
use crate::message::PushMessage;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

/// A recipient the channel can route to
pub trait Addressable {
    /// Token or email for this recipient, `None` when it cannot receive pushes
    fn route_for_ionic_push(&self) -> Option<String>;
}

/// A notification that can be delivered as an Ionic push
pub trait PushMessageProducer {
    fn to_ionic_push(&self, recipient: &dyn Addressable) -> PushMessage;
}

/// A notification the API accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// 2xx status returned by the API
    pub status: u16,
}

/// Delivers [`PushMessage`]s to the Ionic Push API
pub struct IonicPushChannel<T> {
    config: IonicPushConfig,
    transport: T,
}

impl IonicPushChannel<ReqwestTransport> {
    /// Channel backed by a `reqwest` client built from `config`
    pub fn from_config(config: IonicPushConfig) -> AppResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: HttpTransport> IonicPushChannel<T> {
    pub fn new(config: IonicPushConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &IonicPushConfig {
        &self.config
    }

    /// Send `notification` to `recipient`.
    ///
    /// An address set by the notification takes precedence over the
    /// recipient's route. Without either, the send fails before any request.
    pub fn send(
        &self,
        recipient: &dyn Addressable,
        notification: &dyn PushMessageProducer,
    ) -> AppResult<Delivery> {
        let api_key = self.api_key()?;

        let mut message = notification.to_ionic_push(recipient);
        if message.destination_address().is_none() {
            let Some(address) = recipient.route_for_ionic_push() else {
                return Err(AppError::validation(
                    "destination",
                    "recipient has no Ionic Push route",
                ));
            };
            message = message.to(address);
        }

        self.deliver(api_key, &message)
    }

    /// Send a message that already carries its destination address
    pub fn send_message(&self, message: &PushMessage) -> AppResult<Delivery> {
        let api_key = self.api_key()?;

        if message.destination_address().is_none() {
            return Err(AppError::validation(
                "destination",
                "message has no destination address",
            ));
        }

        self.deliver(api_key, message)
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config.api_key().ok_or_else(|| {
            AppError::invalid_configuration(
                "no API key found at services.ionicpush.key",
            )
        })
    }

    fn deliver(&self, api_key: &str, message: &PushMessage) -> AppResult<Delivery> {
        let body = message.to_json()?;
        debug!(
            kind = %message.destination_kind(),
            profile = message.security_profile(),
            "Built Ionic Push payload"
        );

        let request = HttpRequest {
            url: self.config.endpoint.clone(),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {api_key}")),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        };

        let response = match self.transport.post(&request) {
            Ok(response) => response,
            Err(err) => {
                warn!(timed_out = err.is_timeout(), "Ionic Push request failed: {}", err);
                return Err(AppError::transport(err));
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "Ionic Push rejected notification");
            return Err(AppError::rejected(response));
        }

        info!(status = response.status, "Ionic Push notification sent");
        Ok(Delivery {
            status: response.status,
        })
    }
}
