//! Ionic Push notification channel
//!
//! Builds Ionic Push payloads with [`PushMessage`] and delivers them with
//! [`IonicPushChannel`]: one authenticated POST per notification, with the
//! HTTP status mapped to success or an [`AppError`].

pub mod channel;
pub mod config;
pub mod errors;
pub mod message;
pub mod transport;

pub use channel::{Addressable, Delivery, IonicPushChannel, PushMessageProducer};
pub use config::{Config, ConfigManager, IonicPushConfig};
pub use errors::{AppError, AppResult};
pub use message::{DestinationKind, PushMessage};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
