//! One-off sends from the command line

use anyhow::{bail, Context, Result};

use ionic_push::channel::{Delivery, IonicPushChannel};
use ionic_push::message::{DestinationKind, PushMessage};

use crate::cli::{CliContext, SendArgs};

/// Handler for the `send` command
pub struct SendHandler<'a> {
    context: &'a CliContext,
}

impl<'a> SendHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle_send(&self, args: SendArgs) -> Result<()> {
        let config = self
            .context
            .config_manager
            .config()
            .clone()
            .with_env_overrides();
        let ionic = config.services.ionicpush;

        let message = build_message(&args, ionic.default_profile.as_deref())?;

        if args.dry_run {
            println!("Dry run - would send notification:");
            println!("POST {}", ionic.endpoint);
            println!("{}", message.to_json()?);
            return Ok(());
        }

        ionic.endpoint_url()?;
        let channel = IonicPushChannel::from_config(ionic)?;
        let Delivery { status } = channel.send_message(&message)?;
        println!("Notification sent (HTTP {status})");
        println!("To: {} ({})", args.address, message.destination_kind());
        println!("Message: {}", message.body());

        Ok(())
    }
}

fn build_message(args: &SendArgs, default_profile: Option<&str>) -> Result<PushMessage> {
    let Some(profile) = args.profile.as_deref().or(default_profile) else {
        bail!("No security profile given. Use --profile or set services.ionicpush.default_profile");
    };

    let kind = if args.emails {
        DestinationKind::Emails
    } else {
        DestinationKind::Tokens
    };

    let mut message = PushMessage::create(profile)
        .send_to(kind)
        .to(args.address.as_str())
        .message(args.message.as_str());

    if let Some(title) = &args.title {
        message = message.title(title.as_str());
    }
    if let Some(badge) = args.badge {
        message = message.ios_badge(badge);
    }
    if let Some(sound) = &args.sound {
        message = message.ios_sound(sound.as_str());
    }
    if let Some(data) = &args.data {
        let value: serde_json::Value =
            serde_json::from_str(data).context("--data must be valid JSON")?;
        let serde_json::Value::Object(map) = value else {
            bail!("--data must be a JSON object");
        };
        message = message.payload(map);
    }

    Ok(message)
}
