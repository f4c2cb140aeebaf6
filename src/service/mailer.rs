//! Mailer
//!
//! Background delivery of verification emails. Handlers queue a job onto an
//! unbounded channel and return immediately; a worker task owns the SMTP
//! transport and drains the queue. Delivery is best effort: failures are
//! logged and never surface to the request that queued the mail.

use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::{error, info, warn};
use tera::{Context, Tera};
use tokio::sync::mpsc;

use crate::config::MailConfig;
use crate::utils::error::{AppError, AppResult};

const VERIFICATION_SUBJECT: &str = "Confirm your email";

const VERIFICATION_HTML: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Confirm your email</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <h1>Confirm your email</h1>
    <p>Hello,</p>
    <p>Thanks for registering with {{ app_name }}. Click the link below to confirm your email address:</p>
    <p><a href="{{ verify_url }}">{{ verify_url }}</a></p>
    <p>The link expires in {{ expires_in_minutes }} minutes. If you didn't create an account, you can ignore this email.</p>
</body>
</html>
"#;

const VERIFICATION_TEXT: &str = r#"
Confirm your email

Hello,

Thanks for registering with {{ app_name }}. Open the link below to confirm your email address:

{{ verify_url }}

The link expires in {{ expires_in_minutes }} minutes. If you didn't create an account, you can ignore this email.
"#;

/// A single queued email job
#[derive(Debug)]
enum MailJob {
    Verification {
        to: String,
        token: String,
        ttl_minutes: i64,
    },
}

/// Handle for queueing outgoing mail
///
/// Cheap to clone; every clone feeds the same worker. When no SMTP server is
/// configured the handle is a no-op that logs the dropped mail.
#[derive(Clone)]
pub struct Mailer {
    sender: Option<mpsc::UnboundedSender<MailJob>>,
}

impl Mailer {
    /// Starts the delivery worker and returns a queueing handle
    ///
    /// `base_url` is the public URL the verification link points at.
    pub fn start(config: Option<MailConfig>, base_url: &str) -> AppResult<Self> {
        let Some(config) = config else {
            warn!("MAIL_SERVER not configured, outgoing mail will be dropped");
            return Ok(Self { sender: None });
        };

        let worker = MailWorker::new(config, base_url.to_string())?;
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(worker.run(receiver));

        Ok(Self {
            sender: Some(sender),
        })
    }

    /// Handle that silently discards every job, for tests
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Queues a verification email; never blocks
    pub fn queue_verification(&self, to: &str, token: &str, ttl_minutes: i64) {
        let Some(sender) = &self.sender else {
            info!("mail disabled, dropping verification email for {}", to);
            return;
        };

        let job = MailJob::Verification {
            to: to.to_string(),
            token: token.to_string(),
            ttl_minutes,
        };

        // Send fails only when the worker has exited
        if sender.send(job).is_err() {
            error!("mail worker is gone, dropping verification email for {}", to);
        }
    }
}

/// Owns the SMTP transport and template engine, drains the queue
struct MailWorker {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Tera,
    config: MailConfig,
    base_url: String,
}

impl MailWorker {
    fn new(config: MailConfig, base_url: String) -> AppResult<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
            .map_err(|e| AppError::Configuration(format!("Failed to configure SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .build();

        let mut templates = Tera::default();
        templates
            .add_raw_template("verification_email.html", VERIFICATION_HTML)
            .map_err(|e| AppError::Configuration(format!("Failed to add HTML template: {}", e)))?;
        templates
            .add_raw_template("verification_email.txt", VERIFICATION_TEXT)
            .map_err(|e| AppError::Configuration(format!("Failed to add text template: {}", e)))?;

        Ok(Self {
            transport,
            templates,
            config,
            base_url,
        })
    }

    async fn run(self, mut receiver: mpsc::UnboundedReceiver<MailJob>) {
        info!("mail worker started");

        while let Some(job) = receiver.recv().await {
            match job {
                MailJob::Verification {
                    to,
                    token,
                    ttl_minutes,
                } => {
                    if let Err(e) = self.send_verification(&to, &token, ttl_minutes).await {
                        error!("failed to send verification email to {}: {}", to, e);
                    }
                }
            }
        }

        info!("mail worker stopped");
    }

    async fn send_verification(&self, to: &str, token: &str, ttl_minutes: i64) -> AppResult<()> {
        let verify_url = format!(
            "{}/users/verify?token={}",
            self.base_url.trim_end_matches('/'),
            token
        );

        let mut context = Context::new();
        context.insert("app_name", &self.config.from_name);
        context.insert("verify_url", &verify_url);
        context.insert("expires_in_minutes", &ttl_minutes);

        let html_body = self
            .templates
            .render("verification_email.html", &context)
            .map_err(|e| AppError::Internal(format!("Failed to render HTML template: {}", e)))?;

        let text_body = self
            .templates
            .render("verification_email.txt", &context)
            .map_err(|e| AppError::Internal(format!("Failed to render text template: {}", e)))?;

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from)
                    .parse()
                    .map_err(|e| AppError::Configuration(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Validation(format!("Invalid recipient email: {}", e)))?)
            .subject(VERIFICATION_SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        info!("verification email sent to {}", to);
        Ok(())
    }
}
