use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a password reset link carrying `raw_token` to `to`.
    async fn send_password_reset(&self, to: &str, raw_token: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    frontend_url: String,
    skip_send: bool,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Cleartext without authentication (local relays, mail catchers).
    Plain,
    /// Cleartext connection upgraded with STARTTLS (submission port 587).
    StartTls,
    /// TLS from the first byte (SMTPS port 465).
    ImplicitTls,
}

pub const SMTPS_PORT: u16 = 465;

impl SmtpSecurity {
    pub fn for_config(cfg: &SmtpConfig) -> Self {
        if cfg.port == SMTPS_PORT {
            SmtpSecurity::ImplicitTls
        } else if cfg.username.is_empty() {
            SmtpSecurity::Plain
        } else {
            SmtpSecurity::StartTls
        }
    }
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig, frontend_url: &str) -> anyhow::Result<Self> {
        let security = SmtpSecurity::for_config(cfg);
        let builder = match security {
            SmtpSecurity::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
            }
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
                    .context("smtp starttls relay")?
            }
            SmtpSecurity::ImplicitTls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host).context("smtp relay")?
            }
        };
        let mut builder = builder.port(cfg.port);
        if !cfg.username.is_empty() {
            builder = builder
                .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()));
        }
        let transport = builder.build();
        debug!(host = %cfg.host, port = cfg.port, ?security, "smtp transport configured");

        let from = cfg
            .from_address
            .parse::<Mailbox>()
            .context("parse SMTP_FROM_ADDRESS")?;

        Ok(Self {
            transport,
            from,
            frontend_url: frontend_url.to_string(),
            skip_send: cfg.skip_send,
        })
    }
}

pub fn reset_link(frontend_url: &str, raw_token: &str) -> String {
    format!("{}/reset-password?token={}", frontend_url, raw_token)
}

fn reset_email_body(link: &str) -> String {
    format!(
        r#"You requested a password reset for your Tasklist account.

Open the link below to choose a new password:

{link}

This link is valid for 1 hour and can be used once.

If you did not request this, you can ignore this email.
"#
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to: &str, raw_token: &str) -> anyhow::Result<()> {
        if self.skip_send {
            info!(%to, "smtp delivery disabled; reset email not sent");
            return Ok(());
        }

        let link = reset_link(&self.frontend_url, raw_token);
        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>().context("parse recipient")?)
            .subject("Password reset request")
            .header(ContentType::TEXT_PLAIN)
            .body(reset_email_body(&link))
            .context("build reset email")?;

        self.transport
            .send(email)
            .await
            .context("smtp send reset email")?;
        info!(%to, "reset email sent");
        Ok(())
    }
}
