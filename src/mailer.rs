use async_trait::async_trait;
use serde::Serialize;
use std::{sync::Mutex, time::Duration};

use crate::config::MailConfig;

/// An outgoing email
#[derive(Debug, Clone, Serialize)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()>;
}

/// Sends mail through a transactional mail HTTP API that accepts a JSON body
/// `{ from, to, subject, html, text }` with a bearer API key
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    sender: String,
}

impl HttpMailer {
    pub fn new(api_url: &str, api_key: Option<String>, sender: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.to_owned(),
            api_key,
            sender: sender.to_owned(),
        })
    }
}

#[derive(Debug, Serialize)]
struct MailApiBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()> {
        let body = MailApiBody {
            from: &self.sender,
            to: &mail.to,
            subject: &mail.subject,
            html: &mail.html,
            text: &mail.text,
        };
        let mut req = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("mail api responded with status {status}");
        }
        tracing::debug!("mail `{}` sent to {}", mail.subject, mail.to);
        Ok(())
    }
}

/// Only logs outgoing mail. Used when no mail API is configured.
pub struct LogMailer;

impl LogMailer {
    // the body carries the one-time code and never reaches the logs
    fn summary(mail: &Mail) -> String {
        format!("no mail api configured, `{}` to {} was not delivered", mail.subject, mail.to)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()> {
        tracing::warn!("{}", Self::summary(mail));
        Ok(())
    }
}

/// Keeps sent mail in memory, or fails every send when built with `failing`
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<Mail>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("mail delivery disabled");
        }
        self.sent
            .lock()
            .map_err(|_| anyhow::anyhow!("mail outbox poisoned"))?
            .push(mail.clone());
        Ok(())
    }
}

#[async_trait]
impl<M: Mailer + ?Sized> Mailer for std::sync::Arc<M> {
    async fn send(&self, mail: &Mail) -> anyhow::Result<()> {
        (**self).send(mail).await
    }
}

/// Pick the mail sender for the given configuration
pub fn mailer_from_config(config: &MailConfig) -> anyhow::Result<Box<dyn Mailer>> {
    match &config.api_url {
        Some(url) => {
            let mailer = HttpMailer::new(url, config.api_key.clone(), &config.sender)?;
            Ok(Box::new(mailer))
        }
        None => {
            tracing::warn!("MAIL_API_URL not set, OTP mails will only be logged");
            Ok(Box::new(LogMailer))
        }
    }
}

/// Build the OTP mail for a recipient
pub fn otp_mail(to: &str, code: &str, validity_mins: u64) -> Mail {
    let html = format!(
        "<p>Your Ashish Property verification code is <strong style=\"font-size:18px\">{code}</strong>.</p>\
         <p>This code will expire in {validity_mins} minutes. If you did not request this, you can ignore this email.</p>"
    );
    Mail {
        to: to.to_owned(),
        subject: crate::constants::MAIL_SUBJECT_OTP.to_owned(),
        html,
        text: format!("Your OTP code is {code}"),
    }
}
