use crate::domain::model::Notification;
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SlotError};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

fn delivery_error(channel: &str, message: impl Into<String>) -> SlotError {
    SlotError::DeliveryError {
        channel: channel.to_string(),
        message: message.into(),
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    async fn send(&self, notification: &Notification) -> Result<()> {
        (**self).send(notification).await
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    subject: String,
    body: String,
    age: u32,
    dose: Option<u8>,
    location: &'a str,
}

/// 以 JSON POST 把通知送到 webhook（聊天室、郵件閘道等）
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// 建立自帶逾時設定的 client，webhook 卡住時 `send` 會回傳錯誤而不是一直等
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn delivery_error(&self, message: impl Into<String>) -> SlotError {
        delivery_error("webhook", message)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let payload = WebhookPayload {
            subject: notification.subject(),
            body: notification.body(),
            age: notification.age,
            dose: notification.dose.map(u8::from),
            location: &notification.location,
        };

        tracing::debug!("Posting notification to webhook: {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.delivery_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.delivery_error(format!("webhook responded with status {}", status)));
        }

        tracing::info!("Notification delivered for {}", notification.location);
        Ok(())
    }
}

/// 經 SMTP 寄信，寄件者與收件者都是設定的信箱
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    mailbox: Mailbox,
}

impl SmtpNotifier {
    /// STARTTLS 連線並以信箱帳密登入
    pub fn new(
        host: &str,
        port: u16,
        email: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mailbox = parse_mailbox(email)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| SlotError::ConfigError {
                message: format!("Invalid SMTP relay {}: {}", host, e),
            })?
            .port(port)
            .credentials(Credentials::new(email.to_string(), password.to_string()))
            .timeout(Some(timeout))
            .build();
        Ok(Self::with_transport(transport, mailbox))
    }

    pub fn with_transport(transport: AsyncSmtpTransport<Tokio1Executor>, mailbox: Mailbox) -> Self {
        Self { transport, mailbox }
    }

    pub fn compose(&self, notification: &Notification) -> Result<Message> {
        Message::builder()
            .from(self.mailbox.clone())
            .to(self.mailbox.clone())
            .subject(notification.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body())
            .map_err(|e| delivery_error("smtp", e.to_string()))
    }
}

impl fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("mailbox", &self.mailbox.to_string())
            .finish_non_exhaustive()
    }
}

fn parse_mailbox(email: &str) -> Result<Mailbox> {
    email
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| SlotError::InvalidConfigValueError {
            field: "email".to_string(),
            value: email.to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = self.compose(notification)?;

        tracing::debug!("Sending notification email to {}", self.mailbox);
        self.transport
            .send(message)
            .await
            .map_err(|e| delivery_error("smtp", e.to_string()))?;

        tracing::info!("Notification email sent for {}", notification.location);
        Ok(())
    }
}

/// 只寫進日誌，沒有設定 webhook 或信箱時使用
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!("{}\n\n{}", notification.subject(), notification.body());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Dose;
    use httpmock::prelude::*;

    fn notification() -> Notification {
        Notification {
            age: 25,
            dose: Some(Dose::First),
            location: "110001".to_string(),
            report: "Center  Apollo Clinic\n".to_string(),
        }
    }

    #[tokio::test]
    async fn test_webhook_posts_composed_message() {
        let server = MockServer::start();
        let hook = server.mock(|when, then| {
            when.method(POST).path("/hook").json_body(serde_json::json!({
                "subject": "110001 : DOSE1 Vaccination slots are available for age: 25",
                "body": "Vaccination slots are available at the following centers:\n\nCenter  Apollo Clinic\n",
                "age": 25,
                "dose": 1,
                "location": "110001"
            }));
            then.status(204);
        });

        let notifier = WebhookNotifier::new(server.url("/hook"), Duration::from_secs(5)).unwrap();
        notifier.send(&notification()).await.unwrap();

        hook.assert();
    }

    #[tokio::test]
    async fn test_webhook_error_status_is_delivery_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(502);
        });

        let notifier = WebhookNotifier::with_client(Client::new(), server.url("/hook"));
        let err = notifier.send(&notification()).await.unwrap_err();

        assert!(matches!(err, SlotError::DeliveryError { .. }));
    }

    #[tokio::test]
    async fn test_stalled_webhook_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200).delay(Duration::from_secs(5));
        });

        let notifier = WebhookNotifier::new(server.url("/hook"), Duration::from_millis(200)).unwrap();
        let started = std::time::Instant::now();
        let err = notifier.send(&notification()).await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(4));
        match err {
            SlotError::DeliveryError { channel, .. } => assert_eq!(channel, "webhook"),
            other => panic!("expected delivery error, got {:?}", other),
        }
    }

    fn local_smtp(port: u16) -> SmtpNotifier {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("127.0.0.1")
            .port(port)
            .timeout(Some(Duration::from_secs(2)))
            .build();
        SmtpNotifier::with_transport(transport, "slots@example.com".parse().unwrap())
    }

    #[tokio::test]
    async fn test_smtp_message_uses_subject_and_body() {
        let notifier = local_smtp(2525);
        let message = notifier.compose(&notification()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw
            .lines()
            .any(|l| l.starts_with("From: ") && l.contains("slots@example.com")));
        assert!(raw
            .lines()
            .any(|l| l.starts_with("To: ") && l.contains("slots@example.com")));
        assert!(raw.contains("Subject: 110001 : DOSE1 Vaccination slots are available for age: 25"));
        assert!(raw.contains("Vaccination slots are available at the following centers:"));
    }

    #[tokio::test]
    async fn test_smtp_unreachable_server_is_delivery_error() {
        // 先佔用再釋放一個埠，確保沒有人在聽
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = local_smtp(port).send(&notification()).await.unwrap_err();

        assert!(err.is_transient());
        match err {
            SlotError::DeliveryError { channel, .. } => assert_eq!(channel, "smtp"),
            other => panic!("expected delivery error, got {:?}", other),
        }
    }

    #[test]
    fn test_smtp_rejects_invalid_address() {
        let err = SmtpNotifier::new(
            DEFAULT_SMTP_HOST,
            DEFAULT_SMTP_PORT,
            "not-an-address",
            "secret",
            Duration::from_secs(5),
        )
        .unwrap_err();

        assert!(matches!(err, SlotError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_boxed_log_notifier_succeeds() {
        let notifier: Box<dyn Notifier> = Box::new(LogNotifier);
        tokio_test::block_on(async {
            assert!(notifier.send(&notification()).await.is_ok());
        });
    }
}
