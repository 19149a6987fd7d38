use crate::config::toml_config::MailConfig;
use crate::domain::ports::{Notification, Notifier};
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends notifications through an SMTP relay with STARTTLS.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    host: String,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let password = config.credential_source()?.resolve()?;
        let credentials = Credentials::new(config.login_account().to_string(), password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(config.host())?
            .port(config.port())
            .credentials(credentials)
            .build();

        let sender: Mailbox = config.sender_account().parse()?;

        tracing::debug!(
            "SMTP transport ready for {}:{} as {}",
            config.host(),
            config.port(),
            config.login_account()
        );

        Ok(Self {
            transport,
            sender,
            host: config.host().to_string(),
        })
    }
}

fn build_message(sender: &Mailbox, notification: &Notification) -> Result<Message> {
    let recipient: Mailbox = notification.to.parse()?;

    let message = Message::builder()
        .from(sender.clone())
        .to(recipient)
        .subject(notification.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            notification.text_body.clone(),
            notification.html_body.clone(),
        ))?;

    Ok(message)
}

fn check_connection(host: &str, reachable: bool) -> Result<()> {
    if reachable {
        Ok(())
    } else {
        Err(SantaError::ConnectionRefused {
            host: host.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn connect(&self) -> Result<()> {
        tracing::debug!("Checking SMTP connection to {}", self.host);
        let reachable = self.transport.test_connection().await?;
        check_connection(&self.host, reachable)
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = build_message(&self.sender, notification)?;
        let response = self.transport.send(message).await?;
        tracing::debug!(
            "SMTP accepted message for {}: {}",
            notification.to,
            response.code()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(to: &str) -> Notification {
        Notification {
            to: to.to_string(),
            subject: "Secret Santa".to_string(),
            text_body: "Hello Alice".to_string(),
            html_body: "<p>Hello Alice</p>".to_string(),
        }
    }

    #[test]
    fn test_build_multipart_message() {
        let sender: Mailbox = "santa@example.com".parse().unwrap();
        let message = build_message(&sender, &notification("alice@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("santa@example.com"));
        assert!(raw.contains("alice@example.com"));
        assert!(raw.contains("Subject: Secret Santa"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_refused_connection_exits_as_notification_failure() {
        assert!(check_connection("smtp.example.com", true).is_ok());

        let err = check_connection("smtp.example.com", false).unwrap_err();
        assert!(matches!(err, SantaError::ConnectionRefused { ref host } if host == "smtp.example.com"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_recipient_is_address_error() {
        let sender: Mailbox = "santa@example.com".parse().unwrap();
        assert!(matches!(
            build_message(&sender, &notification("not an address")),
            Err(SantaError::AddressError(_))
        ));
    }
}
