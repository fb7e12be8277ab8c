pub mod templates;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::models::Estado;

pub struct SystemMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SystemMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    /// Tell an admin that `user_name` filed something that needs review.
    pub async fn send_request_notification(
        &self,
        to_email: &str,
        user_name: &str,
        base_url: &str,
    ) -> Result<(), String> {
        let html = templates::render_request_notification(user_name, base_url);
        self.send(
            to_email,
            &format!("Nueva solicitud de {user_name}"),
            &html,
        )
        .await
    }

    pub async fn send_request_decided(
        &self,
        to_email: &str,
        to_name: &str,
        kind: &str,
        estado: Estado,
        base_url: &str,
    ) -> Result<(), String> {
        let html = templates::render_request_decided(to_name, kind, estado, base_url);
        self.send(
            to_email,
            &format!("Tu solicitud de {kind} fue {estado}"),
            &html,
        )
        .await
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}
