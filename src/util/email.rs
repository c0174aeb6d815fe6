use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info, instrument};

use crate::config::{ConfigError, EmailConfig};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// SMTP email service built on lettre's async transport.
///
/// Email dispatch failures propagate to the caller; signup and the reset
/// flows fail their request when the mail cannot be sent.
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");
        config.validate().map_err(EmailError::from)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .timeout(Some(std::time::Duration::from_secs(config.connection_timeout_secs)));

        if config.use_tls {
            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;
            if config.use_starttls {
                transport_builder = transport_builder.tls(Tls::Required(tls_parameters));
            } else {
                transport_builder = transport_builder.tls(Tls::Wrapper(tls_parameters));
            }
        } else {
            transport_builder = transport_builder.tls(Tls::None);
        }

        if !config.smtp_username.is_empty() && !config.smtp_password.is_empty() {
            let credentials =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            transport_builder = transport_builder.credentials(credentials);
        }

        let transport = transport_builder.build();
        info!("SMTP email service initialized successfully");
        Ok(Self { config, transport })
    }

    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        let email_message = self.build_message(message)?;
        self.transport.send(email_message).await.map_err(|e| {
            error!("Failed to send email: {}", e);
            EmailError::SmtpError(format!("Failed to send email: {}", e))
        })?;
        info!("Email sent successfully");
        Ok(())
    }

    /// Account verification email with the one-time link
    #[instrument(skip(self, verify_link), fields(to = %to))]
    pub async fn send_verification_email(
        &self,
        to: &str,
        user_name: &str,
        verify_link: &str,
    ) -> Result<(), EmailError> {
        let text_body = format!(
            "Hello {user_name},\n\n\
             Welcome to CloudKitchen! Please confirm your email address by opening this link:\n\n\
             {verify_link}\n\n\
             If you did not create an account, you can ignore this email.\n\n\
             The CloudKitchen Team",
        );
        let html_body = format!(
            "<p>Hello {name},</p>\
             <p>Welcome to CloudKitchen! Please confirm your email address:</p>\
             <p><a href=\"{link}\">Verify my email</a></p>\
             <p>If you did not create an account, you can ignore this email.</p>\
             <p>The CloudKitchen Team</p>",
            name = html_escape::encode_text(user_name),
            link = html_escape::encode_double_quoted_attribute(verify_link),
        );

        self.send_email(EmailMessage {
            to: to.to_string(),
            subject: "Verify your email - CloudKitchen".to_string(),
            text_body,
            html_body,
        })
        .await
    }

    /// Password reset one-time-code email
    #[instrument(skip(self, otp), fields(to = %to))]
    pub async fn send_password_reset_otp(
        &self,
        to: &str,
        otp: &str,
        ttl_minutes: i64,
    ) -> Result<(), EmailError> {
        let text_body = format!(
            "Your CloudKitchen password reset code is {otp}. \
             It is valid for {ttl_minutes} minutes.\n\n\
             If you did not request a reset, ignore this email.",
        );
        let html_body = format!(
            "<p>Your CloudKitchen password reset code is <b>{otp}</b>. \
             It is valid for {ttl} minutes.</p>\
             <p>If you did not request a reset, ignore this email.</p>",
            otp = html_escape::encode_text(otp),
            ttl = ttl_minutes,
        );

        self.send_email(EmailMessage {
            to: to.to_string(),
            subject: "Password Reset Code - CloudKitchen".to_string(),
            text_body,
            html_body,
        })
        .await
    }

    fn build_message(&self, email_message: EmailMessage) -> Result<Message, EmailError> {
        let from_mailbox: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_email)
                .parse()
                .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email_message
            .to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email_message.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email_message.text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email_message.html_body),
                    ),
            )
            .map_err(|e| EmailError::MessageError(format!("Failed to build message: {}", e)))
    }
}
