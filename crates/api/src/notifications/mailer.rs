//! Transactional email over a Resend-compatible HTTP API.
//!
//! Email delivery is best-effort everywhere it is used: a failed send is
//! logged and the triggering operation (signup, password reset) carries
//! on. Without an API key configured the mailer runs in dev mode and
//! logs the action link instead of sending.

use serde::Serialize;

/// Mailer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Resend API key. `None` puts the mailer in log-only dev mode.
    pub api_key: Option<String>,
    /// Sender address.
    pub from_email: String,
    /// API base URL (override for testing).
    pub api_base: String,
}

impl MailerConfig {
    /// Load mailer configuration from environment variables.
    ///
    /// | Env Var             | Required | Default                  |
    /// |---------------------|----------|--------------------------|
    /// | `RESEND_API_KEY`    | no       | -- (dev mode)            |
    /// | `RESEND_FROM_EMAIL` | no       | `onboarding@resend.dev`  |
    /// | `RESEND_API_BASE`   | no       | `https://api.resend.com` |
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("RESEND_API_KEY").ok().filter(|k| !k.is_empty()),
            from_email: std::env::var("RESEND_FROM_EMAIL")
                .unwrap_or_else(|_| "onboarding@resend.dev".into()),
            api_base: std::env::var("RESEND_API_BASE")
                .unwrap_or_else(|_| "https://api.resend.com".into()),
        }
    }
}

/// Request body for the Resend `POST /emails` endpoint.
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("email API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email API returned status {0}")]
    Api(reqwest::StatusCode),
}

/// Sends transactional email. Cheap to share behind an `Arc`.
pub struct Mailer {
    config: MailerConfig,
    client: reqwest::Client,
}

impl Mailer {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Email-verification message with the confirmation link.
    pub async fn send_verification_email(
        &self,
        to: &str,
        first_name: &str,
        verification_url: &str,
    ) -> Result<(), MailerError> {
        let html = wrap_body(&format!(
            "<h1>Welcome to Chess Trainer!</h1>\
             <p>Hi {first_name},</p>\
             <p>Thanks for signing up! Please verify your email address:</p>\
             <p><a href=\"{verification_url}\">Verify Email Address</a></p>\
             <p>This link will expire in 24 hours. If you didn't sign up for \
             Chess Trainer, you can safely ignore this email.</p>"
        ));
        self.send(to, "Verify your email address - Chess Trainer", &html, verification_url)
            .await
    }

    /// Password-reset message with the reset link.
    pub async fn send_password_reset_email(
        &self,
        to: &str,
        first_name: &str,
        reset_url: &str,
    ) -> Result<(), MailerError> {
        let html = wrap_body(&format!(
            "<h1>Reset your password</h1>\
             <p>Hi {first_name},</p>\
             <p>We received a request to reset your password. Click the link \
             below to choose a new one:</p>\
             <p><a href=\"{reset_url}\">Reset Password</a></p>\
             <p>This link will expire in 1 hour. If you didn't request a \
             reset, you can safely ignore this email.</p>"
        ));
        self.send(to, "Reset your password - Chess Trainer", &html, reset_url)
            .await
    }

    /// Welcome message sent after successful email verification.
    pub async fn send_welcome_email(&self, to: &str, first_name: &str) -> Result<(), MailerError> {
        let html = wrap_body(&format!(
            "<h1>You're all set!</h1>\
             <p>Hi {first_name},</p>\
             <p>Your email is verified. Time to master your chess openings.</p>"
        ));
        self.send(to, "Welcome to Chess Trainer", &html, "").await
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        link: &str,
    ) -> Result<(), MailerError> {
        let Some(api_key) = &self.config.api_key else {
            // Dev mode: surface the link so flows remain testable locally.
            tracing::info!(to, subject, link, "Mailer in dev mode; not sending");
            return Ok(());
        };

        let body = SendEmailRequest {
            from: &self.config.from_email,
            to,
            subject,
            html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_base))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailerError::Api(response.status()));
        }

        tracing::debug!(to, subject, "Email sent");
        Ok(())
    }
}

/// Shared outer markup for all messages.
fn wrap_body(content: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"font-family: sans-serif;\">\
         <h2>&#9823; Chess Trainer</h2>{content}\
         <hr><p>Chess Trainer - Master Your Chess Openings</p>\
         </body></html>"
    )
}
