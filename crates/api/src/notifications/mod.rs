//! Outbound notifications (transactional email).

pub mod mailer;
