//! Alert dispatcher — email the report, or print it.
//!
//! Delivery problems never fail the monitoring run: an unconfigured
//! transport prints the console report, and a failed send logs the
//! error and prints the console report as the fallback. Only writes
//! to the console sink itself can return an error.

use crate::{
    change_evaluator::AlertDecision,
    error::{ImaraError, ImaraResult},
    report::AlertReport,
    settings::MailSettings,
};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use std::{io::Write, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

pub trait MailTransport {
    fn send(&self, mail: &OutgoingMail) -> ImaraResult<()>;
}

/// SMTP over implicit TLS (SMTPS) with password login.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> ImaraResult<Self> {
        let transport = SmtpTransport::relay(&settings.host)
            .map_err(|e| ImaraError::Mail(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();
        Ok(Self { transport })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> ImaraResult<()> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|e| ImaraError::Mail(format!("bad sender '{}': {e}", mail.from)))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| ImaraError::Mail(format!("bad recipient '{}': {e}", mail.to)))?;
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body.clone())
            .map_err(|e| ImaraError::Mail(e.to_string()))?;
        self.transport
            .send(&message)
            .map_err(|e| ImaraError::Mail(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { recipient: String },
    /// No transport configured; the report went to the console.
    ConsoleOnly,
    /// The send failed; the report went to the console instead.
    Failed { error: String },
}

/// A transport together with the address it sends from.
pub struct MailRoute<T> {
    pub transport: T,
    pub sender: String,
}

pub struct AlertDispatcher<T> {
    route: Option<MailRoute<T>>,
    recipient: String,
    company_name: String,
}

impl<T: MailTransport> AlertDispatcher<T> {
    pub fn new(route: Option<MailRoute<T>>, recipient: &str, company_name: &str) -> Self {
        Self {
            route,
            recipient: recipient.to_string(),
            company_name: company_name.to_string(),
        }
    }

    pub fn dispatch<W: Write>(
        &self,
        decision: &AlertDecision,
        narrative: &str,
        console: &mut W,
    ) -> ImaraResult<DispatchOutcome> {
        let report = AlertReport::new(decision, narrative, &self.company_name);

        let Some(route) = &self.route else {
            log::warn!("dispatch: email not configured; printing alert to console");
            console.write_all(report.console().as_bytes())?;
            return Ok(DispatchOutcome::ConsoleOnly);
        };

        let mail = OutgoingMail {
            from: route.sender.clone(),
            to: self.recipient.clone(),
            subject: report.subject(),
            html_body: report.html(),
        };

        match route.transport.send(&mail) {
            Ok(()) => {
                log::info!("Alert email sent successfully to {}", self.recipient);
                Ok(DispatchOutcome::Sent {
                    recipient: self.recipient.clone(),
                })
            }
            Err(e) => {
                log::error!("Failed to send email: {e}");
                writeln!(console, "Failed to send email: {e}")?;
                writeln!(console, "Alert details:")?;
                console.write_all(report.console().as_bytes())?;
                Ok(DispatchOutcome::Failed {
                    error: e.to_string(),
                })
            }
        }
    }
}
