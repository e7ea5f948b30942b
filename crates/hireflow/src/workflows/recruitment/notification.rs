use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::domain::InterviewSlot;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid recipient address '{0}'")]
    InvalidAddress(String),
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Outbound message payload handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Seam for outbound candidate mail so the workflow can be exercised without
/// a mail relay.
pub trait Notifier: Send + Sync {
    fn send(&self, message: &OutboundMessage) -> Result<(), NotificationError>;
}

/// Shared context woven into every candidate-facing template.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub company_name: String,
    pub role: String,
    pub candidate_email: String,
}

pub fn selection_message(ctx: &TemplateContext) -> OutboundMessage {
    OutboundMessage {
        to: vec![ctx.candidate_email.clone()],
        subject: format!("Congratulations - next steps for the {} role", ctx.role),
        body: format!(
            "Dear Candidate,\n\n\
             Your skills match our requirements for the {role} role at {company}.\n\
             We would like to move your application forward to a technical interview.\n\n\
             You will shortly receive a separate email with the interview details.\n\n\
             Best regards,\n\
             {company} Hiring Team\n",
            role = ctx.role,
            company = ctx.company_name,
        ),
    }
}

pub fn rejection_message(ctx: &TemplateContext, feedback: &str) -> OutboundMessage {
    OutboundMessage {
        to: vec![ctx.candidate_email.clone()],
        subject: format!("Your application for the {} role", ctx.role),
        body: format!(
            "Dear Candidate,\n\n\
             Thank you for applying for the {role} role at {company}.\n\
             After review, we will not be moving forward with your application at this time.\n\n\
             Feedback: {feedback}\n\n\
             Best regards,\n\
             {company} Hiring Team\n",
            role = ctx.role,
            company = ctx.company_name,
            feedback = feedback,
        ),
    }
}

pub fn interview_invite(
    ctx: &TemplateContext,
    slot: InterviewSlot,
    join_url: &str,
) -> OutboundMessage {
    OutboundMessage {
        to: vec![ctx.candidate_email.clone()],
        subject: "Interview Scheduled".to_string(),
        body: format!(
            "Dear Candidate,\n\n\
             You have an interview scheduled for the role of {role} at {company}.\n\n\
             Meeting Details:\n\
             Link: {link}\n\
             Date: {date}\n\
             Time: {time} UTC\n\n\
             Please join the meeting 5 minutes early.\n\n\
             Best regards,\n\
             {company} Hiring Team\n",
            role = ctx.role,
            company = ctx.company_name,
            link = join_url,
            date = slot.0.format("%Y-%m-%d"),
            time = slot.0.format("%H:%M:%S"),
        ),
    }
}

/// Notifier backed by authenticated STARTTLS submission to a fixed relay on
/// the standard submission port.
pub struct SmtpMailer {
    transport: SmtpTransport,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(relay: &str, sender: &str, passkey: &str) -> Result<Self, NotificationError> {
        let sender_mailbox = sender
            .parse::<Mailbox>()
            .map_err(|_| NotificationError::InvalidAddress(sender.to_string()))?;
        let transport = SmtpTransport::starttls_relay(relay)
            .map_err(|err| NotificationError::Transport(err.to_string()))?
            .credentials(Credentials::new(sender.to_string(), passkey.to_string()))
            .build();
        Ok(Self {
            transport,
            sender: sender_mailbox,
        })
    }
}

impl Notifier for SmtpMailer {
    fn send(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(message.subject.clone());
        for recipient in &message.to {
            let mailbox = recipient
                .parse::<Mailbox>()
                .map_err(|_| NotificationError::InvalidAddress(recipient.clone()))?;
            builder = builder.to(mailbox);
        }

        let email = builder
            .body(message.body.clone())
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        self.transport
            .send(&email)
            .map_err(|err| NotificationError::Transport(err.to_string()))?;
        Ok(())
    }
}
