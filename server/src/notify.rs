//! Drafting of booking-decision notification emails via the Gemini text-generation API.
//!
//! No real email is delivered: the generated draft is logged as a simulated send to the
//! requester's address. The call is made fire-and-forget after the decision has been applied, so
//! a failing or slow API never blocks or reverts a decision.

use crate::data_store::models::{Booking, BookingStatus};
use crate::setup::{self, SetupError};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct NotifierConfig {
    /// API key for the Gemini API. Without a key, drafting is skipped with a warning.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: GEMINI_API_BASE.to_string(),
            model: GEMINI_MODEL.to_string(),
        }
    }
}

pub struct DecisionNotifier {
    client: reqwest::Client,
    config: NotifierConfig,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug)]
enum NotifyError {
    Http(reqwest::Error),
    EmptyResponse,
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Gemini API request failed: {}", e),
            Self::EmptyResponse => f.write_str("Gemini API returned no candidates"),
        }
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl DecisionNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, SetupError> {
        Ok(Self::new(NotifierConfig {
            api_key: setup::get_gemini_api_key_from_env()?,
            ..NotifierConfig::default()
        }))
    }

    /// Draft and "send" the notification email for a decided booking.
    ///
    /// All outcomes are reported through the log; the caller is not interested in them anymore,
    /// as the decision itself has already been applied.
    pub async fn notify_decision(&self, booking: &Booking, room_name: &str) {
        let Some(api_key) = &self.config.api_key else {
            warn!("GEMINI_API_KEY not set. Skipping notification email draft.");
            return;
        };
        let prompt = build_decision_prompt(booking, room_name);
        match self.generate_text(api_key, prompt).await {
            Ok(draft) => {
                info!(
                    "Simulation: email sent to {} for booking {}:\n{}",
                    booking.email, booking.id, draft
                );
            }
            Err(e) => {
                error!(
                    "Could not draft notification email for booking {}: {}. \
                     The booking status has been updated anyway.",
                    booking.id, e
                );
            }
        }
    }

    async fn generate_text(&self, api_key: &str, prompt: String) -> Result<String, NotifyError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_base, self.config.model, api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let response: GenerateContentResponse = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(NotifyError::EmptyResponse)
    }
}

/// Build the prompt asking for a professional, friendly notification email about the decision.
fn build_decision_prompt(booking: &Booking, room_name: &str) -> String {
    let (status_text, extra_instruction) = match booking.status {
        BookingStatus::Approved => (
            "has been approved",
            "Since the request was approved, add a sentence like \"Please follow the room usage \
             rules and leave the room clean.\"",
        ),
        _ => (
            "has been rejected",
            "Since the request was rejected, add a sentence like \"We wish you better luck next \
             time.\"",
        ),
    };
    let reason_text = match (&booking.status, &booking.rejection_reason) {
        (BookingStatus::Rejected, Some(reason)) => {
            format!("- State the reason for the rejection: \"{}\"\n", reason)
        }
        _ => String::new(),
    };
    format!(
        "You are an administrative assistant at a university. Write a professional and friendly \
         notification email.\n\
         Subject: Update on your student activities room booking request\n\
         \n\
         Email content:\n\
         - Start by greeting the requester: \"Dear {requester},\"\n\
         - Inform them that their request to book the room \"{room}\" for the activity \
         \"{activity}\" on {date} {status}.\n\
         {reason}\
         - {extra}\n\
         - Close the email with \"Kind regards, the Student Affairs Office.\"",
        requester = booking.requester_name,
        room = room_name,
        activity = booking.activity_name,
        date = booking.date,
        status = status_text,
        reason = reason_text,
        extra = extra_instruction,
    )
}
