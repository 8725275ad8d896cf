//! Narrative summarizer — short executive summary of an alert from an
//! external text-generation service.
//!
//! Never fails: every transport, auth or decoding error becomes
//! `Narrative::Degraded` so the alert can still go out.

use crate::{
    change_evaluator::AlertDecision,
    error::{ImaraError, ImaraResult},
    report::{format_money, format_signed_pct},
    settings::TextServiceSettings,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const KEY_NOT_CONFIGURED: &str = "AI summary unavailable - OpenAI API key not configured.";

/// Anything that turns a prompt into free text.
pub trait TextGenerator {
    fn complete(&self, prompt: &str) -> ImaraResult<String>;

    /// False when credentials are absent or a template placeholder.
    fn is_configured(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narrative {
    /// No alert, so nothing was asked.
    Skipped,
    Generated(String),
    /// Fallback text standing in for a failed or impossible call.
    Degraded(String),
}

impl Narrative {
    pub fn text(&self) -> &str {
        match self {
            Narrative::Skipped => "",
            Narrative::Generated(text) | Narrative::Degraded(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Narrative::Degraded(_))
    }
}

pub struct NarrativeSummarizer<G> {
    generator: G,
    revenue_threshold: f64,
}

impl<G: TextGenerator> NarrativeSummarizer<G> {
    pub fn new(generator: G, revenue_threshold: f64) -> Self {
        Self {
            generator,
            revenue_threshold,
        }
    }

    pub fn summarize(&self, decision: &AlertDecision) -> Narrative {
        if !decision.should_alert {
            return Narrative::Skipped;
        }
        if !self.generator.is_configured() {
            return Narrative::Degraded(KEY_NOT_CONFIGURED.into());
        }
        match self.generator.complete(&self.prompt(decision)) {
            Ok(text) => Narrative::Generated(text.trim().to_string()),
            Err(e) => {
                log::warn!("summarizer: text generation failed: {e}");
                Narrative::Degraded(format!("AI analysis error: {e}"))
            }
        }
    }

    pub fn prompt(&self, d: &AlertDecision) -> String {
        format!(
            "today: {today}\n\
             yesterday: {yesterday}\n\
             \n\
             Premium: {pt} vs {py} ({pc} vs {pyc} policies)\n\
             Commission: {ct} vs {cy} ({cc} vs {cyc} sales)\n\
             \n\
             premium pct change: {ppct}\n\
             commission pct change: {cpct}\n\
             \n\
             Threshold: {threshold}\n\
             \n\
             provide a concise 2-3 sentence executive summary with a realistic actionable insight.",
            today = d.today,
            yesterday = d.yesterday,
            pt = format_money(d.premium_today.total),
            py = format_money(d.premium_yesterday.total),
            pc = d.premium_today.count,
            pyc = d.premium_yesterday.count,
            ct = format_money(d.commission_today.total),
            cy = format_money(d.commission_yesterday.total),
            cc = d.commission_today.count,
            cyc = d.commission_yesterday.count,
            ppct = format_signed_pct(d.premium_change_pct),
            cpct = format_signed_pct(d.commission_change_pct),
            threshold = self.revenue_threshold,
        )
    }
}

// ── OpenAI-compatible chat completions ────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    settings: TextServiceSettings,
}

impl OpenAiClient {
    pub fn new(settings: TextServiceSettings) -> ImaraResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }
}

impl TextGenerator for OpenAiClient {
    fn complete(&self, prompt: &str) -> ImaraResult<String> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        log::debug!("summarizer: requesting completion from {}", self.settings.model);

        let url = format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ImaraError::UnexpectedResponse(format!(
                "text service returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ImaraError::UnexpectedResponse("no choices in completion".into()))
    }

    fn is_configured(&self) -> bool {
        let key = self.settings.api_key.trim();
        !key.is_empty() && !key.to_lowercase().starts_with("your_")
    }
}
