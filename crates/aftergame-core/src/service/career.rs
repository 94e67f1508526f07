//! AI career suggestions and saved explorations.

use serde::Deserialize;
use tracing::Instrument;

use aftergame_types::career::{CareerExploration, CareerSuggestion, SuggestionRequest};
use aftergame_types::error::{ChatError, ServiceError};
use aftergame_types::event::{ChangeEvent, ChangeTable};
use aftergame_types::identity::RequestContext;
use aftergame_types::llm::{CompletionRequest, CompletionResponse, Message};

use crate::chat::prompt::{CAREER_SYSTEM_PROMPT, career_user_prompt};
use crate::event::ChangeFeed;
use crate::llm::{CompletionGateway, map_upstream_status};
use crate::repository::career::CareerRepository;
use crate::service::required;

pub const MIN_SUGGESTIONS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize)]
struct SuggestionEnvelope {
    suggestions: Vec<CareerSuggestion>,
}

pub struct CareerService<G: CompletionGateway, R: CareerRepository> {
    gateway: G,
    repo: R,
    feed: ChangeFeed,
    model: String,
}

impl<G: CompletionGateway, R: CareerRepository> CareerService<G, R> {
    pub fn new(gateway: G, repo: R, feed: ChangeFeed, model: impl Into<String>) -> Self {
        Self {
            gateway,
            repo,
            feed,
            model: model.into(),
        }
    }

    /// Ask the gateway for career fields suited to the athlete.
    pub async fn suggest(&self, input: &SuggestionRequest) -> Result<Vec<CareerSuggestion>, ChatError> {
        let sport = required("former_sport", &input.former_sport)
            .map_err(|e| ChatError::InvalidInput(e.to_string()))?;
        let reason = required("career_end_reason", &input.career_end_reason)
            .map_err(|e| ChatError::InvalidInput(e.to_string()))?;

        if !self.gateway.is_configured() {
            return Err(ChatError::Internal(
                "gateway API key is not configured".to_string(),
            ));
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(CAREER_SYSTEM_PROMPT),
                Message::user(career_user_prompt(&sport, &reason)),
            ],
            stream: false,
        };

        let span = tracing::info_span!(
            "gen_ai.complete",
            gen_ai.operation.name = "career_suggestions",
            gen_ai.request.model = %request.model,
            gen_ai.request.stream = false,
        );
        let reply = self
            .gateway
            .complete(&request)
            .instrument(span)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "career suggestion request failed");
                ChatError::Internal(e.to_string())
            })?;

        if let Some(err) = map_upstream_status(reply.status, reply.body.clone()) {
            tracing::error!(status = reply.status, body = %reply.body, "AI gateway error");
            return Err(err);
        }

        let content = serde_json::from_str::<CompletionResponse>(&reply.body)
            .ok()
            .and_then(|r| r.content().map(str::to_string))
            .ok_or_else(|| malformed(&reply.body))?;

        parse_suggestions(&content).ok_or_else(|| malformed(&content))
    }

    /// Save a suggestion for the caller with status `exploring`.
    pub async fn save_exploration(
        &self,
        ctx: &RequestContext,
        suggestion: &CareerSuggestion,
    ) -> Result<CareerExploration, ServiceError> {
        required("career_field", &suggestion.career_field)?;
        let exploration = CareerExploration::from_suggestion(ctx.user_id.clone(), suggestion);
        self.repo.save(&exploration).await?;
        self.feed.publish(ChangeEvent::insert(
            ChangeTable::CareerExplorations,
            ctx.user_id.clone(),
            exploration.id,
        ));
        Ok(exploration)
    }

    /// The caller's saved explorations, newest first.
    pub async fn list_explorations(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<CareerExploration>, ServiceError> {
        Ok(self.repo.list_for_user(&ctx.user_id).await?)
    }
}

fn malformed(body: &str) -> ChatError {
    tracing::error!(body = %body, "unparsable career suggestion reply");
    ChatError::Upstream {
        status: 200,
        body: body.to_string(),
    }
}

/// Extract suggestions from model output, tolerating a fenced code block.
///
/// Interest levels are clamped to 1..=10 and at most
/// [`MAX_SUGGESTIONS`] items are kept. Fewer than [`MIN_SUGGESTIONS`] is
/// accepted as long as there is at least one.
pub fn parse_suggestions(content: &str) -> Option<Vec<CareerSuggestion>> {
    let json = strip_code_fence(content);
    let envelope: SuggestionEnvelope = serde_json::from_str(json).ok()?;
    let suggestions: Vec<CareerSuggestion> = envelope
        .suggestions
        .into_iter()
        .filter(|s| !s.career_field.trim().is_empty())
        .take(MAX_SUGGESTIONS)
        .map(|mut s| {
            s.interest_level = s.interest_level.clamp(1, 10);
            s
        })
        .collect();

    if suggestions.len() < MIN_SUGGESTIONS {
        tracing::debug!(count = suggestions.len(), "fewer career suggestions than requested");
    }
    (!suggestions.is_empty()).then_some(suggestions)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an optional language tag on the opening line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
