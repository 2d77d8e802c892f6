//! The dialogue engine: one chat turn in, one reply out.
//!
//! A turn derives context from the transcript, merges it with the stored
//! session, and tries the heuristics before asking the model. Whatever
//! decision results is screened, slot-checked and dispatched, and the
//! session is written back before replying.

pub mod dispatch;
pub mod extractor;
pub mod heuristic;
pub mod merge;
pub mod normalizer;
pub mod slots;

use chrono::Local;

use self::dispatch::{build_reply, build_request, dispatch};
use self::extractor::derive_context;
use self::heuristic::heuristic_decision;
use self::merge::{merge_context, merge_state};
use self::normalizer::{is_banned, parse_decision};
use self::slots::{ensure_slots, SlotCheck};
use crate::models::{AgentAction, ChatRequest, ChatResponse, ConversationContext, Decision, Identity};
use crate::services::ai::prompt::build_prompt;
use crate::state::AppState;

pub const BANNED_REPLY: &str = "Sorry, that action is not allowed from the chatbot.";
pub const LOGIN_REPLY: &str = "Please log in to perform this action.";
pub const CLARIFY_REPLY: &str = "Could you clarify what you want to do?";
pub const DISPATCH_FAILED_REPLY: &str =
    "I couldn't complete that yet. Please confirm the room and dates, and I'll try again.";
pub const UNAVAILABLE_REPLY: &str =
    "I couldn't reach the assistant just now. Please try again in a few seconds.";

/// Runs one turn. Every failure is folded into the reply; nothing here errors.
pub async fn handle_turn(state: &AppState, identity: &Identity, request: &ChatRequest) -> ChatResponse {
    let today = Local::now().date_naive();
    let session_id = request.session_key();
    let latest = request.latest_content();

    let prior = state.sessions.load(&session_id).await.unwrap_or_default();
    let ctx = merge_context(&prior, &derive_context(&request.messages, today));

    if let Some(decision) = heuristic_decision(&ctx, latest, today) {
        return commit(state, identity, &session_id, ctx, decision, None, "fast").await;
    }

    let prompt = build_prompt(&state.config.hotel_name, &request.messages, &ctx);
    match state.llm.generate(&prompt).await {
        Ok(raw) => {
            let decision = parse_decision(&raw);
            commit(state, identity, &session_id, ctx, decision, Some(raw), "model").await
        }
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "model call failed, trying heuristics");
            match heuristic_decision(&ctx, latest, today) {
                Some(decision) => {
                    commit(state, identity, &session_id, ctx, decision, None, "fallback").await
                }
                None => {
                    state.sessions.save(&session_id, ctx).await;
                    ChatResponse::reply(UNAVAILABLE_REPLY, AgentAction::Unknown)
                }
            }
        }
    }
}

/// Executes a decision and persists the resulting context.
async fn commit(
    state: &AppState,
    identity: &Identity,
    session_id: &str,
    ctx: ConversationContext,
    decision: Decision,
    raw: Option<String>,
    path: &'static str,
) -> ChatResponse {
    let (response, committed) = execute(state, identity, &ctx, decision, raw.as_deref()).await;

    tracing::info!(
        session_id = %session_id,
        action = response.action.as_str(),
        path,
        dispatched = response.backend_response.is_some(),
        "turn handled"
    );

    let next = match committed {
        Some(decision) => merge_state(&ctx, &decision),
        None => ctx,
    };
    state.sessions.save(session_id, next).await;
    response
}

/// Returns the reply plus the decision to fold into the session, if any.
async fn execute(
    state: &AppState,
    identity: &Identity,
    ctx: &ConversationContext,
    decision: Decision,
    raw: Option<&str>,
) -> (ChatResponse, Option<Decision>) {
    if is_banned(decision.label()) {
        tracing::warn!(label = decision.label(), "refused banned action");
        return (ChatResponse::reply(BANNED_REPLY, AgentAction::Unknown).with_raw(raw), None);
    }

    let action = AgentAction::from_label(decision.label());

    if action.is_conversational() {
        let reply = decision.response_text().unwrap_or(CLARIFY_REPLY).to_string();
        return (ChatResponse::reply(reply, action).with_raw(raw), Some(decision));
    }

    if action.requires_auth() && !identity.is_authenticated() {
        return (
            ChatResponse::reply(LOGIN_REPLY, AgentAction::Unknown).with_raw(raw),
            Some(decision),
        );
    }

    let decision = match ensure_slots(&decision, action, ctx) {
        SlotCheck::Ready(decision) => decision,
        SlotCheck::Missing { decision, question } => {
            return (
                ChatResponse::reply(question, AgentAction::SmallTalk).with_raw(raw),
                Some(decision),
            );
        }
    };

    let outcome = match build_request(action, &decision) {
        Ok(request) => dispatch(state, identity, request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(backend) => {
            let reply = build_reply(
                action,
                decision.response_text(),
                &backend,
                &state.config.payment_url,
            );
            let response = ChatResponse {
                reply,
                action,
                backend_response: Some(backend),
                raw_model_output: raw.map(str::to_string),
            };
            (response, Some(decision))
        }
        Err(e) => {
            tracing::warn!(action = action.as_str(), error = %e, "action failed");
            (ChatResponse::reply(DISPATCH_FAILED_REPLY, action).with_raw(raw), None)
        }
    }
}
