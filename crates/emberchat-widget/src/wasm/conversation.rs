use emberchat_core::error::WidgetApiError;
use emberchat_core::protocol::{DomainChatRequest, PublicChatRequest};
use emberchat_core::session::{TurnRejection, TurnTicket};

use super::*;

pub(super) fn submit_message_from_input() {
    let Some(text) = dom::input_value() else {
        return;
    };
    submit_message(text);
}

/// One conversation turn per call. Empty input is rejected before anything
/// is touched; a submission while a turn is in flight is rejected and the
/// composer keeps its draft, so turns stay strictly serialized.
pub(super) fn submit_message(text: String) {
    let begun = SESSION.with(|session| {
        session
            .borrow_mut()
            .as_mut()
            .map(|session| session.begin_turn(&text))
    });
    let ticket = match begun {
        Some(Ok(ticket)) => ticket,
        Some(Err(TurnRejection::EmptyInput | TurnRejection::TurnInFlight)) | None => return,
    };

    dom::clear_input();
    dom::render_messages_dom();

    spawn_local(run_turn(ticket));
}

/// The remainder of the turn: one request, one terminal message, and the
/// typing indicator destroyed exactly once on either path.
async fn run_turn(ticket: TurnTicket) {
    let Some(config) = current_config() else {
        return;
    };
    let tenant = TENANT.with(|state| state.borrow().clone());

    let outcome = match &tenant {
        // Degraded mode: the host has no registered tenant, so the failure
        // is reported without a transport attempt.
        TenantResolution::Failed { message } => {
            Err(WidgetApiError::tenant_unresolved(message.clone()))
        }
        TenantResolution::Resolved { tenant } => {
            mark_turn_awaiting(&ticket);
            let request = DomainChatRequest {
                message: ticket.text.clone(),
                domain: tenant.domain.clone(),
            };
            network::post_domain_chat(&config.api_url, &request)
                .await
                .and_then(|response| {
                    response
                        .into_reply()
                        .map_err(|detail| WidgetApiError::backend(200, detail))
                })
        }
        TenantResolution::Unresolved => {
            mark_turn_awaiting(&ticket);
            let conversation_id = current_conversation_id();
            let request = PublicChatRequest::new(&ticket.text, &conversation_id);
            network::post_public_chat(&config.api_url, &request)
                .await
                .map(|response| response.response)
        }
    };

    SESSION.with(|session| {
        let mut session = session.borrow_mut();
        let Some(session) = session.as_mut() else {
            return;
        };
        match &outcome {
            Ok(reply) => {
                session.complete_turn(&ticket, reply);
            }
            Err(error) => {
                session.fail_turn(&ticket, &error.user_facing_text(&config.api_url));
            }
        }
    });
    dom::render_messages_dom();
}

fn mark_turn_awaiting(ticket: &TurnTicket) {
    SESSION.with(|session| {
        if let Some(session) = session.borrow_mut().as_mut() {
            session.mark_awaiting(ticket);
        }
    });
    dom::render_messages_dom();
}

fn current_conversation_id() -> String {
    SESSION.with(|session| {
        session
            .borrow()
            .as_ref()
            .map(|session| session.conversation_id.clone())
            .unwrap_or_default()
    })
}
