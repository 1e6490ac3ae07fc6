use emberchat_core::markup::render_markup;
use emberchat_core::session::{MessageRole, TypingIndicator};
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::geometry;

use super::*;

/// Builds the toggle control and the conversation panel, both attached
/// directly to the document body so host layout, overflow, and stacking
/// rules never apply to them. Previously injected nodes are removed first,
/// so the mount is idempotent.
pub(super) fn mount_widget(config: &WidgetConfig) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;

    remove_injected_nodes(&document);

    let open = MOUNT.with(|state| state.borrow().is_open());

    let toggle = document
        .create_element("button")
        .map_err(|_| "failed to create toggle control".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "toggle control is not HtmlElement".to_string())?;
    toggle.set_id(TOGGLE_ID);
    let _ = toggle.set_attribute("type", "button");
    let _ = toggle.set_attribute("aria-label", &format!("Open {} chat", config.company_name));
    toggle.set_inner_text("\u{1f4ac}");
    apply_geometry(&toggle, &geometry::toggle_geometry());
    let _ = toggle.style().set_property("border", "none");
    let _ = toggle
        .style()
        .set_property("background", &config.primary_color);
    let _ = toggle.style().set_property("color", "#ffffff");
    let _ = toggle.style().set_property("font-size", "24px");
    let _ = toggle.style().set_property("line-height", "1");
    let _ = toggle.style().set_property("cursor", "pointer");
    let _ = toggle
        .style()
        .set_property("box-shadow", "0 4px 12px rgba(0, 0, 0, 0.25)");

    let panel = document
        .create_element("section")
        .map_err(|_| "failed to create panel".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "panel is not HtmlElement".to_string())?;
    panel.set_id(PANEL_ID);
    apply_geometry(&panel, &geometry::panel_geometry(open));
    let _ = panel.style().set_property("background", "#ffffff");
    let _ = panel.style().set_property("border", "1px solid #e5e7eb");
    let _ = panel.style().set_property("border-radius", "12px");
    let _ = panel
        .style()
        .set_property("box-shadow", "0 12px 32px rgba(0, 0, 0, 0.2)");
    let _ = panel.style().set_property("overflow", "hidden");
    let _ = panel.style().set_property(
        "font-family",
        "-apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif",
    );

    let header = document
        .create_element("div")
        .map_err(|_| "failed to create header".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "header is not HtmlElement".to_string())?;
    header.set_id(HEADER_ID);
    let _ = header.style().set_property("display", "flex");
    let _ = header
        .style()
        .set_property("justify-content", "space-between");
    let _ = header.style().set_property("align-items", "center");
    let _ = header.style().set_property("padding", "12px 14px");
    let _ = header
        .style()
        .set_property("background", &config.primary_color);
    let _ = header.style().set_property("color", "#ffffff");
    let _ = header.style().set_property("flex", "0 0 auto");

    let title = document
        .create_element("span")
        .map_err(|_| "failed to create header title".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "header title is not HtmlElement".to_string())?;
    title.set_id(HEADER_TITLE_ID);
    title.set_inner_text(&header_title(config));
    let _ = title.style().set_property("font-weight", "600");
    let _ = title.style().set_property("font-size", "15px");
    let _ = header.append_child(&title);

    let close = document
        .create_element("button")
        .map_err(|_| "failed to create close control".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "close control is not HtmlElement".to_string())?;
    close.set_id(CLOSE_ID);
    let _ = close.set_attribute("type", "button");
    let _ = close.set_attribute("aria-label", "Close chat");
    close.set_inner_text("\u{00d7}");
    let _ = close.style().set_property("border", "none");
    let _ = close.style().set_property("background", "transparent");
    let _ = close.style().set_property("color", "#ffffff");
    let _ = close.style().set_property("font-size", "20px");
    let _ = close.style().set_property("cursor", "pointer");
    let _ = close.style().set_property("padding", "0 2px");
    let _ = header.append_child(&close);
    let _ = panel.append_child(&header);

    let messages = document
        .create_element("div")
        .map_err(|_| "failed to create message list".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "message list is not HtmlElement".to_string())?;
    messages.set_id(MESSAGES_ID);
    let _ = messages.style().set_property("display", "flex");
    let _ = messages.style().set_property("flex-direction", "column");
    let _ = messages.style().set_property("gap", "8px");
    let _ = messages.style().set_property("flex", "1 1 auto");
    let _ = messages.style().set_property("overflow-y", "auto");
    let _ = messages.style().set_property("padding", "12px");
    let _ = messages.style().set_property("background", "#f8fafc");
    let _ = panel.append_child(&messages);

    let composer = document
        .create_element("div")
        .map_err(|_| "failed to create composer".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "composer is not HtmlElement".to_string())?;
    composer.set_id(COMPOSER_ID);
    let _ = composer.style().set_property("display", "flex");
    let _ = composer.style().set_property("gap", "8px");
    let _ = composer.style().set_property("padding", "10px");
    let _ = composer.style().set_property("border-top", "1px solid #e5e7eb");
    let _ = composer.style().set_property("flex", "0 0 auto");

    let input = document
        .create_element("input")
        .map_err(|_| "failed to create input".to_string())?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| "input is not HtmlInputElement".to_string())?;
    input.set_id(INPUT_ID);
    input.set_placeholder("Type your message\u{2026}");
    let _ = input.set_attribute("aria-label", "Chat message");
    let _ = input.style().set_property("flex", "1");
    let _ = input.style().set_property("height", "36px");
    let _ = input.style().set_property("padding", "0 10px");
    let _ = input.style().set_property("border-radius", "8px");
    let _ = input.style().set_property("border", "1px solid #cbd5e1");
    let _ = input.style().set_property("font-size", "14px");
    let _ = composer.append_child(&input);

    let send = document
        .create_element("button")
        .map_err(|_| "failed to create send button".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "send button is not HtmlElement".to_string())?;
    send.set_id(SEND_ID);
    let _ = send.set_attribute("type", "button");
    send.set_inner_text("Send");
    let _ = send.style().set_property("height", "36px");
    let _ = send.style().set_property("padding", "0 14px");
    let _ = send.style().set_property("border-radius", "8px");
    let _ = send.style().set_property("border", "none");
    let _ = send.style().set_property("background", &config.primary_color);
    let _ = send.style().set_property("color", "#ffffff");
    let _ = send.style().set_property("font-weight", "600");
    let _ = send.style().set_property("cursor", "pointer");
    let _ = composer.append_child(&send);
    let _ = panel.append_child(&composer);

    body.append_child(&toggle)
        .map_err(|_| "failed to append toggle control".to_string())?;
    body.append_child(&panel)
        .map_err(|_| "failed to append panel".to_string())?;

    install_widget_handlers(&toggle, &close, &send, &input);
    Ok(())
}

/// Handlers are recreated on every mount because the resilience path can
/// replace the nodes they were attached to; stale closures die with the old
/// nodes when the slots are overwritten.
fn install_widget_handlers(
    toggle: &HtmlElement,
    close: &HtmlElement,
    send: &HtmlElement,
    input: &HtmlInputElement,
) {
    TOGGLE_CLICK_HANDLER.with(|slot| {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            super::toggle_widget();
        }));
        let _ = toggle.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    CLOSE_CLICK_HANDLER.with(|slot| {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            super::close_widget();
        }));
        let _ = close.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    SEND_CLICK_HANDLER.with(|slot| {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            conversation::submit_message_from_input();
        }));
        let _ = send.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    INPUT_KEYDOWN_HANDLER.with(|slot| {
        let callback = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::wrap(Box::new(
            move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" && !event.shift_key() {
                    event.prevent_default();
                    conversation::submit_message_from_input();
                }
            },
        ));
        let _ = input.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}

fn header_title(config: &WidgetConfig) -> String {
    TENANT.with(|state| {
        state
            .borrow()
            .identity()
            .map(|tenant| tenant.display_name.clone())
            .unwrap_or_else(|| config.company_name.clone())
    })
}

fn remove_injected_nodes(document: &Document) {
    for id in [TOGGLE_ID, PANEL_ID] {
        if let Some(existing) = document.get_element_by_id(id) {
            existing.remove();
        }
    }
}

/// Critical geometry goes in with `!important` so host stylesheets cannot
/// override position, size, or stacking order.
pub(super) fn apply_geometry(element: &HtmlElement, rules: &[(&'static str, String)]) {
    for (property, value) in rules {
        let _ = element
            .style()
            .set_property_with_priority(property, value, "important");
    }
}

pub(super) fn set_panel_open(open: bool) {
    let Some(panel) = element_by_id::<HtmlElement>(PANEL_ID) else {
        return;
    };
    apply_geometry(&panel, &geometry::panel_geometry(open));
    if open {
        if let Some(input) = element_by_id::<HtmlInputElement>(INPUT_ID) {
            let _ = input.focus();
        }
        scroll_messages_to_latest();
    }
}

/// Rebuilds the message list from session state. Elements are re-resolved by
/// reserved id on every call; the resilience loop and the backup supervisor
/// may have recreated the tree since the last render.
pub(super) fn render_messages_dom() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let Some(messages_element) = element_by_id::<HtmlElement>(MESSAGES_ID) else {
        return;
    };
    messages_element.set_inner_html("");

    let (messages, typing) = SESSION.with(|session| {
        let session = session.borrow();
        match session.as_ref() {
            Some(session) => (session.messages.clone(), session.typing.clone()),
            None => (Vec::new(), None),
        }
    });
    let accent = CONFIG.with(|config| {
        config
            .borrow()
            .as_ref()
            .map(|config| config.primary_color.clone())
            .unwrap_or_else(|| "#2563eb".to_string())
    });

    for message in &messages {
        if let Some(row) = build_message_row(&document, &message.role, &accent) {
            match message.role {
                MessageRole::Assistant => row.set_inner_html(&render_markup(&message.text)),
                MessageRole::User | MessageRole::SystemError => row.set_inner_text(&message.text),
            }
            let _ = messages_element.append_child(&row);
        }
    }
    if let Some(typing) = &typing {
        if let Some(row) = build_typing_row(&document, typing) {
            let _ = messages_element.append_child(&row);
        }
    }

    scroll_messages_to_latest();
}

fn build_message_row(
    document: &Document,
    role: &MessageRole,
    accent: &str,
) -> Option<HtmlElement> {
    let row = document
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    let _ = row.style().set_property("padding", "8px 10px");
    let _ = row.style().set_property("border-radius", "10px");
    let _ = row.style().set_property("max-width", "85%");
    let _ = row.style().set_property("font-size", "14px");
    let _ = row.style().set_property("line-height", "1.4");
    let _ = row.style().set_property("overflow-wrap", "break-word");
    match role {
        MessageRole::User => {
            let _ = row.style().set_property("align-self", "flex-end");
            let _ = row.style().set_property("background", accent);
            let _ = row.style().set_property("color", "#ffffff");
        }
        MessageRole::Assistant => {
            let _ = row.style().set_property("align-self", "flex-start");
            let _ = row.style().set_property("background", "#e2e8f0");
            let _ = row.style().set_property("color", "#0f172a");
        }
        MessageRole::SystemError => {
            let _ = row.style().set_property("align-self", "flex-start");
            let _ = row.style().set_property("background", "#fef2f2");
            let _ = row.style().set_property("border", "1px solid #fecaca");
            let _ = row.style().set_property("color", "#991b1b");
        }
    }
    Some(row)
}

fn build_typing_row(document: &Document, typing: &TypingIndicator) -> Option<HtmlElement> {
    let row = document
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    row.set_id(TYPING_ID);
    let _ = row.set_attribute("data-typing-id", &typing.id);
    row.set_inner_text(TYPING_LABEL);
    let _ = row.style().set_property("align-self", "flex-start");
    let _ = row.style().set_property("padding", "8px 10px");
    let _ = row.style().set_property("border-radius", "10px");
    let _ = row.style().set_property("background", "#e2e8f0");
    let _ = row.style().set_property("color", "#64748b");
    let _ = row.style().set_property("font-size", "14px");
    let _ = row.style().set_property("letter-spacing", "2px");
    Some(row)
}

pub(super) fn scroll_messages_to_latest() {
    if let Some(messages) = element_by_id::<HtmlElement>(MESSAGES_ID) {
        messages.set_scroll_top(messages.scroll_height());
    }
}

pub(super) fn input_value() -> Option<String> {
    element_by_id::<HtmlInputElement>(INPUT_ID).map(|input| input.value())
}

/// Optimistic clear: the field empties as soon as a turn is accepted, long
/// before the network settles.
pub(super) fn clear_input() {
    if let Some(input) = element_by_id::<HtmlInputElement>(INPUT_ID) {
        input.set_value("");
    }
}

pub(super) fn element_by_id<T: JsCast>(id: &str) -> Option<T> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<T>()
        .ok()
}
