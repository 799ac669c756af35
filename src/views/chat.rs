use crate::pipeline::Pipeline;
use crate::store::Conversation;
use crate::types::{Attachment, FileSource, Message, Role};
use crate::views::shared::{
    attachment_kind_label, data_url, format_byte_size, markdown_to_html, mime_from_name,
};
use async_trait::async_trait;
use dioxus::events::Key;
use dioxus::html::FileEngine;
use dioxus::prelude::*;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const ACCEPTED_FILE_TYPES: &str = "image/*,audio/*,application/pdf,text/plain";

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

fn format_message_timestamp(timestamp: Option<OffsetDateTime>) -> Option<String> {
    let mut datetime = timestamp?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// Adapts the picker's file engine to the pipeline's read seam. Reads
/// stay deferred until submission, like the picker itself defers them.
struct PickedFiles {
    engine: Arc<dyn FileEngine>,
}

#[async_trait(?Send)]
impl FileSource for PickedFiles {
    async fn read(&self, name: &str) -> Option<Vec<u8>> {
        self.engine.read_file(name).await
    }
}

async fn stage_picked_files(engine: Arc<dyn FileEngine>) -> Vec<Attachment> {
    let source: Arc<dyn FileSource> = Arc::new(PickedFiles {
        engine: engine.clone(),
    });
    let mut staged = Vec::new();
    for name in engine.files() {
        let byte_size = engine.file_size(&name).await.unwrap_or(0);
        let mime_type = mime_from_name(&name);
        staged.push(Attachment::deferred(
            name,
            byte_size,
            mime_type,
            source.clone(),
        ));
    }
    staged
}

#[component]
pub fn ChatView() -> Element {
    let mut conversation = use_signal(Conversation::new);
    let pipeline = use_signal(|| Pipeline::from_env().map_err(|err| err.to_string()));

    let mut submit_draft = move || {
        let pipeline = match &*pipeline.read() {
            Ok(pipeline) => pipeline.clone(),
            Err(_) => return,
        };
        // Best-effort guard; the send control is disabled while loading
        // but the Enter key path lands here too.
        if conversation.read().is_loading() {
            return;
        }
        let Some(submission) = conversation.with_mut(|conv| pipeline.begin(conv)) else {
            return;
        };
        spawn(async move {
            let message = pipeline.finish(submission).await;
            conversation.with_mut(|conv| pipeline.complete(conv, message));
        });
    };

    let snapshot = conversation.read().clone();
    let loading = snapshot.is_loading();
    let draft_empty = snapshot.draft().is_empty();
    let draft_text = snapshot.draft().text.clone();
    let pending = snapshot.draft().attachments.clone();
    let config_error = pipeline.read().as_ref().err().cloned();

    rsx! {
        div { class: "main-container",
            if let Some(err) = config_error {
                div { class: "config-notice", "{err}" }
            }
            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    if snapshot.messages().is_empty() {
                        div { class: "empty-state",
                            "No output yet. Enter text or attach files and press Send."
                        }
                    }
                    for msg in snapshot.messages().iter() {
                        MessageRow { message: msg.clone() }
                    }
                    if loading {
                        div { class: "message-row assistant",
                            div { class: "shimmer-line",
                                span { class: "shimmer-text", "Processing…" }
                            }
                        }
                    }
                }
            }

            form { class: "composer",
                div { class: "composer-inner",
                    if !pending.is_empty() {
                        div { class: "pending-files",
                            for (i, attachment) in pending.iter().enumerate() {
                                div { class: "file-chip",
                                    span { class: "file-kind", "{attachment_kind_label(&attachment.mime_type)}" }
                                    span { class: "file-name", "{attachment.name}" }
                                    span { class: "file-size", "({format_byte_size(attachment.byte_size)})" }
                                    button {
                                        class: "chip-remove", r#type: "button", title: "Remove",
                                        onclick: move |_| conversation.with_mut(|conv| conv.remove_attachment(i)),
                                        "×"
                                    }
                                }
                            }
                        }
                    }
                    div { class: "hstack",
                        textarea {
                            rows: "2", placeholder: "Enter your text here…",
                            value: "{draft_text}",
                            oninput: move |ev| conversation.with_mut(|conv| conv.update_draft_text(ev.value())),
                            onkeydown: move |ev| {
                                if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                    ev.prevent_default();
                                    submit_draft();
                                }
                            },
                            autofocus: true,
                        }
                        label { class: "btn file-btn",
                            "Attach"
                            input {
                                r#type: "file", multiple: true,
                                accept: ACCEPTED_FILE_TYPES,
                                onchange: move |ev| {
                                    if let Some(engine) = ev.files() {
                                        spawn(async move {
                                            let staged = stage_picked_files(engine).await;
                                            conversation.with_mut(|conv| conv.add_attachments(staged));
                                        });
                                    }
                                },
                            }
                        }
                        button {
                            class: "btn btn-primary", r#type: "button",
                            disabled: loading || draft_empty,
                            onclick: move |_| submit_draft(),
                            if loading { "Processing…" } else { "Send" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: Message) -> Element {
    let role_class = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let timestamp = format_message_timestamp(message.created_at);

    rsx! {
        div { class: "message-row {role_class}",
            div { class: "message-stack",
                {match message.role {
                    Role::User => rsx! {
                        div { class: "bubble user",
                            if let Some(text) = message.text.as_ref() {
                                div { class: "user-text", "{text}" }
                            }
                            for attachment in message.attachments.iter() {
                                AttachmentView { attachment: attachment.clone() }
                            }
                        }
                    },
                    Role::Assistant => rsx! {
                        AssistantBubble {
                            text: message.text.clone().unwrap_or_default(),
                            is_error: message.is_error,
                        }
                    },
                }}
                if let Some(ts) = timestamp {
                    div { class: "message-meta {role_class}",
                        span { class: "message-timestamp", "{ts}" }
                    }
                }
            }
        }
    }
}

#[component]
fn AttachmentView(attachment: Attachment) -> Element {
    let is_image = attachment.mime_type.starts_with("image/");
    let preview = if is_image {
        attachment
            .preview_bytes()
            .map(|bytes| data_url(&attachment.mime_type, bytes))
    } else {
        None
    };

    rsx! {
        div { class: "attachment",
            if let Some(src) = preview {
                img { class: "attachment-preview", src: "{src}", alt: "{attachment.name}" }
            } else {
                div { class: "file-chip",
                    span { class: "file-kind", "{attachment_kind_label(&attachment.mime_type)}" }
                    span { class: "file-name", "{attachment.name}" }
                    span { class: "file-size", "({format_byte_size(attachment.byte_size)})" }
                }
            }
        }
    }
}

#[component]
fn AssistantBubble(text: String, is_error: bool) -> Element {
    if is_error {
        return rsx! {
            div { class: "bubble assistant error", "{text}" }
        };
    }
    let content_html = markdown_to_html(&text);
    rsx! {
        div { class: "bubble assistant",
            div { class: "md", dangerous_inner_html: "{content_html}" }
        }
    }
}
