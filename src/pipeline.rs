use crate::ai::{GeminiClient, GenerationService, Part, ServiceError};
use crate::store::Conversation;
use crate::types::{Attachment, Message};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not read {name}")]
    AttachmentUnreadable { name: String },
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// The work captured by `begin`: the trimmed text and the attachments
/// to encode, detached from the draft so the draft can be cleared
/// before any of the slow work starts.
#[derive(Clone, Debug)]
pub struct Submission {
    text: Option<String>,
    attachments: Vec<Attachment>,
}

/// Turns a non-empty draft into one outbound request and exactly one
/// resulting transcript append. A submission runs in three named steps
/// so the UI can cross its await point between them and tests can
/// assert the ordering:
///
/// 1. `begin` — synchronous: loading on, user message appended, draft
///    cleared (the optimistic clear), submission captured.
/// 2. `finish` — asynchronous: attachments encoded, service invoked,
///    result or failure folded into an assistant message.
/// 3. `complete` — synchronous: message appended, loading off.
#[derive(Clone)]
pub struct Pipeline {
    service: Arc<dyn GenerationService>,
}

impl Pipeline {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Pipeline over the real Gemini client, configured from the
    /// environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(GeminiClient::from_env()?)))
    }

    /// Returns `None` without touching the conversation when the draft
    /// is empty (whitespace-only text counts as empty).
    pub fn begin(&self, conversation: &mut Conversation) -> Option<Submission> {
        let (text, attachments) = {
            let draft = conversation.draft();
            let trimmed = draft.text.trim();
            if trimmed.is_empty() && draft.attachments.is_empty() {
                return None;
            }
            let text = (!trimmed.is_empty()).then(|| trimmed.to_string());
            (text, draft.attachments.clone())
        };

        conversation.set_loading(true);
        conversation.append_message(Message::user(text.clone(), attachments.clone()));
        conversation.clear_draft();

        Some(Submission { text, attachments })
    }

    /// Never fails: read, encoding, and service errors all become
    /// error messages destined for the transcript.
    pub async fn finish(&self, submission: Submission) -> Message {
        match self.run(submission).await {
            Ok(reply) => Message::assistant(reply),
            Err(err) => {
                tracing::error!(error = %err, "submission failed");
                Message::error(format!("Error: {err}"))
            }
        }
    }

    pub fn complete(&self, conversation: &mut Conversation, message: Message) {
        conversation.append_message(message);
        conversation.set_loading(false);
    }

    /// The three steps composed, for flows that can hold the
    /// conversation across the await.
    pub async fn submit(&self, conversation: &mut Conversation) {
        let Some(submission) = self.begin(conversation) else {
            return;
        };
        let message = self.finish(submission).await;
        self.complete(conversation, message);
    }

    async fn run(&self, submission: Submission) -> Result<String, PipelineError> {
        let parts = build_parts(submission.text.as_deref(), &submission.attachments).await?;
        Ok(self.service.generate(parts).await?)
    }
}

/// Builds the request part list: the text part first when present, then
/// one inline-data part per attachment in selection order. Every read
/// completes before this returns; the first unreadable file aborts the
/// rest of the batch.
pub async fn build_parts(
    text: Option<&str>,
    attachments: &[Attachment],
) -> Result<Vec<Part>, PipelineError> {
    let mut parts = Vec::with_capacity(attachments.len() + 1);
    if let Some(text) = text {
        parts.push(Part::text(text));
    }
    for attachment in attachments {
        let bytes =
            attachment
                .read_bytes()
                .await
                .ok_or_else(|| PipelineError::AttachmentUnreadable {
                    name: attachment.name.clone(),
                })?;
        parts.push(Part::inline_data(
            attachment.mime_type.clone(),
            BASE64.encode(bytes),
        ));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileSource;
    use async_trait::async_trait;

    struct NoSuchFile;

    #[async_trait(?Send)]
    impl FileSource for NoSuchFile {
        async fn read(&self, _name: &str) -> Option<Vec<u8>> {
            None
        }
    }

    #[tokio::test]
    async fn test_build_parts_text_leads_attachments() {
        let attachments = vec![
            Attachment::from_bytes("a.png", "image/png", vec![1, 2, 3]),
            Attachment::from_bytes("b.txt", "text/plain", b"hi".to_vec()),
        ];

        let parts = build_parts(Some("caption"), &attachments).await.unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], Part::text("caption"));
        assert_eq!(
            parts[1],
            Part::inline_data("image/png", BASE64.encode([1, 2, 3]))
        );
        assert_eq!(parts[2], Part::inline_data("text/plain", BASE64.encode("hi")));
    }

    #[tokio::test]
    async fn test_build_parts_without_text_starts_with_attachments() {
        let attachments = vec![Attachment::from_bytes("a.png", "image/png", vec![7])];
        let parts = build_parts(None, &attachments).await.unwrap();
        assert!(matches!(parts[0], Part::InlineData { .. }));
    }

    #[tokio::test]
    async fn test_build_parts_unreadable_file_aborts_batch() {
        let attachments = vec![
            Attachment::deferred("gone.pdf", 10, "application/pdf", Arc::new(NoSuchFile)),
            Attachment::from_bytes("ok.txt", "text/plain", b"fine".to_vec()),
        ];

        let err = build_parts(Some("text"), &attachments).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::AttachmentUnreadable { ref name } if name == "gone.pdf"
        ));
    }
}
