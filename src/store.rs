use crate::types::{Attachment, Draft, Message};

/// The transcript plus the current draft. Single-writer: only the UI
/// event loop mutates it, so there is no locking here. The transcript
/// is append-only; messages are never edited or removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    draft: Draft,
    loading: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// True while a submission is in flight. Toggled only by the
    /// pipeline; the UI reads it to disable the send control.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Appends to the end of the transcript. The message invariant
    /// (user turns carry text or attachments, assistant turns carry
    /// text) is the caller's responsibility.
    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the draft text verbatim. Trimming happens in the
    /// pipeline, not here.
    pub fn update_draft_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    /// Appends to the pending set in order. No size or type filtering;
    /// the picker's accept list is advisory only.
    pub fn add_attachments(&mut self, files: impl IntoIterator<Item = Attachment>) {
        self.draft.attachments.extend(files);
    }

    /// Positional removal. Out-of-range indices are silently ignored.
    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.draft.attachments.len() {
            self.draft.attachments.remove(index);
        }
    }

    pub fn clear_draft(&mut self) {
        self.draft = Draft::default();
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn attachment(name: &str) -> Attachment {
        Attachment::from_bytes(name, "text/plain", b"contents".to_vec())
    }

    #[test]
    fn test_append_preserves_order() {
        let mut conv = Conversation::new();
        conv.append_message(Message::user(Some("first".into()), vec![]));
        conv.append_message(Message::assistant("second"));

        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.messages()[0].role, Role::User);
        assert_eq!(conv.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn test_draft_text_is_stored_verbatim() {
        let mut conv = Conversation::new();
        conv.update_draft_text("  padded  \n");
        assert_eq!(conv.draft().text, "  padded  \n");
    }

    #[test]
    fn test_add_attachments_keeps_duplicates() {
        let mut conv = Conversation::new();
        conv.add_attachments([attachment("a.txt"), attachment("a.txt")]);
        assert_eq!(conv.draft().attachments.len(), 2);
    }

    #[test]
    fn test_remove_attachment_preserves_relative_order() {
        let mut conv = Conversation::new();
        conv.add_attachments([attachment("a"), attachment("b"), attachment("c")]);

        conv.remove_attachment(1);

        let names: Vec<&str> = conv
            .draft()
            .attachments
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_attachment_out_of_range_is_a_noop() {
        let mut conv = Conversation::new();
        conv.add_attachments([attachment("a")]);

        conv.remove_attachment(5);

        assert_eq!(conv.draft().attachments.len(), 1);
    }

    #[test]
    fn test_clear_draft_resets_text_and_attachments() {
        let mut conv = Conversation::new();
        conv.update_draft_text("hello");
        conv.add_attachments([attachment("a")]);

        conv.clear_draft();

        assert!(conv.draft().text.is_empty());
        assert!(conv.draft().attachments.is_empty());
    }
}
