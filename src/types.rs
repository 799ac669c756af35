use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Async access to the bytes of a picked file.
///
/// `None` means the platform could not produce the contents (moved,
/// deleted, permission revoked). Reads happen at submission time, not
/// at selection time.
#[async_trait(?Send)]
pub trait FileSource {
    async fn read(&self, name: &str) -> Option<Vec<u8>>;
}

#[derive(Clone)]
pub enum AttachmentSource {
    /// Contents already in memory.
    Memory(Arc<[u8]>),
    /// Deferred read through the platform file picker.
    Deferred(Arc<dyn FileSource>),
}

impl fmt::Debug for AttachmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            Self::Deferred(_) => write!(f, "Deferred"),
        }
    }
}

impl PartialEq for AttachmentSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Memory(a), Self::Memory(b)) => a == b,
            (Self::Deferred(a), Self::Deferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A user-selected file staged for sending. Base64 encoding happens
/// lazily when the draft is submitted; until then only the metadata and
/// a handle to the contents are held. Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub source: AttachmentSource,
}

impl Attachment {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            byte_size: bytes.len() as u64,
            mime_type: mime_type.into(),
            source: AttachmentSource::Memory(bytes),
        }
    }

    pub fn deferred(
        name: impl Into<String>,
        byte_size: u64,
        mime_type: impl Into<String>,
        source: Arc<dyn FileSource>,
    ) -> Self {
        Self {
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
            source: AttachmentSource::Deferred(source),
        }
    }

    pub async fn read_bytes(&self) -> Option<Vec<u8>> {
        match &self.source {
            AttachmentSource::Memory(bytes) => Some(bytes.to_vec()),
            AttachmentSource::Deferred(source) => source.read(&self.name).await,
        }
    }

    /// Bytes available without an async read, used for inline previews.
    pub fn preview_bytes(&self) -> Option<&[u8]> {
        match &self.source {
            AttachmentSource::Memory(bytes) => Some(bytes),
            AttachmentSource::Deferred(_) => None,
        }
    }
}

/// One turn in the transcript. User messages carry non-empty text or at
/// least one attachment; assistant messages always carry text.
/// Immutable once appended.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
    pub is_error: bool,
    pub created_at: Option<OffsetDateTime>,
}

impl Message {
    pub fn user(text: Option<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            role: Role::User,
            text,
            attachments,
            is_error: false,
            created_at: Some(OffsetDateTime::now_utc()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: Some(text.into()),
            attachments: Vec::new(),
            is_error: false,
            created_at: Some(OffsetDateTime::now_utc()),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(text)
        }
    }
}

/// The not-yet-sent input state: text buffer plus pending attachments
/// in selection order. Duplicates by name are allowed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl Draft {
    /// Empty for submission purposes: nothing but whitespace and no
    /// pending files.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }
}
