use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.footnotes = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.render.unsafe_ = true;
    options
});

pub fn markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

/// Whole-kilobyte display, matching how file pickers tend to round.
pub fn format_byte_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

pub fn attachment_kind_label(mime_type: &str) -> &'static str {
    if mime_type.starts_with("image/") {
        "image"
    } else if mime_type.starts_with("audio/") {
        "audio"
    } else if mime_type == "application/pdf" {
        "pdf"
    } else if mime_type.starts_with("text/") {
        "text"
    } else {
        "file"
    }
}

/// The picker's file engine hands back names only, so the MIME type is
/// inferred from the extension. Unknown extensions fall back to a
/// generic binary type; the accept list on the input is advisory and
/// nothing downstream filters on this.
pub fn mime_from_name(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_byte_size_rounds_up_to_kb() {
        assert_eq!(format_byte_size(512), "512 B");
        assert_eq!(format_byte_size(1024), "1 KB");
        assert_eq!(format_byte_size(1500), "2 KB");
    }

    #[test]
    fn test_mime_from_name_covers_accepted_kinds() {
        assert_eq!(mime_from_name("photo.PNG"), "image/png");
        assert_eq!(mime_from_name("memo.wav"), "audio/wav");
        assert_eq!(mime_from_name("paper.pdf"), "application/pdf");
        assert_eq!(mime_from_name("notes.txt"), "text/plain");
        assert_eq!(mime_from_name("mystery.bin"), "application/octet-stream");
        assert_eq!(mime_from_name("no-extension"), "application/octet-stream");
    }

    #[test]
    fn test_attachment_kind_label() {
        assert_eq!(attachment_kind_label("image/jpeg"), "image");
        assert_eq!(attachment_kind_label("audio/ogg"), "audio");
        assert_eq!(attachment_kind_label("application/pdf"), "pdf");
        assert_eq!(attachment_kind_label("application/zip"), "file");
    }
}
