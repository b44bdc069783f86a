use archive_core::SelectionEntry;
use archive_logging::{archive_debug, archive_warn};
use url::Url;

use crate::Backend;

/// Longest name, in characters, handed to the file saver.
pub const MAX_FILENAME_LEN: usize = 100;

const FALLBACK_EXTENSION: &str = "pdf";
const EMPTY_NAME_REPLACEMENT: &str = "document.pdf";

/// Value of the `id` query parameter, if the URL parses and carries a
/// non-empty one.
pub fn extract_resource_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `{code}_{name}_{title}.pdf`, with illegal characters replaced, whitespace
/// runs collapsed to `_` and the result capped at [`MAX_FILENAME_LEN`].
pub fn fallback_filename(entry: &SelectionEntry) -> String {
    let raw = format!(
        "{}_{}_{}.{FALLBACK_EXTENSION}",
        entry.item_code, entry.item_name, entry.title,
    );
    // Whitespace first, so a run holding `\t` or `\n` still becomes one `_`.
    let name = truncate_chars(
        replace_forbidden(&collapse_whitespace(&raw)),
        MAX_FILENAME_LEN,
    );
    if name.is_empty() {
        EMPTY_NAME_REPLACEMENT.to_string()
    } else {
        name
    }
}

/// Makes a backend-supplied name safe to write. Returns `None` when nothing
/// usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let cleaned = replace_forbidden(name);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return None;
    }
    let mut final_name = trimmed.to_string();
    let stem_len = final_name.split('.').next().map_or(0, str::len);
    if is_reserved_windows_name(&final_name[..stem_len]) {
        final_name.insert(stem_len, '_');
    }
    Some(truncate_chars(final_name, MAX_FILENAME_LEN))
}

/// Picks the name a document is saved under: the backend's canonical name
/// when it can be had, the generated fallback otherwise. Never fails.
pub struct FileNameResolver<'a> {
    backend: &'a dyn Backend,
}

impl<'a> FileNameResolver<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    pub async fn resolve(&self, entry: &SelectionEntry) -> String {
        let Some(resource_id) = extract_resource_id(&entry.url) else {
            archive_debug!("no resource id in {}, using fallback name", entry.url);
            return fallback_filename(entry);
        };

        match self.backend.file_info(&resource_id).await {
            Ok(info) => match sanitize_filename(&info.name) {
                Some(name) => name,
                None => {
                    archive_warn!("unusable file name {:?} for id {}", info.name, resource_id);
                    fallback_filename(entry)
                }
            },
            Err(err) => {
                archive_warn!("file info for id {} failed: {}", resource_id, err);
                fallback_filename(entry)
            }
        }
    }
}

fn replace_forbidden(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}' | '\u{7F}'
    )
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn truncate_chars(mut input: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = input.char_indices().nth(max_chars) {
        input.truncate(byte_idx);
    }
    input
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
