//! M3U playlist parser producing language-tagged channels

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::models::Channel;

const EXTINF: &str = "#EXTINF:";

/// Logo used when an entry has no `tvg-logo`
pub const PLACEHOLDER_LOGO: &str = "https://picsum.photos/200/200?blur=2";
/// Category used when an entry has no `group-title`
pub const DEFAULT_GROUP: &str = "General";
/// Display name used when nothing follows the last comma
pub const UNKNOWN_NAME: &str = "Unknown Channel";

/// Metadata collected from an `#EXTINF` line, waiting for its stream URL
#[derive(Debug)]
struct PendingEntry {
    tvg_id: Option<String>,
    name: String,
    logo: String,
    group: String,
}

impl PendingEntry {
    fn from_extinf(line: &str) -> Self {
        let mut attrs = HashMap::new();
        extract_attrs(&line[EXTINF.len()..], &mut attrs);

        // Only the segment after the final comma is the display name
        let name = line
            .rfind(',')
            .map(|pos| line[pos + 1..].trim())
            .unwrap_or("");

        Self {
            tvg_id: attrs.remove("tvg-id"),
            name: if name.is_empty() { UNKNOWN_NAME.to_string() } else { name.to_string() },
            logo: attrs
                .remove("tvg-logo")
                .unwrap_or_else(|| PLACEHOLDER_LOGO.to_string()),
            group: attrs
                .remove("group-title")
                .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
        }
    }

    fn complete(self, url: &str, language: &str) -> Channel {
        let id = match self.tvg_id {
            Some(id) => id,
            None => synthetic_id(language, &self.group, &self.name, url),
        };
        Channel {
            id,
            name: self.name,
            logo: self.logo,
            group: self.group,
            language: language.to_string(),
            url: url.to_string(),
        }
    }
}

/// Parse M3U content, tagging every channel with `language`.
///
/// Never fails: an `#EXTINF` line without a following stream URL is dropped,
/// and missing attributes fall back to defaults.
pub fn parse_m3u(content: &str, language: &str) -> Vec<Channel> {
    let mut channels = Vec::new();
    let mut pending: Option<PendingEntry> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.starts_with(EXTINF) {
            // A previous entry still waiting for a URL is discarded here
            pending = Some(PendingEntry::from_extinf(line));
        } else if is_stream_url(line) {
            if let Some(entry) = pending.take() {
                channels.push(entry.complete(line, language));
            }
        }
    }

    channels
}

fn is_stream_url(line: &str) -> bool {
    !line.starts_with('#') && line.starts_with("http")
}

/// Deterministic id for entries without `tvg-id`, so repeated loads of the
/// same playlist produce the same catalog
pub fn synthetic_id(language: &str, group: &str, name: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [language, group, name, url] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let hex = format!("{:x}", hasher.finalize());
    format!("gen-{}", &hex[..12])
}

/// Extract `key="value"` / `key=value` attributes from the part of an
/// EXTINF line after the `#EXTINF:` marker. Keys are lowercased. Empty
/// values are treated as absent.
fn extract_attrs(info: &str, attrs: &mut HashMap<String, String>) {
    let info = info.trim_start();

    // Skip the duration (e.g. "-1" or "10.000000") and an optional comma after it
    let mut rest = info.trim_start_matches(|c: char| c.is_ascii_digit() || c == '-' || c == '.');
    if let Some(stripped) = rest.strip_prefix(',') {
        rest = stripped;
    }

    let mut chars = rest.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        // Collect key until '='; a bare word is skipped, an unquoted comma starts the name
        let mut key = String::new();
        let mut has_value = false;
        while let Some(&c) = chars.peek() {
            match c {
                '=' => {
                    chars.next();
                    has_value = true;
                    break;
                }
                ',' => return,
                c if c.is_whitespace() => break,
                _ => {
                    key.push(c);
                    chars.next();
                }
            }
        }

        if chars.peek().is_none() && !has_value {
            return;
        }
        if !has_value {
            continue;
        }

        // Tolerate stray quotes in front of keys
        let key = key.trim_matches('"').to_lowercase();

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' if chars.peek() == Some(&'"') => {
                        chars.next();
                        value.push('"');
                    }
                    _ => value.push(c),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == ',' {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }

        if !key.is_empty() && !value.is_empty() {
            attrs.insert(key, value);
        }
    }
}
