use percent_encoding::percent_decode_str;
use sha2::{Digest, Sha256};
use url::Url;

const MAX_STEM_CHARS: usize = 120;
const DEFAULT_EXTENSION: &str = "pdf";

/// Windows-safe local name for a downloaded document.
///
/// Uses the last path segment of `url` (the service names files after the
/// candidate, date and role). Falls back to `resume--{short_hash(url)}.pdf`
/// when the link has no usable segment.
pub fn artifact_filename(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned());

    let sanitized = segment.map(|s| sanitize(&s)).filter(|s| !s.is_empty());
    let name = match sanitized {
        Some(name) => name,
        None => return format!("resume--{}.{DEFAULT_EXTENSION}", short_hash(url.as_str())),
    };

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, ext),
        _ => (name.as_str(), DEFAULT_EXTENSION),
    };
    let mut stem: String = stem.chars().take(MAX_STEM_CHARS).collect();
    stem = stem.trim_end_matches(&['_', ' ', '.'][..]).to_string();
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    format!("{stem}.{extension}")
}

fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse runs of underscores left by replaced characters.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
}
