//! Text cleaning helpers used by the stock kinds.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</\s*(script|style)\s*>").expect("valid regex")
});

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*):").expect("valid regex"));

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp", "ftps"];

/// Elements rich text may keep; everything else is unwrapped to its text.
const RICH_TEXT_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "code", "del", "em", "h2", "h3", "h4", "hr", "i",
    "li", "ol", "p", "pre", "s", "small", "strong", "sub", "sup", "u", "ul",
];

/// Remove tags, dropping the contents of script and style blocks entirely.
pub fn strip_tags(input: &str) -> String {
    let without_blocks = SCRIPT_BLOCKS.replace_all(input, "");
    TAGS.replace_all(&without_blocks, "").into_owned()
}

/// Single-line text: tags stripped, whitespace runs collapsed, trimmed.
pub fn sanitize_text(input: &str) -> String {
    let stripped = strip_tags(input);
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Multi-line text: tags stripped, line endings normalized, newlines kept.
pub fn sanitize_textarea(input: &str) -> String {
    let stripped = strip_tags(input).replace("\r\n", "\n").replace('\r', "\n");
    stripped
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Rich text: formatting markup kept, everything else removed.
///
/// Runs an allowlist parse: only `RICH_TEXT_TAGS` survive, attributes are
/// limited to the sanitizer's safe defaults, and link targets must use one
/// of the allowed URL schemes after entity decoding. Script and style
/// elements are dropped together with their contents.
pub fn sanitize_rich_text(input: &str) -> String {
    rich_text_policy().clean(input).to_string().trim().to_string()
}

fn rich_text_policy() -> ammonia::Builder<'static> {
    let mut policy = ammonia::Builder::default();
    policy
        .tags(RICH_TEXT_TAGS.iter().copied().collect())
        .url_schemes(ALLOWED_SCHEMES.iter().copied().collect())
        .link_rel(Some("nofollow noopener"));
    policy
}

/// URL: whitespace and control characters removed; disallowed schemes yield "".
pub fn sanitize_url(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '<' | '>' | '"' | '`'))
        .collect();
    if let Some(caps) = URL_SCHEME.captures(&cleaned) {
        let scheme = caps[1].to_ascii_lowercase();
        if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
            return String::new();
        }
    }
    cleaned
}

/// Email: trimmed, lowercased, characters outside the address alphabet removed.
pub fn sanitize_email(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "@.!#$%&'*+/=?^_`{|}~-".contains(*c))
        .collect()
}

/// Phone: digits and `+ - ( ) .` kept, spaces collapsed.
pub fn sanitize_phone(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' '))
        .collect();
    WHITESPACE.replace_all(&kept, " ").trim().to_string()
}

/// File extension of a URL or path, lowercased, ignoring query and fragment.
pub fn file_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
