//! HTML escaping and inline-formatting conversion.
//!
//! Escaping must happen before inline conversion: the conversion introduces
//! literal `<strong>`/`<em>`/`<code>` tags that must not be re-escaped. The
//! five metacharacters map to their canonical entities, `&` substituted
//! first; unescaping applies the inverse order with `&amp;` last.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\*\*(.*?)\*\*").expect("bold regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\*(.*?)\*").expect("italic regex"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)`(.*?)`").expect("code regex"));

static STRONG_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<strong>(.*?)</strong>").expect("strong regex"));
static EM_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<em>(.*?)</em>").expect("em regex"));
static CODE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<code>(.*?)</code>").expect("code tag regex"));
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").expect("br regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

/// Escape the five HTML metacharacters. `&` goes first; later substitutions
/// must not see already-produced entities.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Inverse of [`escape_html`]; `&amp;` last so decoded `&` cannot seed
/// further decoding.
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Convert markdown inline emphasis in already-escaped text to storage-format
/// tags, and newlines to `<br/>`.
///
/// Bold runs first so the italic pass only sees single asterisks.
pub fn markdown_inline_to_storage(escaped: &str) -> String {
    let out = BOLD_RE.replace_all(escaped, "<strong>$1</strong>");
    let out = ITALIC_RE.replace_all(&out, "<em>$1</em>");
    let out = CODE_RE.replace_all(&out, "<code>$1</code>");
    out.replace('\n', "<br/>")
}

/// Inverse pass used by the extractor: `<br/>` back to newlines, emphasis
/// tags back to markdown markers, any remaining tags stripped, entities
/// unescaped, surrounding whitespace trimmed.
pub fn storage_inline_to_markdown(markup: &str) -> String {
    let out = BR_RE.replace_all(markup, "\n");
    let out = STRONG_TAG_RE.replace_all(&out, "**$1**");
    let out = EM_TAG_RE.replace_all(&out, "*$1*");
    let out = CODE_TAG_RE.replace_all(&out, "`$1`");
    let out = TAG_RE.replace_all(&out, "");
    unescape_html(&out).trim().to_string()
}
