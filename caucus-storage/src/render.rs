//! Storage-markup builders: decision blocks, status macros, and the
//! status aggregation table.

use caucus_core::types::Decision;

use crate::escape::{escape_html, markdown_inline_to_storage};

// ---------------------------------------------------------------------------
// Status colours
// ---------------------------------------------------------------------------

/// Confluence status-macro colour derived from a status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Green,
    Yellow,
    Blue,
    Grey,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Green => "Green",
            StatusColor::Yellow => "Yellow",
            StatusColor::Blue => "Blue",
            StatusColor::Grey => "Grey",
        }
    }
}

/// Map a status string onto a macro colour.
///
/// DECIDED-family → Green, DEFERRED-family → Yellow, OPEN-family → Blue,
/// anything unrecognised → Grey.
pub fn status_color(status_text: &str) -> StatusColor {
    let upper = status_text.trim().to_ascii_uppercase();
    if upper.contains("APPROVE") || upper.contains("DECIDED") || upper.contains("ACCEPTED") {
        StatusColor::Green
    } else if upper.contains("DEFER") || upper.contains("POSTPONE") {
        StatusColor::Yellow
    } else if upper.contains("OPEN") || upper.contains("IN PROGRESS") {
        StatusColor::Blue
    } else {
        StatusColor::Grey
    }
}

// ---------------------------------------------------------------------------
// Macro builders
// ---------------------------------------------------------------------------

/// Build a status macro with the given colour and title.
pub fn status_macro(colour: &str, title: &str) -> String {
    format!(
        "<ac:structured-macro ac:name=\"status\" ac:schema-version=\"1\">\
<ac:parameter ac:name=\"colour\">{}</ac:parameter>\
<ac:parameter ac:name=\"title\">{}</ac:parameter>\
</ac:structured-macro>",
        escape_html(colour),
        escape_html(title)
    )
}

/// Render one decision as a status indicator plus a decision macro.
///
/// The rich-text body holds the description in its first paragraph and the
/// `Created:`/`Updated:` stamps in a separate trailing paragraph, so the
/// extractor can reverse the rendering without the stamps leaking into the
/// description.
pub fn decision_block(decision: &Decision) -> String {
    let status_text = decision.status.to_string();
    let indicator = status_macro(status_color(&status_text).as_str(), &status_text);

    let escaped_title = escape_html(&decision.title);
    let escaped_owner = escape_html(&decision.owner);
    let escaped_status = escape_html(&status_text);
    let body = markdown_inline_to_storage(&escape_html(&decision.description));

    // Stamps stay tag-free: emphasis would come back out of the extractor's
    // inline down-conversion as `*...*` and defeat the prefix match that
    // reads the dates back in.
    let mut stamps = Vec::new();
    if let Some(created) = &decision.date_created {
        stamps.push(format!("Created: {}", escape_html(created)));
    }
    if let Some(updated) = &decision.date_updated {
        stamps.push(format!("Updated: {}", escape_html(updated)));
    }
    let metadata = if stamps.is_empty() {
        String::new()
    } else {
        format!("\n        <p>{}</p>", stamps.join("<br/>"))
    };

    format!(
        r#"<p>{indicator}</p>
<ac:structured-macro ac:name="decision" ac:schema-version="1" ac:macro-id="{fingerprint}">
    <ac:parameter ac:name="title">{escaped_title}</ac:parameter>
    <ac:parameter ac:name="owner">{escaped_owner}</ac:parameter>
    <ac:parameter ac:name="status">{escaped_status}</ac:parameter>
    <ac:rich-text-body>
        <p>{body}</p>{metadata}
    </ac:rich-text-body>
</ac:structured-macro>"#,
        fingerprint = decision.fingerprint,
    )
}

// ---------------------------------------------------------------------------
// Status aggregation table
// ---------------------------------------------------------------------------

/// Occurrence count for one `(colour, title)` status pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub colour: String,
    pub title: String,
    pub count: usize,
}

/// Count `(colour, title)` pairs preserving first-seen order.
pub fn count_status_pairs(pairs: &[(String, String)]) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = Vec::new();
    for (colour, title) in pairs {
        match counts
            .iter_mut()
            .find(|c| &c.colour == colour && &c.title == title)
        {
            Some(existing) => existing.count += 1,
            None => counts.push(StatusCount {
                colour: colour.clone(),
                title: title.clone(),
                count: 1,
            }),
        }
    }
    counts
}

/// Markers delimiting the spliced aggregation table in the page body.
pub const REPORT_BEGIN_MARKER: &str = "<!- LABEL_TABLE_BEGIN -!>";
pub const REPORT_END_MARKER: &str = "<!- LABEL_TABLE_END -!>";

/// Render the aggregation table: one row per `(colour, title)` pair, a
/// separator, then one row per colour aggregate.
pub fn status_table(counts: &[StatusCount]) -> String {
    let mut table = String::from(
        "<table><thead><tr><th>Status</th><th>Occurrences</th></tr></thead><tbody>",
    );

    for entry in counts {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            status_macro(&entry.colour, &entry.title),
            entry.count
        ));
    }

    table.push_str("<tr><td colspan=\"2\"><strong>Total by Color</strong></td></tr>");

    // Aggregate by colour, first-seen order, title disregarded.
    let mut by_colour: Vec<(String, usize)> = Vec::new();
    for entry in counts {
        match by_colour.iter_mut().find(|(c, _)| c == &entry.colour) {
            Some((_, total)) => *total += entry.count,
            None => by_colour.push((entry.colour.clone(), entry.count)),
        }
    }
    for (colour, total) in &by_colour {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            status_macro(colour, colour),
            total
        ));
    }

    table.push_str("</tbody></table>");
    table
}

/// Replace the marker-delimited section of `body` with `table`, or append a
/// new marker-wrapped section when the markers are absent.
pub fn splice_status_table(body: &str, table: &str) -> String {
    match (body.find(REPORT_BEGIN_MARKER), body.find(REPORT_END_MARKER)) {
        (Some(begin), Some(end)) if begin < end => {
            let start = begin + REPORT_BEGIN_MARKER.len();
            format!("{}\n{}\n{}", &body[..start], table, &body[end..])
        }
        _ => format!("{body}\n{REPORT_BEGIN_MARKER}\n{table}\n{REPORT_END_MARKER}\n"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
