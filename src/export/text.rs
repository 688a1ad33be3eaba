//! Plain text emitter

use super::ReportDocument;

/// Header, a blank line, one line per expense, a blank line, then the summary
pub fn render_text(doc: &ReportDocument) -> String {
    let mut out = String::new();
    out.push_str(&doc.title);
    out.push_str("\n\n");
    for line in &doc.lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&doc.summary);
    out
}
