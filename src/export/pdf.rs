//! Single-page PDF emitter
//!
//! Writes a minimal PDF 1.4 file by hand: one page, the built-in Helvetica
//! font, the title centered-ish at the top and one text line per expense.
//! Lines are shrunk to fit the page rather than spilling onto a second one.
//!
//! The shrinking stops at a 4pt floor. At that size the body holds about 116
//! lines including the summary, so roughly 114 expenses; with more, the
//! trailing lines run past the bottom margin and fall off the page. Use CSV
//! for large reports.

use std::io::Write;

use super::ReportDocument;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const MIN_BODY_SIZE: f32 = 4.0;
const LEADING_RATIO: f32 = 1.4;

/// Render the document as PDF bytes
pub fn render_pdf(doc: &ReportDocument) -> Vec<u8> {
    let content = page_content(doc);

    let objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT
        )
        .into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
        stream_object(&content),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

fn stream_object(content: &[u8]) -> Vec<u8> {
    let mut body = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(b"\nendstream");
    body
}

fn body_height() -> f32 {
    PAGE_HEIGHT - 2.0 * MARGIN - TITLE_SIZE * 2.0
}

/// Whether `line_count` expense lines plus the summary fit above the bottom
/// margin at the smallest font size
pub fn fits_on_page(line_count: usize) -> bool {
    (line_count + 2) as f32 * MIN_BODY_SIZE * LEADING_RATIO <= body_height()
}

/// Font size that fits every line plus the summary below the title
fn body_size(line_count: usize) -> f32 {
    let available = body_height();
    let needed = (line_count + 2) as f32 * BODY_SIZE * LEADING_RATIO;
    if needed <= available {
        BODY_SIZE
    } else {
        (available / ((line_count + 2) as f32 * LEADING_RATIO)).max(MIN_BODY_SIZE)
    }
}

fn page_content(doc: &ReportDocument) -> Vec<u8> {
    let size = body_size(doc.lines.len());
    let leading = size * LEADING_RATIO;
    let title_y = PAGE_HEIGHT - MARGIN;

    let mut content = Vec::new();
    // Writes into a Vec<u8> cannot fail
    let _ = write!(
        content,
        "BT\n/F1 {} Tf\n{} {} Td\n(",
        TITLE_SIZE, MARGIN, title_y
    );
    push_escaped(&mut content, &doc.title);
    let _ = write!(
        content,
        ") Tj\nET\nBT\n/F1 {:.2} Tf\n{:.2} TL\n{} {:.2} Td\n",
        size,
        leading,
        MARGIN,
        title_y - TITLE_SIZE * 2.0
    );

    for line in &doc.lines {
        content.push(b'(');
        push_escaped(&mut content, line);
        content.extend_from_slice(b") Tj\nT*\n");
    }
    content.extend_from_slice(b"T*\n(");
    push_escaped(&mut content, &doc.summary);
    content.extend_from_slice(b") Tj\nET");
    content
}

/// Escape a string for a PDF literal in WinAnsiEncoding (`?` when unmapped)
fn push_escaped(out: &mut Vec<u8>, text: &str) {
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\n' | '\r' => out.push(b' '),
            _ => out.push(win_ansi_byte(ch).unwrap_or(b'?')),
        }
    }
}

/// WinAnsiEncoding byte for `ch`
///
/// Matches Latin-1 except in 0x80..=0x9F, where the code page places
/// typographic punctuation and a few extra letters.
fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        '\t' => b' ',
        _ => return None,
    };
    Some(byte)
}
