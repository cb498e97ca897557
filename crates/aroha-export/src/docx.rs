use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, PageMargin, Paragraph, Run, RunFonts, Style, StyleType, Table,
    TableCell, TableRow,
};

use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// Generate a DOCX document from the report Markdown.
///
/// Supported subset:
/// - `# Heading` / `## Heading` → Heading 1 / Heading 2
/// - `- item` → bullet line
/// - `> text` → small italic note
/// - consecutive `| a | b |` lines → a table, first row bold, `|---|` rows skipped
/// - `**bold**` inline
/// - Everything else → normal paragraph
pub fn generate_docx(rendered: &str, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let margin = styles.margin_twips();
    let mut docx = Docx::new()
        .page_margin(
            PageMargin::new()
                .top(margin)
                .bottom(margin)
                .left(margin)
                .right(margin),
        )
        .add_style(heading_style("Heading1", "heading 1", styles.heading1_size, styles))
        .add_style(heading_style("Heading2", "heading 2", styles.heading2_size, styles));

    let mut table_rows: Vec<Vec<String>> = Vec::new();

    for line in rendered.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('|') {
            if !is_separator_row(trimmed) {
                table_rows.push(split_cells(trimmed));
            }
            continue;
        }
        if !table_rows.is_empty() {
            docx = docx.add_table(build_table(&std::mem::take(&mut table_rows), styles));
        }

        if trimmed.is_empty() {
            docx = docx.add_paragraph(Paragraph::new());
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            docx = docx.add_paragraph(heading_paragraph(text, "Heading2"));
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            docx = docx.add_paragraph(heading_paragraph(text, "Heading1"));
        } else if let Some(text) = trimmed.strip_prefix("- ") {
            docx = docx.add_paragraph(bullet_paragraph(text, styles));
        } else if let Some(text) = trimmed.strip_prefix("> ") {
            docx = docx.add_paragraph(note_paragraph(text, styles));
        } else {
            docx = docx.add_paragraph(body_paragraph(trimmed, styles));
        }
    }
    if !table_rows.is_empty() {
        docx = docx.add_table(build_table(&table_rows, styles));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

fn heading_style(style_id: &str, name: &str, size_pt: usize, styles: &DocumentStyles) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // OOXML uses half-points
        .bold()
        .fonts(RunFonts::new().ascii(&styles.heading_font))
}

fn heading_paragraph(text: &str, style_id: &str) -> Paragraph {
    Paragraph::new()
        .style(style_id)
        .add_run(Run::new().add_text(text))
}

fn text_run(text: &str, styles: &DocumentStyles) -> Run {
    Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.body_font))
}

fn bullet_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let mut para = Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(text_run("\u{2022} ", styles));
    for run in parse_inline(text, styles) {
        para = para.add_run(run);
    }
    para
}

fn note_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new().align(AlignmentType::Left).add_run(
        Run::new()
            .add_text(text)
            .italic()
            .size(styles.note_size * 2)
            .fonts(RunFonts::new().ascii(&styles.body_font)),
    )
}

fn body_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let mut para = Paragraph::new().align(AlignmentType::Left);
    for run in parse_inline(text, styles) {
        para = para.add_run(run);
    }
    para
}

fn is_separator_row(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn build_table(rows: &[Vec<String>], styles: &DocumentStyles) -> Table {
    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            let cells = cells
                .iter()
                .map(|text| {
                    let run = text_run(text, styles);
                    let run = if i == 0 { run.bold() } else { run };
                    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();
    Table::new(rows)
}

/// Parse simple inline formatting: **bold** segments.
fn parse_inline(text: &str, styles: &DocumentStyles) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("**") {
        let before = &remaining[..start];
        if !before.is_empty() {
            runs.push(text_run(before, styles));
        }

        let after_start = &remaining[start + 2..];
        let Some(end) = after_start.find("**") else {
            runs.push(text_run(remaining, styles));
            return runs;
        };
        runs.push(text_run(&after_start[..end], styles).bold());
        remaining = &after_start[end + 2..];
    }

    if !remaining.is_empty() {
        runs.push(text_run(remaining, styles));
    }

    runs
}
