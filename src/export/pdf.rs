//! Paginated A4 table reports.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::Tabular;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 6.0;
/// Title and generation date, first page only
const TITLE_BLOCK: f32 = 20.0;
const FONT_SIZE: f32 = 8.0;
const TITLE_FONT_SIZE: f32 = 16.0;
/// Rough Helvetica glyph width at `FONT_SIZE`, used to clip cells
const CHAR_WIDTH: f32 = 1.6;
const INDEX_COLUMN_WIDTH: f32 = 8.0;

/// Data rows that fit on a page below the column header
pub fn rows_per_page(first_page: bool) -> usize {
    let mut usable = PAGE_HEIGHT - 2.0 * MARGIN - ROW_HEIGHT;
    if first_page {
        usable -= TITLE_BLOCK;
    }
    (usable / ROW_HEIGHT).floor() as usize
}

/// Number of pages needed for `rows` data rows (at least one)
pub fn page_count(rows: usize) -> usize {
    let first = rows_per_page(true);
    if rows <= first {
        1
    } else {
        1 + (rows - first).div_ceil(rows_per_page(false))
    }
}

/// Column x offsets: a leading `#` column, then `T`'s columns scaled to the page
fn column_layout<T: Tabular>() -> Vec<(f32, f32)> {
    let widths = T::column_widths();
    let total: f32 = widths.iter().map(|w| f32::from(*w)).sum::<f32>().max(1.0);
    let available = PAGE_WIDTH - 2.0 * MARGIN - INDEX_COLUMN_WIDTH;

    let mut layout = vec![(MARGIN, INDEX_COLUMN_WIDTH)];
    let mut x = MARGIN + INDEX_COLUMN_WIDTH;
    for w in widths {
        let width = available * f32::from(w) / total;
        layout.push((x, width));
        x += width;
    }
    layout
}

fn clip(text: &str, width: f32) -> String {
    let max_chars = ((width / CHAR_WIDTH).floor() as usize).max(1);
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        clipped.push('.');
        clipped
    }
}

fn write_row(layer: &PdfLayerReference, font: &IndirectFontRef, layout: &[(f32, f32)], cells: &[String], y: f32) {
    for ((x, width), cell) in layout.iter().zip(cells) {
        layer.use_text(clip(cell, *width), FONT_SIZE, Mm(*x), Mm(y), font);
    }
}

/// Render `rows` as a paginated table with a title block and page footers
pub fn render_pdf<T: Tabular>(title: &str, generated: &str, rows: &[T]) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?;

    let layout = column_layout::<T>();
    let mut header = vec!["#".to_string()];
    header.extend(T::headers().into_iter().map(str::to_string));

    let pages = page_count(rows.len());
    let mut remaining = rows.iter().enumerate().peekable();

    for page_index in 0..pages {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let mut y = PAGE_HEIGHT - MARGIN;
        if page_index == 0 {
            layer.use_text(title, TITLE_FONT_SIZE, Mm(MARGIN), Mm(y), &bold);
            layer.use_text(format!("Generated on {generated}"), FONT_SIZE, Mm(MARGIN), Mm(y - 8.0), &font);
            y -= TITLE_BLOCK;
        }

        write_row(&layer, &bold, &layout, &header, y);
        y -= ROW_HEIGHT;

        for _ in 0..rows_per_page(page_index == 0) {
            let Some((index, row)) = remaining.next() else {
                break;
            };
            let mut cells = vec![(index + 1).to_string()];
            cells.extend(row.cells());
            write_row(&layer, &font, &layout, &cells, y);
            y -= ROW_HEIGHT;
        }

        layer.use_text(
            format!("Page {} of {}", page_index + 1, pages),
            FONT_SIZE,
            Mm(PAGE_WIDTH - MARGIN - 25.0),
            Mm(MARGIN / 2.0),
            &font,
        );
    }

    doc.save_to_bytes().map_err(|e| anyhow!("Failed to render PDF: {e}"))
}

/// Render and write a PDF report; returns the number of data rows
pub fn write_pdf_file<T: Tabular>(path: &Path, title: &str, generated: &str, rows: &[T]) -> Result<usize> {
    let bytes = render_pdf(title, generated, rows)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_split_after_the_title_page() {
        let first = rows_per_page(true);
        let rest = rows_per_page(false);
        assert!(first < rest);
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(first), 1);
        assert_eq!(page_count(first + 1), 2);
        assert_eq!(page_count(first + rest + 1), 3);
    }

    #[test]
    fn long_cells_are_clipped() {
        assert_eq!(clip("short", 40.0), "short");
        let clipped = clip("a very long owner name that cannot fit", 10.0);
        assert!(clipped.ends_with('.'));
        assert!(clipped.chars().count() <= 6);
    }
}
