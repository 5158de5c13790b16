use crate::adapters::fonts::Typeface;
use crate::core::layout::{PageLayout, Rgb};
use crate::utils::error::{FoodgramError, Result};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, Point, Pt,
    Rect,
};
use std::io::Cursor;

const DOCUMENT_TITLE: &str = "Shopping list";

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(rgb.r, rgb.g, rgb.b, None))
}

fn render_error(e: printpdf::Error) -> FoodgramError {
    FoodgramError::RenderError {
        message: e.to_string(),
    }
}

fn register_font(doc: &PdfDocumentReference, typeface: &Typeface) -> Result<IndirectFontRef> {
    match typeface {
        Typeface::Embedded(font) => doc
            .add_external_font(Cursor::new(font.data()))
            .map_err(|e| FoodgramError::FontError {
                message: format!("Unable to embed font: {}", e),
            }),
        Typeface::Courier => doc.add_builtin_font(BuiltinFont::Courier).map_err(render_error),
    }
}

fn check_encodable(layout: &PageLayout, typeface: &Typeface) -> Result<()> {
    for run in &layout.texts {
        if let Some(ch) = typeface.first_unencodable(&run.text) {
            return Err(FoodgramError::RenderError {
                message: format!(
                    "Character {:?} in \"{}\" cannot be set in builtin Courier; configure document.font_path",
                    ch, run.text
                ),
            });
        }
    }
    Ok(())
}

/// Serializes a composed page into a single-page PDF.
///
/// Fails instead of writing a page with characters the typeface would drop.
pub fn write_pdf(layout: &PageLayout, typeface: &Typeface) -> Result<Vec<u8>> {
    check_encodable(layout, typeface)?;

    let (doc, page, layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        mm(layout.width),
        mm(layout.height),
        "Layer 1",
    );
    let font = register_font(&doc, typeface)?;
    let canvas = doc.get_page(page).get_layer(layer);

    canvas.set_fill_color(color(layout.background));
    canvas.add_rect(
        Rect::new(mm(0.0), mm(0.0), mm(layout.width), mm(layout.height))
            .with_mode(PaintMode::Fill),
    );

    canvas.set_outline_color(color(Rgb::BLACK));
    for rule in &layout.rules {
        canvas.set_outline_thickness(rule.width);
        canvas.add_line(Line {
            points: vec![
                (Point::new(mm(rule.x1), mm(rule.y)), false),
                (Point::new(mm(rule.x2), mm(rule.y)), false),
            ],
            is_closed: false,
        });
    }

    for run in &layout.texts {
        canvas.set_fill_color(color(run.color));
        canvas.use_text(run.text.as_str(), run.font_size, mm(run.x), mm(run.y), &font);
    }

    let bytes = doc.save_to_bytes().map_err(render_error)?;
    tracing::debug!(
        "Serialized PDF: {} text runs, {} bytes",
        layout.texts.len(),
        bytes.len()
    );

    Ok(bytes)
}
