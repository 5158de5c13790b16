use crate::core::FontMetrics;
use crate::utils::error::{FoodgramError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Advance width of every Courier glyph, in thousandths of an em.
const COURIER_ADVANCE: f32 = 600.0;

/// Characters of the Windows-1252 range 0x80..0x9F. Builtin PDF fonts are set with
/// WinAnsiEncoding and everything outside it is dropped by the writer.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

fn win_ansi_encodable(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(ch)
}

pub struct TrueTypeFont {
    data: Vec<u8>,
    units_per_em: f32,
    advances: HashMap<char, u16>,
    fallback_advance: u16,
}

impl TrueTypeFont {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FoodgramError::FontError {
            message: format!("Unable to parse TrueType data: {}", e),
        })?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(FoodgramError::FontError {
                message: "Font reports zero units per em".to_string(),
            });
        }

        let mut advances = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|codepoint| {
                    let Some(ch) = char::from_u32(codepoint) else {
                        return;
                    };
                    if let Some(advance) = subtable
                        .glyph_index(codepoint)
                        .and_then(|glyph| face.glyph_hor_advance(glyph))
                    {
                        advances.entry(ch).or_insert(advance);
                    }
                });
            }
        }

        // .notdef is drawn for characters the font lacks
        let fallback_advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .unwrap_or(units_per_em / 2);

        tracing::debug!(
            "Loaded TrueType font: {} mapped characters, {} units per em",
            advances.len(),
            units_per_em
        );

        Ok(Self {
            units_per_em: units_per_em as f32,
            advances,
            fallback_advance,
            data,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl FontMetrics for TrueTypeFont {
    fn string_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|ch| *self.advances.get(&ch).unwrap_or(&self.fallback_advance) as u32)
            .sum();
        units as f32 / self.units_per_em * font_size
    }
}

/// Font used for every text run of the document.
pub enum Typeface {
    /// TrueType file embedded into the PDF.
    Embedded(TrueTypeFont),
    /// PDF base-14 Courier. Needs no file, but only covers WinAnsi text.
    Courier,
}

impl Typeface {
    /// Loads the configured font file, or falls back to Courier when none is set.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::warn!(
                "No font file configured, using builtin Courier; only Windows-1252 text can be rendered"
            );
            return Ok(Self::Courier);
        };

        let data = std::fs::read(path).map_err(|e| FoodgramError::FontError {
            message: format!("Cannot read font file {}: {}", path.display(), e),
        })?;

        tracing::info!("Loading font from {}", path.display());
        TrueTypeFont::from_bytes(data).map(Self::Embedded)
    }

    /// First character of `text` the typeface cannot put on the page.
    ///
    /// Embedded fonts draw `.notdef` for unmapped characters, so only Courier can fail here.
    pub fn first_unencodable(&self, text: &str) -> Option<char> {
        match self {
            Typeface::Embedded(_) => None,
            Typeface::Courier => text.chars().find(|&ch| !win_ansi_encodable(ch)),
        }
    }
}

impl FontMetrics for Typeface {
    fn string_width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            Typeface::Embedded(font) => font.string_width(text, font_size),
            Typeface::Courier => {
                text.chars().count() as f32 * COURIER_ADVANCE / 1000.0 * font_size
            }
        }
    }
}
