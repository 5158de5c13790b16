use crate::adapters::{fonts::Typeface, pdf::write_pdf};
use crate::core::layout::{compose, LayoutSettings, PageLayout};
use crate::core::IngredientLine;
use crate::utils::error::Result;
use std::sync::Arc;

/// Turns an aggregated shopping list into the downloadable PDF.
#[derive(Clone)]
pub struct ShoppingListRenderer {
    settings: Arc<LayoutSettings>,
    typeface: Arc<Typeface>,
}

impl ShoppingListRenderer {
    pub fn new(settings: LayoutSettings, typeface: Typeface) -> Self {
        Self {
            settings: Arc::new(settings),
            typeface: Arc::new(typeface),
        }
    }

    pub fn layout(&self, display_name: &str, lines: &[IngredientLine]) -> PageLayout {
        compose(&self.settings, self.typeface.as_ref(), display_name, lines)
    }

    pub fn render(&self, display_name: &str, lines: &[IngredientLine]) -> Result<Vec<u8>> {
        let layout = self.layout(display_name, lines);
        write_pdf(&layout, &self.typeface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::Section;

    fn renderer() -> ShoppingListRenderer {
        ShoppingListRenderer::new(LayoutSettings::default(), Typeface::Courier)
    }

    #[test]
    fn test_layout_uses_configured_typeface() {
        // Courier at 14pt: 8.4pt per glyph, so 47 chars fit and 48 (403.2pt) do not
        let fits = IngredientLine::new("a".repeat(37), "g", 1); // 46 chars
        let overflows = IngredientLine::new("a".repeat(39), "g", 1); // 48 chars

        let layout = renderer().layout("Bob", &[fits.clone()]);
        assert_eq!(layout.section(Section::Body).next().unwrap().font_size, 14.0);

        let layout = renderer().layout("Bob", &[fits, overflows]);
        let sizes: Vec<f32> = layout.section(Section::Body).map(|r| r.font_size).collect();
        assert_eq!(sizes, vec![14.0, 13.0]);
    }

    #[test]
    fn test_long_cyrillic_line_shrinks_with_embedded_font() {
        let Some(typeface) = crate::adapters::fonts::tests::system_typeface() else {
            return;
        };
        let renderer = ShoppingListRenderer::new(LayoutSettings::default(), typeface);
        // second line is 429pt wide at 14pt and 398.4pt at 13pt
        let lines = [
            IngredientLine::new("Flour", "g", 200),
            IngredientLine::new("Картофель молодой мытый отборный крупный", "г", 1500),
        ];

        let layout = renderer.layout("Алиса", &lines);
        let sizes: Vec<f32> = layout.section(Section::Body).map(|r| r.font_size).collect();
        assert_eq!(sizes, vec![14.0, 13.0]);

        let bytes = renderer.render("Алиса", &lines).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_courier_render_fails_on_unencodable_names() {
        let result = renderer().render("Алиса", &[IngredientLine::new("Соль", "г", 15)]);
        assert!(matches!(
            result,
            Err(crate::utils::error::FoodgramError::RenderError { .. })
        ));
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = renderer()
            .render("Bob", &[IngredientLine::new("Salt", "g", 15)])
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
