use std::fmt::Debug;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

use crate::error::ExportError;

use super::layout::{Ink, Mark, Page, PagedDocument, TextStyle};

const LAYER_NAME: &str = "Report";
const RULE_THICKNESS_PT: f32 = 0.5;
const METER_THICKNESS_PT: f32 = 6.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn for_style(&self, style: TextStyle) -> &IndirectFontRef {
        if style.bold() { &self.bold } else { &self.regular }
    }
}

fn assembly_error(err: impl Debug) -> ExportError {
    ExportError::Assembly(format!("{err:?}"))
}

fn ink_color(ink: Ink) -> Color {
    let (r, g, b) = match ink {
        Ink::Text => (0.07, 0.09, 0.15),
        Ink::Muted => (0.42, 0.45, 0.50),
        Ink::Primary => (0.15, 0.39, 0.92),
        Ink::Success => (0.09, 0.64, 0.29),
        Ink::Warning => (0.85, 0.47, 0.02),
        Ink::Destructive => (0.86, 0.15, 0.15),
    };
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn track_color() -> Color {
    Color::Rgb(Rgb::new(0.90, 0.91, 0.93, None))
}

/// Builtin fonts only cover Latin-1; typographic punctuation is folded to
/// ASCII and anything else becomes `?`.
pub fn latin1_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '•' | '–' | '—' => '-',
            '‘' | '’' => '\'',
            '“' | '”' => '"',
            c if u32::from(c) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

fn horizontal(layer: &PdfLayerReference, x_mm: f32, y_mm: f32, width_mm: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x_mm), Mm(y_mm)), false),
            (Point::new(Mm(x_mm + width_mm), Mm(y_mm)), false),
        ],
        is_closed: false,
    });
}

fn draw_page(layer: &PdfLayerReference, page: &Page, height_mm: f32, fonts: &Fonts) {
    // Layout measures from the top edge; PDF user space starts at the bottom.
    let flip = |y_mm: f32| height_mm - y_mm;

    for mark in &page.marks {
        match mark {
            Mark::Text {
                text,
                style,
                ink,
                x_mm,
                baseline_mm,
            } => {
                layer.set_fill_color(ink_color(*ink));
                layer.use_text(
                    latin1_text(text),
                    style.size_pt(),
                    Mm(*x_mm),
                    Mm(flip(*baseline_mm)),
                    fonts.for_style(*style),
                );
            }
            Mark::Rule {
                x_mm,
                y_mm,
                width_mm,
            } => {
                layer.set_outline_color(track_color());
                layer.set_outline_thickness(RULE_THICKNESS_PT);
                horizontal(layer, *x_mm, flip(*y_mm), *width_mm);
            }
            Mark::Meter {
                x_mm,
                y_mm,
                width_mm,
                fraction,
            } => {
                layer.set_outline_thickness(METER_THICKNESS_PT);
                layer.set_outline_color(track_color());
                horizontal(layer, *x_mm, flip(*y_mm), *width_mm);
                if *fraction > 0.0 {
                    layer.set_outline_color(ink_color(Ink::Primary));
                    horizontal(layer, *x_mm, flip(*y_mm), *width_mm * *fraction);
                }
            }
        }
    }
}

/// Writes every laid-out page into a single PDF and returns its bytes.
#[tracing::instrument(
    name = "export_stage assemble",
    skip(paged),
    fields(export.stage = "assemble", export.pages = paged.page_count(), export.bytes)
)]
pub fn assemble(paged: &PagedDocument, title: &str) -> Result<Vec<u8>, ExportError> {
    let geometry = paged.geometry;
    let width = Mm(geometry.width_mm);
    let height = Mm(geometry.height_mm);

    let (doc, first_page, first_layer) =
        PdfDocument::new(latin1_text(title), width, height, LAYER_NAME);
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(assembly_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(assembly_error)?,
    };

    for (index, page) in paged.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, geometry.height_mm, &fonts);
    }

    let bytes = doc.save_to_bytes().map_err(assembly_error)?;
    tracing::Span::current().record("export.bytes", bytes.len());
    Ok(bytes)
}
