use crate::page::PageCanvas;
use crate::settings::Settings;
use crate::transcript::TextLine;

/// Highlight band geometry for one transcript line, in viewBox pixels.
/// Width is a fixed margin policy, not a measured text extent, so layout is
/// deterministic without font metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Stacks lines top-to-bottom from the top margin at a fixed line-height
/// increment. Blank lines still occupy a box. Lines past the page bottom are
/// laid out anyway; this is a single-page tool and never paginates.
pub fn layout_lines(lines: &[TextLine], canvas: &PageCanvas, settings: &Settings) -> Vec<LineBox> {
    let width = canvas.width_px as f32 - settings.left_margin * 2.0;
    let height = settings.font_size + settings.text_padding * 2.0;
    lines
        .iter()
        .enumerate()
        .map(|(index, _)| LineBox {
            x: settings.left_margin,
            y: settings.top_margin + index as f32 * settings.line_spacing,
            width,
            height,
        })
        .collect()
}
