use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::background::Background;
use crate::layout::LineBox;
use crate::page::PageCanvas;
use crate::settings::Settings;
use crate::transcript::TextLine;

/// Assembles the final markup: background image first (paint order), then
/// one rect + text pair per transcript line. Identical inputs produce
/// byte-identical output.
pub fn compose(
    canvas: &PageCanvas,
    background: &Background,
    lines: &[TextLine],
    boxes: &[LineBox],
    settings: &Settings,
) -> String {
    debug_assert_eq!(lines.len(), boxes.len());

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg width=\"{w_mm}mm\" height=\"{h_mm}mm\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
        w_mm = canvas.width_mm,
        h_mm = canvas.height_mm,
        w = canvas.width_px,
        h = canvas.height_px,
    ));

    if let Background::Raster { png, .. } = background {
        // fit() is Some for every raster variant.
        if let Some(fit) = background.fit(canvas) {
            let uri = format!("data:image/png;base64,{}", BASE64.encode(png));
            svg.push_str(&format!(
                "  <image x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" href=\"{uri}\" xlink:href=\"{uri}\" preserveAspectRatio=\"xMidYMid meet\"/>\n",
                x = fit.x,
                y = fit.y,
                w = fit.width,
                h = fit.height,
                uri = uri,
            ));
        }
    }

    for (line, bbox) in lines.iter().zip(boxes.iter()) {
        let text_x = bbox.x + settings.text_padding;
        let text_y = bbox.y + bbox.height / 2.0;
        svg.push_str("  <g>\n");
        svg.push_str(&format!(
            "    <rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"{fill}\" stroke=\"none\" opacity=\"{opacity}\"/>\n",
            x = bbox.x,
            y = bbox.y,
            w = bbox.width,
            h = bbox.height,
            fill = escape_xml(&settings.rect_fill),
            opacity = settings.rect_opacity,
        ));
        svg.push_str(&format!(
            "    <text x=\"{x}\" y=\"{y}\" font-family=\"{family}\" font-size=\"{size}\" fill=\"{color}\" dominant-baseline=\"central\" text-anchor=\"start\">{text}</text>\n",
            x = text_x,
            y = text_y,
            family = escape_xml(&settings.font_family),
            size = settings.font_size,
            color = escape_xml(&settings.text_color),
            text = escape_xml(&line.text),
        ));
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
