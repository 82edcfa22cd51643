/// Millimetres to CSS pixels at 96 DPI.
const MM_TO_PX: f64 = 3.779527559;

const A4_WIDTH_MM: f64 = 210.0;
const A4_HEIGHT_MM: f64 = 297.0;

/// Fixed page canvas. The mm dimensions size the SVG root so viewers render
/// at true physical scale; the px dimensions define the viewBox coordinate
/// space every element is placed in.
#[derive(Debug, Clone, Copy)]
pub struct PageCanvas {
    pub width_mm: f64,
    pub height_mm: f64,
    pub width_px: u32,
    pub height_px: u32,
}

impl PageCanvas {
    pub fn a4() -> Self {
        Self {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
            width_px: (A4_WIDTH_MM * MM_TO_PX) as u32,
            height_px: (A4_HEIGHT_MM * MM_TO_PX) as u32,
        }
    }
}
