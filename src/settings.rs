use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Layout and styling constants. One immutable instance per run, passed
/// explicitly into the layout engine and the composer.
#[derive(Debug, Clone)]
pub struct Settings {
    pub font_size: f32,
    pub line_spacing: f32,
    pub text_padding: f32,
    pub top_margin: f32,
    pub left_margin: f32,
    pub rect_fill: String,
    pub rect_opacity: f32,
    pub text_color: String,
    pub font_family: String,
    pub pdf_render_dpi: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            line_spacing: 27.0,
            text_padding: 5.0,
            top_margin: 40.0,
            left_margin: 20.0,
            rect_fill: "#FFFFFF".to_string(),
            rect_opacity: 0.9,
            text_color: "#000000".to_string(),
            font_family: "Noto Sans CJK JP".to_string(),
            pdf_render_dpi: 300,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    layout: Option<LayoutSettings>,
    overlay: Option<OverlaySettings>,
    pdf: Option<PdfSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct LayoutSettings {
    font_size: Option<f32>,
    line_spacing: Option<f32>,
    text_padding: Option<f32>,
    top_margin: Option<f32>,
    left_margin: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct OverlaySettings {
    fill_color: Option<String>,
    fill_opacity: Option<f32>,
    text_color: Option<String>,
    font_family: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PdfSettings {
    render_dpi: Option<u32>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(layout) = incoming.layout {
            if let Some(size) = layout.font_size {
                if size > 0.0 {
                    self.font_size = size;
                }
            }
            if let Some(spacing) = layout.line_spacing {
                if spacing > 0.0 {
                    self.line_spacing = spacing;
                }
            }
            if let Some(padding) = layout.text_padding {
                if padding >= 0.0 {
                    self.text_padding = padding;
                }
            }
            if let Some(margin) = layout.top_margin {
                if margin >= 0.0 {
                    self.top_margin = margin;
                }
            }
            if let Some(margin) = layout.left_margin {
                if margin >= 0.0 {
                    self.left_margin = margin;
                }
            }
        }
        if let Some(overlay) = incoming.overlay {
            if let Some(color) = overlay.fill_color {
                if !color.trim().is_empty() {
                    self.rect_fill = color;
                }
            }
            if let Some(opacity) = overlay.fill_opacity {
                if (0.0..=1.0).contains(&opacity) {
                    self.rect_opacity = opacity;
                }
            }
            if let Some(color) = overlay.text_color {
                if !color.trim().is_empty() {
                    self.text_color = color;
                }
            }
            if let Some(family) = overlay.font_family {
                if !family.trim().is_empty() {
                    self.font_family = family;
                }
            }
        }
        if let Some(pdf) = incoming.pdf {
            if let Some(dpi) = pdf.render_dpi {
                if dpi > 0 {
                    self.pdf_render_dpi = dpi;
                }
            }
        }
    }
}
