use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

use crate::error::Error;
use crate::page::PageCanvas;
use crate::settings::Settings;

/// Optional page background. Raster payloads are normalized to PNG so the
/// composer embeds a single uniform encoding.
#[derive(Debug, Clone)]
pub enum Background {
    None,
    Raster {
        png: Vec<u8>,
        width: u32,
        height: u32,
    },
}

/// Placement of the background on the page canvas, in viewBox pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Background {
    /// Centered aspect-fit rectangle on the canvas. The raster is scaled
    /// uniformly, never cropped or stretched.
    pub fn fit(&self, canvas: &PageCanvas) -> Option<FitRect> {
        match self {
            Background::None => None,
            Background::Raster { width, height, .. } => {
                Some(aspect_fit(*width, *height, canvas.width_px, canvas.height_px))
            }
        }
    }
}

pub(crate) fn aspect_fit(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> FitRect {
    let scale = (dst_w as f64 / src_w.max(1) as f64).min(dst_h as f64 / src_h.max(1) as f64);
    // The filled axis can land an ulp above the bound after the round trip
    // through scale; clamp so the fit never exceeds the canvas.
    let width = (src_w as f64 * scale).min(dst_w as f64);
    let height = (src_h as f64 * scale).min(dst_h as f64);
    FitRect {
        x: (dst_w as f64 - width) / 2.0,
        y: (dst_h as f64 - height) / 2.0,
        width,
        height,
    }
}

pub fn load_background(
    path: Option<&Path>,
    page_number: usize,
    settings: &Settings,
) -> Result<Background> {
    let Some(path) = path else {
        return Ok(Background::None);
    };
    let bytes = fs::read(path).map_err(|_| Error::InputNotFound {
        path: path.to_path_buf(),
    })?;
    match sniff_kind(path, &bytes)? {
        BackgroundKind::Pdf => {
            tracing::debug!(path = %path.display(), page = page_number, "rendering pdf background");
            render_pdf_page(path, page_number, settings.pdf_render_dpi)
        }
        BackgroundKind::Raster => {
            tracing::debug!(path = %path.display(), "decoding raster background");
            decode_raster(path, &bytes)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BackgroundKind {
    Pdf,
    Raster,
}

/// Content sniffing first, extension as fallback for formats `infer` does
/// not fingerprint (plain TIFF variants, stripped headers).
fn sniff_kind(path: &Path, bytes: &[u8]) -> Result<BackgroundKind> {
    if let Some(kind) = infer::get(bytes) {
        let mime = kind.mime_type();
        if mime == "application/pdf" {
            return Ok(BackgroundKind::Pdf);
        }
        if mime.starts_with("image/") {
            return Ok(BackgroundKind::Raster);
        }
    }
    match extension_lower(path).as_deref() {
        Some("pdf") => Ok(BackgroundKind::Pdf),
        Some("png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp") => {
            Ok(BackgroundKind::Raster)
        }
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: "not a decodable raster image or pdf".to_string(),
        }
        .into()),
    }
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_lowercase())
}

fn decode_raster(path: &Path, bytes: &[u8]) -> Result<Background> {
    let decoded = image::load_from_memory(bytes).map_err(|err| Error::UnsupportedFormat {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    let width = decoded.width();
    let height = decoded.height();
    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .with_context(|| format!("failed to re-encode background as png: {}", path.display()))?;
    Ok(Background::Raster { png, width, height })
}

fn render_pdf_page(path: &Path, page_number: usize, dpi: u32) -> Result<Background> {
    let available = pdf_page_count(path)?;
    ensure_page_in_range(path, page_number, available)?;

    let dir = tempdir().with_context(|| "failed to create temp dir for pdf render")?;
    let out_png = dir.path().join("page.png");
    // External rasterizers are 1-indexed.
    let page_arg = (page_number + 1).to_string();

    if command_exists("mutool") {
        let output = Command::new("mutool")
            .arg("draw")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-o")
            .arg(&out_png)
            .arg(path)
            .arg(&page_arg)
            .output()
            .with_context(|| "failed to run mutool")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!("mutool failed: {}", stderr.trim()),
            }
            .into());
        }
    } else if command_exists("pdftoppm") {
        let prefix = dir.path().join("page");
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg("-singlefile")
            .arg(path)
            .arg(&prefix)
            .output()
            .with_context(|| "failed to run pdftoppm")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!("pdftoppm failed: {}", stderr.trim()),
            }
            .into());
        }
    } else {
        return Err(anyhow!(
            "pdf rendering requires mutool or pdftoppm (install mupdf or poppler)"
        ));
    }

    let bytes = fs::read(&out_png)
        .with_context(|| format!("failed to read rendered pdf page: {}", out_png.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .with_context(|| "failed to decode rendered pdf page")?;
    Ok(Background::Raster {
        width: decoded.width(),
        height: decoded.height(),
        png: bytes,
    })
}

pub(crate) fn ensure_page_in_range(path: &Path, requested: usize, available: usize) -> Result<()> {
    if requested >= available {
        return Err(Error::PageIndex {
            path: path.to_path_buf(),
            requested,
            available,
        }
        .into());
    }
    Ok(())
}

fn pdf_page_count(path: &Path) -> Result<usize> {
    let output = if command_exists("mutool") {
        Command::new("mutool")
            .arg("info")
            .arg(path)
            .output()
            .with_context(|| "failed to run mutool")?
    } else if command_exists("pdfinfo") {
        Command::new("pdfinfo")
            .arg(path)
            .output()
            .with_context(|| "failed to run pdfinfo")?
    } else {
        return Err(anyhow!(
            "pdf inspection requires mutool or pdfinfo (install mupdf or poppler)"
        ));
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: format!("not a valid pdf: {}", stderr.trim()),
        }
        .into());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_page_count(&stdout).ok_or_else(|| {
        Error::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: "pdf page count not reported".to_string(),
        }
        .into()
    })
}

/// Both `mutool info` and `pdfinfo` report a `Pages: N` line.
fn parse_page_count(info: &str) -> Option<usize> {
    for line in info.lines() {
        if let Some(rest) = line.trim().strip_prefix("Pages:") {
            if let Ok(count) = rest.trim().parse::<usize>() {
                return Some(count);
            }
        }
    }
    None
}

fn command_exists(cmd: &str) -> bool {
    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path_var).any(|dir| dir.join(cmd).is_file())
}
