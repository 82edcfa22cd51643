use std::fs;

use svg_textboxes::{Config, Error, run};
use tempfile::tempdir;

fn config(text_file: &str, output_file: &str) -> Config {
    Config {
        text_file: text_file.to_string(),
        background_file: None,
        page_number: 0,
        output_file: output_file.to_string(),
        settings_path: None,
    }
}

#[test]
fn three_lines_no_background() {
    let dir = tempdir().expect("tempdir");
    let transcript = dir.path().join("transcript.txt");
    fs::write(&transcript, "Hello\n\nWorld\n").expect("write transcript");
    let output = dir.path().join("out.svg");

    run(config(
        transcript.to_str().unwrap(),
        output.to_str().unwrap(),
    ))
    .expect("run");

    let svg = fs::read_to_string(&output).expect("read output");
    assert_eq!(svg.matches("<g>").count(), 3);
    assert_eq!(svg.matches("<rect ").count(), 3);
    assert_eq!(svg.matches("<text ").count(), 3);
    assert!(svg.contains(">Hello</text>"));
    assert!(svg.contains(">World</text>"));
    // Second pair carries empty text content.
    assert!(svg.contains("text-anchor=\"start\"></text>"));
    assert!(!svg.contains("<image"));
}

#[test]
fn repeat_runs_are_byte_identical() {
    let dir = tempdir().expect("tempdir");
    let transcript = dir.path().join("transcript.txt");
    fs::write(&transcript, "line one\nline two\n").expect("write transcript");
    let first = dir.path().join("first.svg");
    let second = dir.path().join("second.svg");

    run(config(transcript.to_str().unwrap(), first.to_str().unwrap())).expect("first run");
    run(config(transcript.to_str().unwrap(), second.to_str().unwrap())).expect("second run");

    let first_bytes = fs::read(&first).expect("read first");
    let second_bytes = fs::read(&second).expect("read second");
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn raster_background_is_embedded_with_source_aspect_ratio() {
    let dir = tempdir().expect("tempdir");
    let transcript = dir.path().join("transcript.txt");
    fs::write(&transcript, "over the scan\n").expect("write transcript");

    let background = dir.path().join("scan.png");
    let img = image::RgbaImage::from_pixel(40, 20, image::Rgba([200, 180, 40, 255]));
    image::DynamicImage::ImageRgba8(img)
        .save(&background)
        .expect("write background png");

    let output = dir.path().join("out.svg");
    let mut cfg = config(transcript.to_str().unwrap(), output.to_str().unwrap());
    cfg.background_file = Some(background.to_str().unwrap().to_string());
    run(cfg).expect("run");

    let svg = fs::read_to_string(&output).expect("read output");
    assert_eq!(svg.matches("<image").count(), 1);

    let payload = svg
        .split("data:image/png;base64,")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("data uri payload");
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .expect("decode base64");
    let embedded = image::load_from_memory(&bytes).expect("decode embedded png");
    let embedded_ratio = embedded.width() as f64 / embedded.height() as f64;
    assert!((embedded_ratio - 2.0).abs() < 0.01);

    // The fit rectangle keeps the same ratio on the canvas.
    let fit_w: f64 = attr(&svg, "<image", "width").parse().expect("width attr");
    let fit_h: f64 = attr(&svg, "<image", "height").parse().expect("height attr");
    assert!((fit_w / fit_h - 2.0).abs() < 0.01);
}

fn attr(svg: &str, element: &str, name: &str) -> String {
    let start = svg.find(element).expect("element present");
    let rest = &svg[start..];
    let tag = &rest[..rest.find("/>").unwrap_or(rest.len())];
    let marker = format!("{}=\"", name);
    let value_start = tag.find(&marker).expect("attribute present") + marker.len();
    tag[value_start..]
        .split('"')
        .next()
        .expect("attribute value")
        .to_string()
}

#[test]
fn out_of_range_pdf_page_fails_without_output() {
    // The page-range check needs a pdf inspector on PATH.
    if !tool_available("mutool") && !tool_available("pdfinfo") {
        eprintln!("skipping: neither mutool nor pdfinfo is installed");
        return;
    }

    let dir = tempdir().expect("tempdir");
    let transcript = dir.path().join("transcript.txt");
    fs::write(&transcript, "one line\n").expect("write transcript");
    let background = dir.path().join("doc.pdf");
    fs::write(&background, minimal_two_page_pdf()).expect("write pdf");

    let output = dir.path().join("out.svg");
    let mut cfg = config(transcript.to_str().unwrap(), output.to_str().unwrap());
    cfg.background_file = Some(background.to_str().unwrap().to_string());
    cfg.page_number = 5;

    let err = run(cfg).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::PageIndex {
            requested,
            available,
            ..
        }) => {
            assert_eq!(*requested, 5);
            assert_eq!(*available, 2);
        }
        other => panic!("expected PageIndex, got {:?}", other),
    }
    assert!(!output.exists());
}

/// Smallest well-formed two-page PDF: catalog, page tree, two empty pages,
/// and an xref table with offsets computed while assembling.
fn minimal_two_page_pdf() -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>",
        "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>",
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>",
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>",
    ];
    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
    }
    let xref_start = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_start
    ));
    pdf.into_bytes()
}

fn tool_available(cmd: &str) -> bool {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|dir| dir.join(cmd).is_file()))
        .unwrap_or(false)
}

#[test]
fn missing_transcript_fails_without_output() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("out.svg");
    let err = run(config("no-such-file.txt", output.to_str().unwrap())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InputNotFound { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn garbage_background_fails_without_output() {
    let dir = tempdir().expect("tempdir");
    let transcript = dir.path().join("transcript.txt");
    fs::write(&transcript, "one line\n").expect("write transcript");
    let background = dir.path().join("notes.xyz");
    fs::write(&background, "definitely not an image").expect("write background");

    let output = dir.path().join("out.svg");
    let mut cfg = config(transcript.to_str().unwrap(), output.to_str().unwrap());
    cfg.background_file = Some(background.to_str().unwrap().to_string());
    let err = run(cfg).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::UnsupportedFormat { .. })
    ));
    assert!(!output.exists());
}
