//! Content Extraction
//!
//! Converts supported documents into plain text for prompting: per-page PDF
//! text, text runs from PPTX slide XML, and lossy-UTF-8 reads for plain
//! text. Images are not handled here; they go straight to the vision model
//! (see `service`).

use std::fs;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{AppError, Result};

/// Extract text from a PDF, pages joined by a blank line.
pub fn extract_pdf(path: &Path) -> Result<String> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| AppError::Storage(format!("Failed to extract text from PDF: {e}")))?;

    let parts: Vec<String> = pages
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    Ok(parts.join("\n\n"))
}

/// Extract text from a PPTX: every text run across every slide, slides in
/// slide-number order, joined by blank lines. Legacy binary `.ppt` files are
/// not zip archives and fail here.
pub fn extract_slides(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .map_err(|e| AppError::Storage(format!("Failed to open presentation: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::Storage(format!("Failed to read presentation archive: {e}")))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort();

    let mut sections = Vec::new();
    for (_, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| AppError::Storage(format!("Failed to read slide {name}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| AppError::Storage(format!("Failed to read slide {name}: {e}")))?;

        let runs = slide_text_runs(&xml)?;
        if !runs.is_empty() {
            sections.push(runs.join("\n"));
        }
    }
    Ok(sections.join("\n\n"))
}

/// Read a text/markdown file, dropping undecodable bytes.
pub fn extract_text_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::Storage(format!("Failed to read text file: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Pull the `<a:t>` text runs out of slide XML.
fn slide_text_runs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut runs = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_text_run = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"a:t" => in_text_run = false,
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| AppError::Storage(format!("Malformed slide XML: {e}")))?;
                if !text.trim().is_empty() {
                    runs.push(text.trim().to_string());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(AppError::Storage(format!("Malformed slide XML: {e}")));
            }
        }
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SLIDE_XML: &str = r#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp><p:txBody><a:p><a:r><a:t>{TITLE}</a:t></a:r></a:p></p:txBody></p:sp>
    <p:sp><p:txBody><a:p><a:r><a:t>{BODY}</a:t></a:r></a:p></p:txBody></p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    fn write_pptx(slides: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".pptx")
            .tempfile()
            .expect("temp pptx");
        let mut writer = zip::ZipWriter::new(file.reopen().expect("reopen"));
        for (i, (title, body)) in slides.iter().enumerate() {
            writer
                .start_file(
                    format!("ppt/slides/slide{}.xml", i + 1),
                    SimpleFileOptions::default(),
                )
                .expect("start slide entry");
            let xml = SLIDE_XML.replace("{TITLE}", title).replace("{BODY}", body);
            writer.write_all(xml.as_bytes()).expect("write slide");
        }
        writer.finish().expect("finish zip");
        file
    }

    #[test]
    fn test_slides_extraction_in_order() {
        let file = write_pptx(&[
            ("Mitochondria", "The powerhouse of the cell"),
            ("Ribosomes", "Protein factories"),
        ]);

        let text = extract_slides(file.path()).expect("extraction succeeds");
        assert_eq!(
            text,
            "Mitochondria\nThe powerhouse of the cell\n\nRibosomes\nProtein factories"
        );
    }

    #[test]
    fn test_slides_with_escaped_entities() {
        let file = write_pptx(&[("A &amp; B", "x &lt; y")]);
        let text = extract_slides(file.path()).expect("extraction succeeds");
        assert_eq!(text, "A & B\nx < y");
    }

    #[test]
    fn test_legacy_ppt_fails_with_storage_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".ppt")
            .tempfile()
            .expect("temp ppt");
        // OLE2 magic, not a zip archive
        file.write_all(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
            .expect("write header");

        let err = extract_slides(file.path()).expect_err("should fail");
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn test_text_file_lossy_utf8() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"photosynthesis \xFF\xFE converts light")
            .expect("write bytes");

        let text = extract_text_file(file.path()).expect("read succeeds");
        assert!(text.starts_with("photosynthesis "));
        assert!(text.ends_with(" converts light"));
        assert!(text.contains('\u{FFFD}'));
    }

    /// Hand-assembled minimal PDF: one Helvetica `Tj` per page, xref offsets
    /// computed from the serialized bodies.
    fn write_pdf(pages: &[&str]) -> tempfile::NamedTempFile {
        let font_id = 3 + pages.len() * 2;
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 3 + i * 2))
            .collect();

        let mut objects: Vec<String> = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                4 + i * 2
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }
        let xref_at = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF",
            objects.len() + 1
        ));

        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("temp pdf");
        file.write_all(pdf.as_bytes()).expect("write pdf");
        file
    }

    #[test]
    fn test_pdf_pages_joined_by_blank_line() {
        let file = write_pdf(&["Cell structure", "The nucleus stores DNA"]);

        let text = extract_pdf(file.path()).expect("extraction succeeds");
        assert_eq!(text, "Cell structure\n\nThe nucleus stores DNA");
    }

    #[test]
    fn test_pdf_blank_pages_dropped() {
        let file = write_pdf(&["Mitosis", "", "Meiosis"]);

        let text = extract_pdf(file.path()).expect("extraction succeeds");
        assert_eq!(text, "Mitosis\n\nMeiosis");
    }

    #[test]
    fn test_missing_pdf_is_storage_error() {
        let err = extract_pdf(Path::new("/nonexistent/deck.pdf")).expect_err("should fail");
        assert!(matches!(err, AppError::Storage(_)));
    }
}
