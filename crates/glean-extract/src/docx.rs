//! Word-processor document extraction.
//!
//! Base text comes from the paragraph walk. Embedded images are found via
//! the container's relationship table, the compatibility-critical path:
//! different producers populate the relationship's declared type or its
//! target reference inconsistently, so a part counts as an image when
//! either field mentions "image". Inline-shape enumeration is a secondary
//! diagnostic pass only; the relationship scan is the sole authoritative
//! source of embedded-image text.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use docx_rs::{DocumentChild, DrawingData, ParagraphChild, RunChild};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{ExtractError, ExtractResult};
use crate::ocr::OcrExtractor;
use crate::types::{EmbeddedImage, Extraction, SourceFile};
use crate::Extractor;

const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";

/// DOCX extractor: paragraph text plus OCR over embedded images.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    ocr: OcrExtractor,
}

impl DocxExtractor {
    /// Create a DOCX extractor with a default OCR engine.
    pub fn new() -> Self {
        Self {
            ocr: OcrExtractor::new(),
        }
    }

    /// Use a custom OCR extractor for embedded images.
    pub fn with_ocr(mut self, ocr: OcrExtractor) -> Self {
        self.ocr = ocr;
        self
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    async fn extract(&self, file: &SourceFile) -> ExtractResult<Extraction> {
        let content = file.content.clone();
        let (base_text, parts) = tokio::task::spawn_blocking(move || {
            let docx = docx_rs::read_docx(&content)
                .map_err(|e| ExtractError::Docx(format!("failed to parse document: {e}")))?;

            let inline_pictures = inline_picture_count(&docx);
            if inline_pictures > 0 {
                debug!(count = inline_pictures, "document declares inline picture shapes");
            }

            let parts = scan_image_parts(&content)?;
            Ok::<_, ExtractError>((paragraph_text(&docx), parts))
        })
        .await??;

        // One bad embedded image must not abort the rest; the counter keeps
        // advancing so later images keep their position.
        let mut entries = Vec::new();
        let mut image_count = 0usize;
        for part in parts {
            image_count += 1;
            let Some(payload) = part.payload else {
                continue;
            };
            match self.ocr.extract_bytes(&payload).await {
                Ok(text) => entries.push(EmbeddedImage::from_ocr(image_count, text)),
                Err(err) => {
                    warn!(rel_target = %part.target, index = image_count, error = %err,
                        "skipping embedded image");
                }
            }
        }

        let text = combine(&base_text, &entries);
        Ok(Extraction::new(file.name.clone(), text).with_embedded_images(entries))
    }

    fn name(&self) -> &str {
        "docx"
    }
}

/// All paragraphs' text, one per line, in document order. Empty paragraphs
/// keep their line.
fn paragraph_text(docx: &docx_rs::Docx) -> String {
    let mut lines = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            lines.push(paragraph_line(paragraph));
        }
    }
    lines.join("\n")
}

fn paragraph_line(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        match child {
            ParagraphChild::Run(run) => append_run_text(run, &mut text),
            ParagraphChild::Hyperlink(link) => {
                for link_child in &link.children {
                    if let ParagraphChild::Run(run) = link_child {
                        append_run_text(run, &mut text);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn append_run_text(run: &docx_rs::Run, text: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

/// Diagnostic pass over inline drawing shapes. Produces no extracted text.
fn inline_picture_count(docx: &docx_rs::Docx) -> usize {
    let mut count = 0;
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for para_child in &paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let RunChild::Drawing(drawing) = run_child {
                            if matches!(drawing.data, Some(DrawingData::Pic(_))) {
                                count += 1;
                            }
                        }
                    }
                }
            }
        }
    }
    count
}

/// One relationship classified as an image, with its payload when the
/// target part could be read.
struct ImagePart {
    target: String,
    payload: Option<Vec<u8>>,
}

/// Walk the document part's relationship table and pull the payload of
/// every image relationship, in the table's own order. That order is
/// producer-defined; it is preserved, not canonicalized.
fn scan_image_parts(content: &[u8]) -> ExtractResult<Vec<ImagePart>> {
    let mut archive = ZipArchive::new(Cursor::new(content))
        .map_err(|e| ExtractError::Docx(format!("failed to open container: {e}")))?;

    let rels_xml = match read_archive_text(&mut archive, DOCUMENT_RELS) {
        Some(xml) => xml,
        None => {
            debug!("document has no relationship part");
            return Ok(Vec::new());
        }
    };

    let mut parts = Vec::new();
    for rel in parse_relationships(&rels_xml) {
        if !rel.is_image() {
            continue;
        }
        let payload = if rel.external {
            warn!(rel_target = %rel.target, "skipping external image relationship");
            None
        } else {
            let path = resolve_target(&rel.target);
            let payload = read_archive_bytes(&mut archive, &path);
            if payload.is_none() {
                warn!(rel_target = %rel.target, part = %path, "failed to read image part");
            }
            payload
        };
        parts.push(ImagePart {
            target: rel.target,
            payload,
        });
    }
    Ok(parts)
}

struct Relationship {
    rel_type: String,
    target: String,
    external: bool,
}

impl Relationship {
    /// Dual check: producers populate the declared type or the target
    /// reference inconsistently, so either field may carry the marker.
    fn is_image(&self) -> bool {
        self.rel_type.to_lowercase().contains("image")
            || self.target.to_lowercase().contains("image")
    }
}

fn parse_relationships(xml: &str) -> Vec<Relationship> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut relationships = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"Relationship" {
                    let mut rel_type = None;
                    let mut target = None;
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Type" => {
                                rel_type = std::str::from_utf8(&attr.value).ok().map(String::from);
                            }
                            b"Target" => {
                                target = std::str::from_utf8(&attr.value).ok().map(String::from);
                            }
                            b"TargetMode" => {
                                external = attr.value.as_ref() == b"External";
                            }
                            _ => {}
                        }
                    }

                    if let (Some(rel_type), Some(target)) = (rel_type, target) {
                        relationships.push(Relationship {
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    relationships
}

/// Resolve a relationship target to a package path. Targets are relative
/// to `word/`; a leading `/` marks a package-absolute target.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if let Some(parent_relative) = target.strip_prefix("../") {
        parent_relative.to_string()
    } else {
        format!("word/{target}")
    }
}

fn read_archive_text<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Option<String> {
    let mut file = archive.by_name(path).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).ok()?;
    Some(content)
}

fn read_archive_bytes<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Option<Vec<u8>> {
    let mut file = archive.by_name(path).ok()?;
    let mut content = Vec::new();
    file.read_to_end(&mut content).ok()?;
    Some(content)
}

/// Base text, then (when any embedded entries exist) a blank line and the
/// entries in recorded order.
fn combine(base: &str, entries: &[EmbeddedImage]) -> String {
    if entries.is_empty() {
        return base.to_string();
    }
    let rendered: Vec<String> = entries.iter().map(EmbeddedImage::render).collect();
    format!("{base}\n\n{}", rendered.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use zip::write::SimpleFileOptions;

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = docx_rs::Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*text)),
            );
        }
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).expect("pack test docx");
        buffer.into_inner()
    }

    fn build_container(rels_xml: &str, media: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let options = SimpleFileOptions::default();
            zip.start_file(DOCUMENT_RELS, options).unwrap();
            zip.write_all(rels_xml.as_bytes()).unwrap();
            for (path, bytes) in media {
                zip.start_file(*path, options).unwrap();
                zip.write_all(bytes).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer.into_inner()
    }

    const IMAGE_TYPE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    const STYLES_TYPE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

    #[tokio::test]
    async fn test_paragraphs_only_round_trip() {
        let bytes = build_docx(&["Intro", "Body"]);
        let file = SourceFile::from_bytes(Path::new("report.docx"), bytes);

        let extraction = DocxExtractor::new().extract(&file).await.unwrap();
        assert_eq!(extraction.text, "Intro\nBody");
        assert!(extraction.embedded_images.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_container_is_a_docx_error() {
        let file = SourceFile::from_bytes(
            Path::new("broken.docx"),
            vec![0x00, 0x01, 0x02, 0x03, 0xFF, 0xFE],
        );
        let result = DocxExtractor::new().extract(&file).await;
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }

    #[test]
    fn test_scan_matches_on_declared_type() {
        let rels = format!(
            r#"<?xml version="1.0"?><Relationships>
                <Relationship Id="rId1" Type="{IMAGE_TYPE}" Target="media/photo1.bin"/>
            </Relationships>"#
        );
        let container = build_container(&rels, &[("word/media/photo1.bin", b"payload")]);
        let parts = scan_image_parts(&container).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].payload.as_deref(), Some(b"payload".as_ref()));
    }

    #[test]
    fn test_scan_matches_on_target_reference() {
        // Some producers use a generic type but an image-named target.
        let rels = format!(
            r#"<?xml version="1.0"?><Relationships>
                <Relationship Id="rId1" Type="{STYLES_TYPE}" Target="media/image7.png"/>
            </Relationships>"#
        );
        let container = build_container(&rels, &[("word/media/image7.png", b"png-bytes")]);
        let parts = scan_image_parts(&container).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].target, "media/image7.png");
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        let rels = r#"<?xml version="1.0"?><Relationships>
            <Relationship Id="rId1" Type="http://example.com/IMAGE" Target="media/pic.bin"/>
        </Relationships>"#;
        let container = build_container(rels, &[("word/media/pic.bin", b"x")]);
        assert_eq!(scan_image_parts(&container).unwrap().len(), 1);
    }

    #[test]
    fn test_scan_ignores_non_image_relationships() {
        let rels = format!(
            r#"<?xml version="1.0"?><Relationships>
                <Relationship Id="rId1" Type="{STYLES_TYPE}" Target="styles.xml"/>
            </Relationships>"#
        );
        let container = build_container(&rels, &[]);
        assert!(scan_image_parts(&container).unwrap().is_empty());
    }

    #[test]
    fn test_scan_preserves_table_order() {
        let rels = format!(
            r#"<?xml version="1.0"?><Relationships>
                <Relationship Id="rId9" Type="{IMAGE_TYPE}" Target="media/b.bin"/>
                <Relationship Id="rId2" Type="{IMAGE_TYPE}" Target="media/a.bin"/>
            </Relationships>"#
        );
        let container = build_container(
            &rels,
            &[("word/media/a.bin", b"a".as_ref()), ("word/media/b.bin", b"b".as_ref())],
        );
        let parts = scan_image_parts(&container).unwrap();
        assert_eq!(parts[0].target, "media/b.bin");
        assert_eq!(parts[1].target, "media/a.bin");
    }

    #[test]
    fn test_scan_missing_part_keeps_the_slot() {
        let rels = format!(
            r#"<?xml version="1.0"?><Relationships>
                <Relationship Id="rId1" Type="{IMAGE_TYPE}" Target="media/gone.png"/>
            </Relationships>"#
        );
        let container = build_container(&rels, &[]);
        let parts = scan_image_parts(&container).unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].payload.is_none());
    }

    #[test]
    fn test_scan_skips_external_target_payload() {
        let rels = format!(
            r#"<?xml version="1.0"?><Relationships>
                <Relationship Id="rId1" Type="{IMAGE_TYPE}"
                    Target="https://example.com/image.png" TargetMode="External"/>
            </Relationships>"#
        );
        let container = build_container(&rels, &[]);
        let parts = scan_image_parts(&container).unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].payload.is_none());
    }

    #[test]
    fn test_scan_without_rels_part_finds_nothing() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            zip.start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<w:document/>").unwrap();
            zip.finish().unwrap();
        }
        assert!(scan_image_parts(&buffer.into_inner()).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_target_forms() {
        assert_eq!(resolve_target("media/image1.png"), "word/media/image1.png");
        assert_eq!(resolve_target("../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("/word/media/image1.png"), "word/media/image1.png");
    }

    #[test]
    fn test_combine_without_entries_is_base_text() {
        assert_eq!(combine("Intro\nBody", &[]), "Intro\nBody");
    }

    #[test]
    fn test_combine_renders_blank_image_entry() {
        let entries = vec![EmbeddedImage::from_ocr(1, String::new())];
        assert_eq!(
            combine("Intro\nBody", &entries),
            "Intro\nBody\n\nEmbedded Image 1 (no text detected):\n"
        );
    }

    #[test]
    fn test_combine_joins_entries_in_recorded_order() {
        let entries = vec![
            EmbeddedImage::from_ocr(1, "first\n".to_string()),
            EmbeddedImage::from_ocr(2, String::new()),
        ];
        assert_eq!(
            combine("Base", &entries),
            "Base\n\nEmbedded Image Text 1:\nfirst\n\n\nEmbedded Image 2 (no text detected):\n"
        );
    }
}
