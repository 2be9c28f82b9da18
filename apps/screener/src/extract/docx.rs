use std::io::{Cursor, Read};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

/// Concatenates the body paragraphs of a DOCX with `\n`, one line per top-level `w:p`.
/// Empty paragraphs are kept as empty lines; `w:tab` and `w:br` become `\t` and `\n`.
/// Paragraphs nested in another paragraph (text boxes) stay part of it, and
/// table content is skipped.
pub fn extract_docx_text(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(docx_err)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(docx_err)?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut paragraph_depth = 0usize;
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        let collecting = paragraph_depth > 0 && table_depth == 0;
        match reader.read_event().map_err(docx_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    if paragraph_depth == 0 {
                        current.clear();
                    }
                    paragraph_depth += 1;
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0 && table_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if paragraph_depth == 0 && table_depth == 0 => {
                    paragraphs.push(String::new())
                }
                b"w:tab" if collecting => current.push('\t'),
                b"w:br" | b"w:cr" if collecting => current.push('\n'),
                _ => {}
            },
            Event::Text(e) if collecting && in_text => {
                current.push_str(&e.xml_content().map_err(docx_err)?);
            }
            Event::GeneralRef(e) if collecting && in_text => {
                if let Some(ch) = e.resolve_char_ref().map_err(docx_err)? {
                    current.push(ch);
                } else {
                    let name = e.decode().map_err(docx_err)?;
                    if let Some(value) = resolve_predefined_entity(&name) {
                        current.push_str(value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

fn docx_err(e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Docx(e.to_string())
}
