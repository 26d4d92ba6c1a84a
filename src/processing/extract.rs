//! Plain-text extraction for PPTX and PDF documents.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use zip::ZipArchive;

use super::types::ExtractionError;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const TEXT_ELEMENT: &[u8] = b"a:t";

/// Concatenate every text run of a PPTX presentation, each followed by a single space.
///
/// Slides are read in slide-number order.
pub fn extract_pptx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|number| (number, name.to_string())))
        .collect();
    slides.sort_unstable();
    tracing::debug!(slides = slides.len(), "Reading presentation slides");

    let mut text = String::new();
    for (_, part) in slides {
        let mut xml = String::new();
        archive
            .by_name(&part)?
            .read_to_string(&mut xml)
            .map_err(|source| ExtractionError::Part {
                part: part.clone(),
                source,
            })?;
        collect_text_runs(&xml, &mut text)
            .map_err(|source| ExtractionError::Xml { part, source })?;
    }
    Ok(text)
}

/// Extract the text layer of a PDF document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|err| ExtractionError::Pdf(err.to_string()))
}

fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn collect_text_runs(xml: &str, text: &mut String) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut run: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) if element.name().as_ref() == TEXT_ELEMENT => {
                run = Some(String::new());
            }
            Event::End(element) if element.name().as_ref() == TEXT_ELEMENT => {
                if let Some(content) = run.take() {
                    text.push_str(&content);
                    text.push(' ');
                }
            }
            Event::Empty(element) if element.name().as_ref() == TEXT_ELEMENT => text.push(' '),
            Event::Text(content) => {
                if let Some(current) = run.as_mut() {
                    current.push_str(&content.decode()?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(current) = run.as_mut() {
                    if let Some(ch) = reference.resolve_char_ref()? {
                        current.push(ch);
                    } else if let Some(value) = resolve_predefined_entity(&reference.decode()?) {
                        current.push_str(value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}
