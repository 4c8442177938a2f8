use crate::{Error, Result};
use quick_xml::{Reader, events::Event};
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const TEXT_BOX: &[u8] = b"w:txbxContent";

/// Returns the body paragraphs of a Word document, one per line.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(Error::extraction)?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(Error::extraction)?
        .read_to_string(&mut xml)
        .map_err(Error::extraction)?;

    Ok(body_paragraphs(&xml)?.join("\n"))
}

/// Collects the text of every top-level paragraph. Paragraphs nested in tables are not part
/// of the body flow and are left out. Text box content is skipped entirely so the paragraph
/// anchoring the box keeps its own runs.
fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut table_depth = 0usize;
    let mut text_box_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(Error::extraction)?;
        if text_box_depth > 0 {
            match event {
                Event::Start(e) if e.name().as_ref() == TEXT_BOX => text_box_depth += 1,
                Event::End(e) if e.name().as_ref() == TEXT_BOX => text_box_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.name().as_ref() {
                TEXT_BOX => text_box_depth = 1,
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => current = Some(String::new()),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if table_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if in_run => push_char(&mut current, '\t'),
                b"w:br" | b"w:cr" if in_run => push_char(&mut current, '\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&t.unescape().map_err(Error::extraction)?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" if table_depth == 0 => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push(c);
    }
}
