//! Response validation for corpus documents.
//!
//! The remote XML is untrusted regardless of its documented shape. The full
//! document is parsed into an internal form first; attestations are only
//! extracted once the entire document has passed the structure, whitelist,
//! and numeric-range checks. There is no partial extraction: a document with
//! one bad record is rejected in full, because silently dropping records
//! would skew the frequency ranking for that location.

use crate::domain::{Attestation, LocationId};
use crate::error::ApiError;
use crate::validation::{is_allowed_char, MAX_TOWN_BYTES, MAX_WORD_BYTES};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Maximum accepted byte length of an example sentence.
pub const MAX_EXAMPLE_BYTES: usize = 500;

/// Validate one raw document and extract its attestations.
pub fn parse_attestations(
    location: &LocationId,
    xml: &str,
) -> Result<Vec<Attestation>, ApiError> {
    parse_and_validate(xml).map_err(|reason| ApiError::MalformedDocument {
        location: location.clone(),
        reason,
    })
}

#[derive(Debug, Default)]
struct RecordBuilder {
    lemma: Option<String>,
    frequenz: Option<String>,
    beleg: Option<String>,
    ort: Option<String>,
    konfidenz: Option<String>,
}

#[derive(Debug)]
struct RawRecord {
    lemma: String,
    frequenz: String,
    beleg: Option<String>,
    ort: String,
    konfidenz: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    ResultCount,
    Timestamp,
    Lemma,
    Frequenz,
    Beleg,
    Ort,
    Konfidenz,
}

impl Leaf {
    fn tag(self) -> &'static [u8] {
        match self {
            Leaf::ResultCount => b"result_count",
            Leaf::Timestamp => b"timestamp",
            Leaf::Lemma => b"lemma",
            Leaf::Frequenz => b"frequenz",
            Leaf::Beleg => b"beleg",
            Leaf::Ort => b"ort",
            Leaf::Konfidenz => b"konfidenz",
        }
    }
}

struct DocumentParser {
    saw_root: bool,
    in_info: bool,
    result_count: Option<String>,
    current: Option<RecordBuilder>,
    leaf: Option<Leaf>,
    buffer: String,
    records: Vec<RawRecord>,
}

fn parse_and_validate(xml: &str) -> Result<Vec<Attestation>, String> {
    let document = parse_document(xml)?;

    // Cardinality check: the advertised count must match the records found,
    // otherwise a truncated or padded document could pass unnoticed.
    if document.result_count != document.records.len() {
        return Err(format!(
            "result_count {} does not match {} artikel records",
            document.result_count,
            document.records.len()
        ));
    }

    document
        .records
        .into_iter()
        .map(validate_record)
        .collect()
}

struct ParsedDocument {
    result_count: usize,
    records: Vec<RawRecord>,
}

fn parse_document(xml: &str) -> Result<ParsedDocument, String> {
    let mut reader = Reader::from_str(xml);
    let mut state = DocumentParser {
        saw_root: false,
        in_info: false,
        result_count: None,
        current: None,
        leaf: None,
        buffer: String::new(),
        records: Vec::new(),
    };

    loop {
        match reader
            .read_event()
            .map_err(|e| format!("XML parse error: {e}"))?
        {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if state.leaf.is_some() {
                    return Err(format!(
                        "unexpected element <{}> inside a field",
                        String::from_utf8_lossy(&name)
                    ));
                }
                match name.as_slice() {
                    b"bdo" => {
                        if state.saw_root {
                            return Err("multiple document roots".to_string());
                        }
                        state.saw_root = true;
                    }
                    _ if !state.saw_root => {
                        return Err("expected <bdo> document root".to_string());
                    }
                    b"info" => {
                        if state.in_info || state.current.is_some() {
                            return Err("misplaced <info>".to_string());
                        }
                        state.in_info = true;
                    }
                    b"artikel" => {
                        if state.in_info || state.current.is_some() {
                            return Err("misplaced <artikel>".to_string());
                        }
                        state.current = Some(RecordBuilder::default());
                    }
                    b"result_count" if state.in_info => state.open_leaf(Leaf::ResultCount),
                    b"timestamp" if state.in_info => state.open_leaf(Leaf::Timestamp),
                    b"lemma" if state.current.is_some() => state.open_leaf(Leaf::Lemma),
                    b"frequenz" if state.current.is_some() => state.open_leaf(Leaf::Frequenz),
                    b"beleg" if state.current.is_some() => state.open_leaf(Leaf::Beleg),
                    b"ort" if state.current.is_some() => state.open_leaf(Leaf::Ort),
                    b"konfidenz" if state.current.is_some() => state.open_leaf(Leaf::Konfidenz),
                    _ => {
                        // Unknown element: skip its whole subtree.
                        let end = e.to_end().into_owned();
                        reader
                            .read_to_end(end.name())
                            .map_err(|err| format!("XML parse error: {err}"))?;
                    }
                }
            }
            Event::Empty(e) => {
                let name = e.name().as_ref().to_vec();
                if state.leaf.is_some() {
                    return Err(format!(
                        "unexpected element <{}> inside a field",
                        String::from_utf8_lossy(&name)
                    ));
                }
                match name.as_slice() {
                    b"result_count" if state.in_info => {
                        state.commit(Leaf::ResultCount, String::new())?
                    }
                    b"timestamp" if state.in_info => {}
                    b"lemma" if state.current.is_some() => {
                        state.commit(Leaf::Lemma, String::new())?
                    }
                    b"frequenz" if state.current.is_some() => {
                        state.commit(Leaf::Frequenz, String::new())?
                    }
                    b"beleg" if state.current.is_some() => {
                        state.commit(Leaf::Beleg, String::new())?
                    }
                    b"ort" if state.current.is_some() => state.commit(Leaf::Ort, String::new())?,
                    b"konfidenz" if state.current.is_some() => {
                        state.commit(Leaf::Konfidenz, String::new())?
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| format!("XML parse error: {e}"))?;
                if state.leaf.is_some() {
                    state.buffer.push_str(&text);
                } else if !text.trim().is_empty() {
                    return Err("unexpected text content outside a field".to_string());
                }
            }
            Event::CData(t) => {
                let bytes = t.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|_| "invalid UTF-8 in CDATA section".to_string())?;
                if state.leaf.is_some() {
                    state.buffer.push_str(text);
                } else if !text.trim().is_empty() {
                    return Err("unexpected text content outside a field".to_string());
                }
            }
            Event::End(e) => {
                let name = e.name().as_ref().to_vec();
                if let Some(leaf) = state.leaf {
                    if name.as_slice() == leaf.tag() {
                        let value = state.buffer.trim().to_string();
                        state.leaf = None;
                        state.commit(leaf, value)?;
                    } else {
                        return Err(format!(
                            "mismatched closing tag </{}>",
                            String::from_utf8_lossy(&name)
                        ));
                    }
                } else {
                    match name.as_slice() {
                        b"info" => state.in_info = false,
                        b"artikel" => {
                            let builder = state
                                .current
                                .take()
                                .ok_or_else(|| "stray </artikel>".to_string())?;
                            state.records.push(finish_record(builder)?);
                        }
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            // Prolog, comments and processing instructions carry no data.
            _ => {}
        }
    }

    if !state.saw_root {
        return Err("missing <bdo> document root".to_string());
    }
    if state.in_info || state.current.is_some() || state.leaf.is_some() {
        return Err("unexpected end of document".to_string());
    }
    let result_count = state
        .result_count
        .ok_or_else(|| "missing <result_count>".to_string())?
        .parse::<usize>()
        .map_err(|_| "invalid <result_count>".to_string())?;

    Ok(ParsedDocument {
        result_count,
        records: state.records,
    })
}

impl DocumentParser {
    fn open_leaf(&mut self, leaf: Leaf) {
        self.leaf = Some(leaf);
        self.buffer.clear();
    }

    fn commit(&mut self, leaf: Leaf, value: String) -> Result<(), String> {
        match leaf {
            Leaf::ResultCount => set_once(&mut self.result_count, "result_count", value),
            Leaf::Timestamp => Ok(()),
            other => {
                let record = self
                    .current
                    .as_mut()
                    .ok_or_else(|| "field outside <artikel>".to_string())?;
                match other {
                    Leaf::Lemma => set_once(&mut record.lemma, "lemma", value),
                    Leaf::Frequenz => set_once(&mut record.frequenz, "frequenz", value),
                    Leaf::Beleg => set_once(&mut record.beleg, "beleg", value),
                    Leaf::Ort => set_once(&mut record.ort, "ort", value),
                    Leaf::Konfidenz => set_once(&mut record.konfidenz, "konfidenz", value),
                    Leaf::ResultCount | Leaf::Timestamp => Ok(()),
                }
            }
        }
    }
}

fn set_once(slot: &mut Option<String>, name: &str, value: String) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("duplicate <{name}>"));
    }
    *slot = Some(value);
    Ok(())
}

fn finish_record(builder: RecordBuilder) -> Result<RawRecord, String> {
    Ok(RawRecord {
        lemma: builder
            .lemma
            .ok_or_else(|| "artikel missing <lemma>".to_string())?,
        frequenz: builder
            .frequenz
            .ok_or_else(|| "artikel missing <frequenz>".to_string())?,
        ort: builder
            .ort
            .ok_or_else(|| "artikel missing <ort>".to_string())?,
        beleg: builder.beleg,
        konfidenz: builder.konfidenz,
    })
}

fn validate_record(record: RawRecord) -> Result<Attestation, String> {
    check_name_field("lemma", &record.lemma, MAX_WORD_BYTES)?;
    check_name_field("ort", &record.ort, MAX_TOWN_BYTES)?;

    let frequency = record
        .frequenz
        .parse::<u64>()
        .map_err(|_| format!("invalid <frequenz>: {:?}", record.frequenz))?;

    let confidence = match record.konfidenz.as_deref() {
        None | Some("") => None,
        Some(raw) => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| format!("invalid <konfidenz>: {raw:?}"))?;
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("konfidenz out of range: {raw}"));
            }
            Some(value)
        }
    };

    let example_sentence = match record.beleg {
        None => None,
        Some(s) if s.is_empty() => None,
        Some(s) => {
            check_example(&s)?;
            Some(s)
        }
    };

    Ok(Attestation::new(
        record.lemma,
        frequency,
        example_sentence,
        record.ort,
        confidence,
    ))
}

/// Word-like record fields pass the same whitelist as caller input.
fn check_name_field(name: &str, value: &str, max_bytes: usize) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("empty <{name}>"));
    }
    if value.len() > max_bytes {
        return Err(format!("<{name}> exceeds {max_bytes} bytes"));
    }
    if let Some(found) = value.chars().find(|c| !is_allowed_char(*c)) {
        return Err(format!("forbidden character {found:?} in <{name}>"));
    }
    Ok(())
}

/// Example sentences are free text but must stay bounded and free of
/// control and markup characters.
fn check_example(value: &str) -> Result<(), String> {
    if value.len() > MAX_EXAMPLE_BYTES {
        return Err(format!("<beleg> exceeds {MAX_EXAMPLE_BYTES} bytes"));
    }
    if let Some(found) = value
        .chars()
        .find(|c| c.is_control() || matches!(c, '<' | '>' | '&'))
    {
        return Err(format!("forbidden character {found:?} in <beleg>"));
    }
    Ok(())
}
