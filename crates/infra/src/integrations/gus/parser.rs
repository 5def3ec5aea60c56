//! Response unwrapping for the registry service
//!
//! Search responses stack three layers: an optional MTOM multipart
//! wrapper around the SOAP document, the result element inside it, and
//! the entity list as an XML document escaped into that element's text.

use ledgerflow_domain::{LedgerFlowError, RegistryEntity, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Cuts the SOAP document out of an MTOM multipart body.
///
/// Plain single-part responses pass through untouched. For multipart,
/// the SOAP part sits between the blank line after its `application/xop+xml`
/// part header and the next `--uuid:` boundary.
pub fn extract_soap_part(body: &str) -> &str {
    let Some(marker) = body.find("Content-Type: application/xop+xml") else {
        return body;
    };
    let after = &body[marker..];
    let content = match after.find("\r\n\r\n") {
        Some(idx) => &after[idx + 4..],
        None => match after.find("\n\n") {
            Some(idx) => &after[idx + 2..],
            None => return body,
        },
    };
    match content.find("\r\n--uuid:") {
        Some(end) => &content[..end],
        None => match content.find("\n--uuid:") {
            Some(end) => &content[..end],
            None => content,
        },
    }
}

/// Text content of the first `<tag>...</tag>` pair, ignoring namespace
/// prefixes on neither side. Self-closing and absent tags yield `None`.
pub fn extract_tag_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

/// Restores the escaped entity-list document to parseable XML.
///
/// Exactly one escape level comes off. Collapsed `&amp;` goes through a
/// placeholder so double-escaped entities (`&amp;amp;`, `&amp;lt;`)
/// come out still escaped once instead of fully bare.
pub fn decode_inner_xml(encoded: &str) -> String {
    encoded
        .trim_start_matches('\u{feff}')
        .replace("&amp;", "\u{0}")
        .replace("&#xD;", "\r")
        .replace("&#xA;", "\n")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace('\u{0}', "&")
        .trim()
        .to_string()
}

/// Parses the decoded `root`/`dane` document into registry entities.
///
/// Entries carrying an `ErrorCode` element are the service's in-band
/// "no results" answer and are dropped.
pub fn parse_entities(xml: &str) -> Result<Vec<RegistryEntity>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entities = Vec::new();
    let mut current: Option<RegistryEntity> = None;
    let mut error_entry = false;
    let mut field: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                if name == "dane" {
                    current = Some(RegistryEntity::default());
                    error_entry = false;
                } else if current.is_some() {
                    if name == "ErrorCode" {
                        error_entry = true;
                    }
                    field = Some(name);
                }
            }
            Ok(Event::Text(text)) => {
                if let (Some(entity), Some(name)) = (current.as_mut(), field.as_deref()) {
                    let value = match text.unescape() {
                        Ok(value) => value.into_owned(),
                        // Malformed bare ampersands appear in live data;
                        // keep the raw text rather than dropping the field
                        Err(_) => String::from_utf8_lossy(&text).into_owned(),
                    };
                    assign(entity, name, value);
                }
            }
            Ok(Event::End(end)) => {
                if end.local_name().as_ref() == b"dane" {
                    if let Some(entity) = current.take() {
                        if !error_entry {
                            entities.push(entity);
                        }
                    }
                } else {
                    field = None;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(LedgerFlowError::RegistryParse(format!(
                    "registry payload is not well-formed XML: {e}"
                )));
            }
        }
        buf.clear();
    }

    Ok(entities)
}

fn assign(entity: &mut RegistryEntity, field: &str, value: String) {
    match field {
        "Regon" => entity.regon = value,
        "Nip" => entity.tax_id = value,
        "Nazwa" => entity.name = value,
        "Wojewodztwo" => entity.province = value,
        "Powiat" => entity.district = value,
        "Gmina" => entity.commune = value,
        "Miejscowosc" => entity.city = value,
        "KodPocztowy" => entity.zip_code = value,
        "Ulica" => entity.street = value,
        "NrNieruchomosci" => entity.building_number = value,
        "NrLokalu" => entity.unit_number = value,
        "Typ" => entity.entity_type = value,
        "SilosID" => entity.silo_id = value,
        "MiejscowoscPoczty" => entity.post_city = value,
        "Krs" => entity.krs = Some(value).filter(|v| !v.is_empty()),
        _ => {}
    }
}
