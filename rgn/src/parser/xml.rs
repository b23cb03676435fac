//! Parser des éléments `<vg>` d'un document RGN
//!
//! Format attendu:
//!
//! ```xml
//! <rgn>
//!   <vg>
//!     <name>Monsanto</name>
//!     <latitude>38.7306</latitude>
//!     <longitude>-9.1887</longitude>
//!     <order>1</order>
//!     <altitude>226</altitude>
//!     <type>Pilar</type>
//!   </vg>
//! </rgn>
//! ```
//!
//! Seule la première occurrence de chaque champ est retenue.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::types::Record;
use crate::RgnError;

/// Champs connus d'un élément `<vg>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Latitude,
    Longitude,
    Order,
    Altitude,
    Type,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"name" => Some(Field::Name),
            b"latitude" => Some(Field::Latitude),
            b"longitude" => Some(Field::Longitude),
            b"order" => Some(Field::Order),
            b"altitude" => Some(Field::Altitude),
            b"type" => Some(Field::Type),
            _ => None,
        }
    }

    fn slot(self, record: &mut Record) -> &mut Option<String> {
        match self {
            Field::Name => &mut record.name,
            Field::Latitude => &mut record.latitude,
            Field::Longitude => &mut record.longitude,
            Field::Order => &mut record.order,
            Field::Altitude => &mut record.altitude,
            Field::Type => &mut record.survey_type,
        }
    }
}

/// Extrait les enregistrements bruts de tous les éléments `<vg>` du document
///
/// # Errors
///
/// `RgnError::Parse` si le document XML est mal formé.
pub fn parse_document(source: &str, xml: &str) -> Result<Vec<Record>, RgnError> {
    let mut reader = Reader::from_str(xml);

    let mut records = Vec::new();
    let mut current: Option<Record> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            RgnError::parse_error(
                source,
                format!("{} at position {}", e, reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(e) => {
                let name = e.name();
                if name.as_ref() == b"vg" {
                    current = Some(Record::default());
                    field = None;
                } else if current.is_some() {
                    field = Field::from_tag(name.as_ref());
                    text.clear();
                }
            }
            Event::Empty(e) => {
                // <vg/> vide: enregistré pour que l'erreur soit signalée
                if e.name().as_ref() == b"vg" {
                    records.push(Record::default());
                }
            }
            Event::Text(e) if field.is_some() => {
                let content = e
                    .xml_content()
                    .map_err(|err| RgnError::parse_error(source, err))?;
                text.push_str(&content);
            }
            Event::CData(e) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::GeneralRef(e) if field.is_some() => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| RgnError::parse_error(source, err))?
                {
                    text.push(ch);
                } else {
                    let entity = e
                        .decode()
                        .map_err(|err| RgnError::parse_error(source, err))?;
                    let resolved = resolve_predefined_entity(&entity).ok_or_else(|| {
                        RgnError::parse_error(source, format!("unknown entity &{};", entity))
                    })?;
                    text.push_str(resolved);
                }
            }
            Event::End(e) => {
                let name = e.name();
                if name.as_ref() == b"vg" {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                    field = None;
                } else if let (Some(f), Some(record)) = (field.take(), current.as_mut()) {
                    let slot = f.slot(record);
                    if slot.is_none() {
                        *slot = Some(text.trim().to_string());
                    }
                    text.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(RgnError::parse_error(source, "unclosed <vg> element"));
    }

    Ok(records)
}
