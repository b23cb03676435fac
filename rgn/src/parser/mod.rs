//! Lecture des fichiers RGN (XML)
//!
//! - `decode`: détection de l'encodage déclaré dans le prologue XML
//! - `xml`: extraction des éléments `<vg>` en enregistrements bruts

pub mod xml;

pub use xml::parse_document;

use std::borrow::Cow;

use encoding_rs::Encoding;
use memchr::memmem;
use tracing::warn;

use crate::RgnError;

/// Décode le contenu d'un fichier selon l'encodage de son prologue XML
/// (`<?xml version="1.0" encoding="ISO-8859-1"?>`). UTF-8 par défaut.
pub fn decode<'a>(source: &str, data: &'a [u8]) -> Result<Cow<'a, str>, RgnError> {
    let encoding = declared_encoding(data).unwrap_or(encoding_rs::UTF_8);

    if encoding == encoding_rs::UTF_8 {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        return simdutf8::basic::from_utf8(data)
            .map(Cow::Borrowed)
            .map_err(|_| RgnError::parse_error(source, "invalid UTF-8 content"));
    }

    let (decoded, _, had_errors) = encoding.decode(data);
    if had_errors {
        warn!(
            source,
            encoding = encoding.name(),
            "malformed sequences replaced while decoding"
        );
    }
    Ok(decoded)
}

/// Encodage déclaré dans le prologue, s'il est reconnu
fn declared_encoding(data: &[u8]) -> Option<&'static Encoding> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    if !data.starts_with(b"<?xml") {
        return None;
    }
    let prolog_end = memmem::find(data, b"?>")?;
    let prolog = &data[..prolog_end];

    let pos = memmem::find(prolog, b"encoding")?;
    let rest = &prolog[pos + "encoding".len()..];
    let eq = rest.iter().position(|&b| b == b'=')?;
    let rest = &rest[eq + 1..];
    let quote_start = rest.iter().position(|&b| b == b'"' || b == b'\'')?;
    let quote = rest[quote_start];
    let value = &rest[quote_start + 1..];
    let quote_end = value.iter().position(|&b| b == quote)?;

    Encoding::for_label(&value[..quote_end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_encoding_latin1() {
        let data = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rgn/>";
        // encoding_rs mappe ISO-8859-1 vers windows-1252 (WHATWG)
        assert_eq!(declared_encoding(data).unwrap().name(), "windows-1252");
    }

    #[test]
    fn test_declared_encoding_single_quotes() {
        let data = b"<?xml version='1.0' encoding='utf-8'?><rgn/>";
        assert_eq!(declared_encoding(data), Some(encoding_rs::UTF_8));
    }

    #[test]
    fn test_no_prolog_defaults_to_utf8() {
        assert!(declared_encoding(b"<rgn></rgn>").is_none());
        let decoded = decode("test", "<rgn><vg><name>Évora</name></vg></rgn>".as_bytes()).unwrap();
        assert!(decoded.contains("Évora"));
    }

    #[test]
    fn test_decode_latin1() {
        let mut data = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><name>".to_vec();
        data.extend_from_slice(&[b'S', 0xE3, b'o']); // "São" en Latin-1
        data.extend_from_slice(b"</name>");
        let decoded = decode("test", &data).unwrap();
        assert!(decoded.contains("São"));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let data = [b'<', b'a', b'>', 0xFF, b'<', b'/', b'a', b'>'];
        assert!(matches!(
            decode("broken.xml", &data),
            Err(RgnError::Parse { ref file, .. }) if file == "broken.xml"
        ));
    }

    #[test]
    fn test_decode_strips_bom() {
        let data = b"\xEF\xBB\xBF<rgn/>";
        assert_eq!(decode("test", data).unwrap(), "<rgn/>");
    }
}
