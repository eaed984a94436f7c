use crate::error::RecordError;

/// One parsed input line. The key borrows from the line it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'s> {
    pub key: &'s str,
    pub value: f64,
}

/// Splits `key;value` on the first `;` after trimming the line.
///
/// Any further `;` stays in the value text and makes the number invalid.
pub fn parse_record(line: &str) -> Result<Record<'_>, RecordError> {
    let line = line.trim();
    let (key, value) = line.split_once(';').ok_or(RecordError::MissingSeparator)?;
    if key.is_empty() {
        return Err(RecordError::EmptyKey);
    }
    let value = value.trim();
    if value.is_empty() {
        return Err(RecordError::InvalidValue);
    }
    let value = fast_float::parse::<f64, _>(value).map_err(|_| RecordError::InvalidValue)?;
    Ok(Record { key, value })
}

/// Same as [`parse_record`] for raw bytes taken straight from a mapped file.
#[inline]
pub fn parse_record_bytes(line: &[u8]) -> Result<Record<'_>, RecordError> {
    let line = std::str::from_utf8(line).map_err(|_| RecordError::InvalidUtf8)?;
    parse_record(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_line() {
        let record = parse_record("Hamburg;12.0").unwrap();
        assert_eq!(record.key, "Hamburg");
        assert_eq!(record.value, 12.0);
    }

    #[test]
    fn strips_surrounding_whitespace_and_newline() {
        let record = parse_record("  Bulawayo;-8.9\r\n").unwrap();
        assert_eq!(record.key, "Bulawayo");
        assert_eq!(record.value, -8.9);
    }

    #[test]
    fn key_may_contain_spaces_and_unicode() {
        let record = parse_record("São Paulo;25.3").unwrap();
        assert_eq!(record.key, "São Paulo");
        assert_eq!(record.value, 25.3);
    }

    #[test]
    fn rejects_line_without_separator() {
        assert_eq!(parse_record("BadLine"), Err(RecordError::MissingSeparator));
        assert_eq!(parse_record(""), Err(RecordError::MissingSeparator));
    }

    #[test]
    fn rejects_non_numeric_value() {
        assert_eq!(parse_record("City;notanumber"), Err(RecordError::InvalidValue));
        assert_eq!(parse_record("City;"), Err(RecordError::InvalidValue));
        assert_eq!(parse_record("City;12.0abc"), Err(RecordError::InvalidValue));
    }

    #[test]
    fn only_first_separator_splits() {
        assert_eq!(parse_record("City;1.0;2.0"), Err(RecordError::InvalidValue));
    }

    #[test]
    fn rejects_empty_key() {
        assert_eq!(parse_record(";1.0"), Err(RecordError::EmptyKey));
    }

    #[test]
    fn bytes_must_be_utf8() {
        assert_eq!(parse_record_bytes(b"\xff\xfe;1.0"), Err(RecordError::InvalidUtf8));
        assert_eq!(parse_record_bytes(b"Oslo;-3.5").unwrap().value, -3.5);
    }
}
