//! Utilities for reading line-oriented resource files.

use std::io::{BufRead, BufReader, Read};

use csv_core::ReadFieldResult;

use crate::errors::{Result, VokabelError};

/// Parses a single CSV row, honoring double quotes.
///
/// # Errors
///
/// [`VokabelError`] is returned when a field is too large or not valid UTF-8.
pub fn parse_csv_row(row: &str) -> Result<Vec<String>> {
    let mut fields = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty => true,
            ReadFieldResult::Field { .. } => false,
            ReadFieldResult::End => true,
            ReadFieldResult::OutputFull => {
                return Err(VokabelError::invalid_format("csv", "Field too large"));
            }
        };
        fields.push(std::str::from_utf8(&output[..nout])?.to_string());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    Ok(fields)
}

/// A non-empty, non-comment line of a resource file.
pub struct ResourceLine {
    /// 1-based line number.
    pub number: usize,
    pub text: String,
}

/// Reads all lines that are neither blank nor `#` comments.
///
/// A UTF-8 byte order mark on the first line is dropped.
pub fn read_resource_lines<R>(rdr: R) -> Result<Vec<ResourceLine>>
where
    R: Read,
{
    let mut lines = vec![];
    for (i, line) in BufReader::new(rdr).lines().enumerate() {
        let line = line?;
        let line = if i == 0 {
            line.trim_start_matches('\u{feff}').to_string()
        } else {
            line
        };
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push(ResourceLine {
            number: i + 1,
            text: trimmed.to_string(),
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_row() {
        assert_eq!(
            &["Häuser", "NOUN", "Haus"],
            parse_csv_row("Häuser,NOUN,Haus").unwrap().as_slice()
        );
    }

    #[test]
    fn test_parse_csv_row_with_quote() {
        assert_eq!(
            &["Rock,Pop", "NOUN"],
            parse_csv_row("\"Rock,Pop\",NOUN").unwrap().as_slice()
        );
    }

    #[test]
    fn test_read_resource_lines_skips_comments() {
        let text = "\u{feff}# header\nHaus\n\n  \nBaum\r\n";
        let lines = read_resource_lines(text.as_bytes()).unwrap();
        assert_eq!(2, lines.len());
        assert_eq!("Haus", lines[0].text);
        assert_eq!(2, lines[0].number);
        assert_eq!("Baum", lines[1].text);
        assert_eq!(5, lines[1].number);
    }
}
