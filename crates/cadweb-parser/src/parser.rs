//! Delimited text parser with per-column type inference

use polars::prelude::*;
use std::io::Cursor;

use crate::error::ParseError;
use crate::format::CsvFormat;
use crate::types::Table;

/// Field values read as missing
const NA_VALUES: &[&str] = &["NA", "N/A", "NaN", "nan", "NULL", "null", "#N/A"];

/// Stateless parser for already-decoded delimited text
pub struct DelimitedParser;

impl DelimitedParser {
    /// Decode `bytes` with the format's encoding and parse them
    pub fn parse_bytes(bytes: &[u8], format: CsvFormat, trim: bool) -> Result<Table, ParseError> {
        let text = format.encoding.decode(bytes)?;
        Self::parse_str(&text, format.delimiter, trim)
    }

    /// Parse text whose first record is the header.
    ///
    /// Every column is read as text, then narrowed to integer or float when
    /// all of its values cast cleanly. A row with more fields than the header
    /// is an error.
    pub fn parse_str(text: &str, delimiter: u8, trim: bool) -> Result<Table, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let null_values: Vec<PlSmallStr> = NA_VALUES.iter().map(|v| (*v).into()).collect();
        let options = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|parse| {
                parse
                    .with_separator(delimiter)
                    .with_missing_is_null(true)
                    .with_null_values(Some(NullValues::AllColumns(null_values.clone())))
            });

        let frame = CsvReader::new(Cursor::new(text.as_bytes()))
            .with_options(options)
            .finish()?;

        let columns = frame
            .take_columns()
            .into_iter()
            .map(|column| narrow(clean(&column, trim)?).map(Column::from))
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Table::new(DataFrame::new(columns)?))
    }
}

/// Trim values and the header name; blank values become missing.
fn clean(column: &Column, trim: bool) -> PolarsResult<Series> {
    let name = if trim { column.name().trim() } else { column.name().as_str() };
    let values: StringChunked = column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| if trim { s.trim() } else { s }).filter(|s| !s.is_empty()))
        .collect();
    Ok(values.with_name(name.into()).into_series())
}

/// Leading zeros mark identifiers (registry codes, CNPJ) that must keep their digits.
fn has_leading_zero(value: &str) -> bool {
    let digits = value.trim_start_matches(['+', '-']);
    let mut chars = digits.chars();
    matches!((chars.next(), chars.next()), (Some('0'), Some(c)) if c.is_ascii_digit())
}

/// Integer if every value casts, else float if every value casts to a
/// finite number, else the text column unchanged.
fn narrow(text: Series) -> PolarsResult<Series> {
    if text.str()?.into_iter().flatten().any(has_leading_zero) {
        return Ok(text);
    }
    if let Ok(integers) = text.strict_cast(&DataType::Int64) {
        return Ok(integers);
    }
    if let Ok(floats) = text.strict_cast(&DataType::Float64) {
        if floats.f64()?.into_iter().flatten().all(f64::is_finite) {
            return Ok(floats);
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Encoding;
    use crate::types::Cell;

    #[test]
    fn test_parse_semicolon_registry() {
        let input = "Registro_ANS;CNPJ;Razao_Social;Modalidade;UF\n\
                     419761;19541931000125;18 DE JULHO ADMINISTRADORA;Administradora de Benefícios;MG\n\
                     421545;22869997000153;2B ODONTOLOGIA;Odontologia de Grupo;SP\n";
        let table = DelimitedParser::parse_str(input, b';', true).unwrap();
        assert_eq!(table.columns(), ["Registro_ANS", "CNPJ", "Razao_Social", "Modalidade", "UF"]);
        assert_eq!(table.len(), 2);

        assert_eq!(table.get(0, "Registro_ANS"), Some(Cell::Integer(419761)));
        assert_eq!(table.get(0, "CNPJ"), Some(Cell::Integer(19541931000125)));
        assert_eq!(table.get(0, "UF"), Some(Cell::Text("MG".into())));
    }

    #[test]
    fn test_quoted_fields_and_trim() {
        let input = "\"CNPJ\";\"Nome\"\n\"123\";\"ACME; LTDA\"\n";
        let table = DelimitedParser::parse_str(input, b';', true).unwrap();
        assert_eq!(table.columns(), ["CNPJ", "Nome"]);
        assert_eq!(table.get(0, "Nome"), Some(Cell::Text("ACME; LTDA".into())));

        let table = DelimitedParser::parse_str(" UF ; Nome\n SP ;  ACME \n", b';', true).unwrap();
        assert_eq!(table.columns(), ["UF", "Nome"]);
        assert_eq!(table.get(0, "Nome"), Some(Cell::Text("ACME".into())));

        let table = DelimitedParser::parse_str("UF\n SP \n", b';', false).unwrap();
        assert_eq!(table.get(0, "UF"), Some(Cell::Text(" SP ".into())));
    }

    #[test]
    fn test_long_rows_fail() {
        let err = DelimitedParser::parse_str("A;B\n1;2;3\n", b';', true).unwrap_err();
        assert!(matches!(err, ParseError::Frame(_)), "unexpected error: {:?}", err);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(DelimitedParser::parse_str("", b';', true), Err(ParseError::EmptyInput)));
        assert!(matches!(DelimitedParser::parse_str("\n\n", b';', true), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_header_only() {
        let table = DelimitedParser::parse_str("A;B\n", b';', true).unwrap();
        assert_eq!(table.len(), 0);
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_delimiter_only_rows_are_kept() {
        let table = DelimitedParser::parse_str("CNPJ;UF\n1;SP\n;\n2;RJ\n", b';', true).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1, "CNPJ"), Some(Cell::Missing));
        assert_eq!(table.get(1, "UF"), Some(Cell::Missing));
        assert_eq!(table.get(2, "UF"), Some(Cell::Text("RJ".into())));

        let table = DelimitedParser::parse_str("CNPJ;UF\n1;SP\n \t; \n", b';', true).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_type_inference() {
        let input = "int;float;text;ids;mixed;decimal_comma\n\
                     1;1.5;abc;00123;1;1.234,56\n\
                     -2;3;def;00456;x;10,00\n\
                     ;NA;;;;\n";
        let table = DelimitedParser::parse_str(input, b';', true).unwrap();
        assert_eq!(table.get(0, "int"), Some(Cell::Integer(1)));
        assert_eq!(table.get(0, "float"), Some(Cell::Float(1.5)));
        assert_eq!(table.get(0, "text"), Some(Cell::Text("abc".into())));
        assert_eq!(table.get(0, "ids"), Some(Cell::Text("00123".into())));
        assert_eq!(table.get(0, "mixed"), Some(Cell::Text("1".into())));
        assert_eq!(table.get(0, "decimal_comma"), Some(Cell::Text("1.234,56".into())));
        assert_eq!(table.get(1, "float"), Some(Cell::Float(3.0)));

        for column in table.columns() {
            assert_eq!(table.get(2, column), Some(Cell::Missing));
        }
    }

    #[test]
    fn test_zero_is_numeric() {
        let table = DelimitedParser::parse_str("v;w\n0;0.25\n10;0\n", b';', true).unwrap();
        assert_eq!(table.get(0, "v"), Some(Cell::Integer(0)));
        assert_eq!(table.get(0, "w"), Some(Cell::Float(0.25)));
    }

    #[test]
    fn test_overflowing_floats_stay_text() {
        let table = DelimitedParser::parse_str("v\n1.5\n1e999\n", b';', true).unwrap();
        assert_eq!(table.get(1, "v"), Some(Cell::Text("1e999".into())));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"v":"1.5"},{"v":"1e999"}]"#);
    }

    #[test]
    fn test_na_words_are_missing() {
        let table = DelimitedParser::parse_str("v\nSP\nNaN\nNULL\n", b';', true).unwrap();
        assert_eq!(table.get(0, "v"), Some(Cell::Text("SP".into())));
        assert_eq!(table.get(1, "v"), Some(Cell::Missing));
        assert_eq!(table.get(2, "v"), Some(Cell::Missing));
    }

    #[test]
    fn test_parse_bytes_latin1() {
        let bytes = b"Modalidade;UF\nCooperativa M\xe9dica;SP\n";
        let table = DelimitedParser::parse_bytes(bytes, CsvFormat::new(b';', Encoding::Latin1), true).unwrap();
        assert_eq!(table.get(0, "Modalidade"), Some(Cell::Text("Cooperativa Médica".into())));
    }
}
