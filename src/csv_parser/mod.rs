use crate::error::{Error, Result};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One CSV data row, keyed by the header columns in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    debug!("Reading csv file: {}", path.to_string_lossy());
    let file = File::open(path).map_err(csv::Error::from)?;
    parse_reader(file)
}

/// Reads every data row of a CSV source. The first row is the header.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if let Some(column) = header
        .iter()
        .enumerate()
        .find(|&(i, column)| header[..i].contains(column))
        .map(|(_, column)| column)
    {
        return Err(Error::DuplicateColumn(column.clone()));
    }
    let mut records: Vec<Record> = vec![];

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let number = index + 1;

        if row.len() > header.len() {
            return Err(Error::ExtraCells {
                row: number,
                expected: header.len(),
                found: row.len(),
            });
        }

        let fields = header
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), row.get(i).unwrap_or_default().to_string()));
        records.push(Record::new(fields));
    }

    debug!("Parsed {} rows with columns {:?}", records.len(), header);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_rows_into_records() {
        let result = parse_csv("src/csv_parser/test/people.csv");
        assert!(result.is_ok());

        let records = result.unwrap();
        assert_eq!(records.len(), 3);

        let first = records.first().unwrap();
        assert_eq!(first.get("id"), Some("1"));
        assert_eq!(first.get("name"), Some("Joe"));
        assert_eq!(
            first.get("address"),
            Some(r#"{"city": "Tokyo", "zip": "100-0001"}"#)
        );

        let last = records.last().unwrap();
        assert_eq!(last.get("age"), Some(""));
        assert_eq!(last.get("address"), Some(""));
    }

    #[test]
    fn it_keeps_header_order() {
        let records = parse_reader("b,a,c\n1,2,3\n".as_bytes()).unwrap();
        let columns: Vec<&str> = records[0].iter().map(|(k, _)| k).collect();
        assert_eq!(columns, vec!["b", "a", "c"]);
    }

    #[test]
    fn it_fills_missing_cells_with_empty_strings() {
        let records = parse_reader("id,name,age\n1,Joe\n".as_bytes()).unwrap();
        assert_eq!(records[0].get("age"), Some(""));
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn it_returns_err_if_a_row_has_extra_cells() {
        let result = parse_reader("id,name\n1,Joe\n2,Ann,extra\n".as_bytes());
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Row 2 has 3 cells but the header only has 2 columns"
        );
    }

    #[test]
    fn it_returns_err_if_a_column_is_duplicated() {
        let result = parse_reader("id,name,name\n1,Joe,Ann\n".as_bytes());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Column `name` appears more than once in the header"
        );
    }

    #[test]
    fn it_returns_no_records_for_header_only_file() {
        let records = parse_csv("src/csv_parser/test/header_only.csv").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn it_returns_err_if_the_file_does_not_exist() {
        let result = parse_csv("src/csv_parser/test/non-exist.csv");
        assert!(matches!(result, Err(Error::Csv(_))));
    }
}
