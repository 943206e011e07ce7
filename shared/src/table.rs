use std::error;
use std::fmt;

use csv::ReaderBuilder;

#[derive(Debug)]
pub enum DatasetError {
    Csv(csv::Error),
    MissingColumn { column: String, row: usize },
    InvalidNumber { column: String, row: usize, value: String },
    InvalidRegion { row: usize, value: String },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Csv(e) => write!(f, "malformed table: {e}"),
            DatasetError::MissingColumn { column, row } => {
                write!(f, "row {row} has no column {column:?}")
            }
            DatasetError::InvalidNumber { column, row, value } => {
                write!(f, "row {row}: {column:?} is not a number: {value:?}")
            }
            DatasetError::InvalidRegion { row, value } => {
                write!(f, "row {row}: cannot read region from {value:?}")
            }
        }
    }
}

impl error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DatasetError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for DatasetError {
    fn from(value: csv::Error) -> Self {
        DatasetError::Csv(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub delimiter: u8,
    /// Remove `"` from header names and trim them. Values are never touched.
    pub strip_quotes: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            strip_quotes: true,
        }
    }
}

/// Header row plus data rows, every row padded or cut to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            headers: &self.headers,
            values,
        })
    }

    /// Position of a column. With duplicate headers the last one wins.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().rposition(|h| h == name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.headers.iter().rposition(|h| h == column)?;
        self.values.get(index).map(String::as_str)
    }
}

/// Parse delimited text. Quoting is not interpreted, so quoted cells keep their quotes.
pub fn read_table(text: &str, options: TableOptions) -> Result<Table, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(options.delimiter)
        .from_reader(text.trim_end().as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?
            .iter()
            .map(|header| {
                if options.strip_quotes {
                    header.replace('"', "").trim().to_string()
                } else {
                    header.to_string()
                }
            })
            .collect(),
        None => return Ok(Table::default()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let row: Vec<String> = (0..headers.len())
            .map(|i| record.get(i).unwrap_or_default().to_string())
            .collect();
        rows.push(row);
    }
    Ok(Table { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_lose_quotes_values_keep_them() {
        let table = read_table(
            "\"region\",\" Hovedalternativet (MMMM) 2024\"\n\"03 Oslo\",700000\n",
            TableOptions::default(),
        )
        .unwrap();
        assert_eq!(table.headers(), ["region", "Hovedalternativet (MMMM) 2024"]);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("region"), Some("\"03 Oslo\""));
        assert_eq!(row.get("Hovedalternativet (MMMM) 2024"), Some("700000"));
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_cut() {
        let table = read_table("a;b;c\n1\n1;2;3;4", TableOptions {
            delimiter: b';',
            strip_quotes: false,
        })
        .unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("b"), Some(""));
        assert_eq!(rows[0].get("c"), Some(""));
        assert_eq!(rows[1].get("c"), Some("3"));
        assert_eq!(rows[1].get("d"), None);
    }

    #[test]
    fn trailing_whitespace_adds_no_rows() {
        let table = read_table("a,b\n1,2\n\n  \n", TableOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_headers_resolve_to_last_column() {
        let table = read_table("a,a\n1,2", TableOptions::default()).unwrap();
        assert_eq!(table.column("a"), Some(1));
        assert_eq!(table.rows().next().unwrap().get("a"), Some("2"));
    }

    #[test]
    fn empty_text_is_an_empty_table() {
        let table = read_table("", TableOptions::default()).unwrap();
        assert!(table.headers().is_empty());
        assert!(table.is_empty());
    }
}
