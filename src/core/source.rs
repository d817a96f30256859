use crate::domain::model::RawRow;
use crate::utils::error::{EtlError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Lazily yields the data rows of a delimited file after discarding its header.
pub struct CsvRowSource<R: Read = File> {
    records: csv::StringRecordsIntoIter<R>,
    header: RawRow,
}

impl CsvRowSource<File> {
    pub fn open<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|source| EtlError::InputOpenError {
                path: path.display().to_string(),
                source,
            })?;

        let source = Self::with_header(reader, &path.display().to_string())?;
        tracing::info!("Input file opened: {}", path.display());
        Ok(source)
    }
}

impl<R: Read> CsvRowSource<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);
        Self::with_header(reader, "<reader>")
    }

    fn with_header(reader: csv::Reader<R>, path: &str) -> Result<Self> {
        let mut records = reader.into_records();
        let header = match records.next() {
            Some(Ok(record)) => record.iter().map(str::to_string).collect(),
            Some(Err(e)) => {
                tracing::error!("Error reading csv headers: {}", e);
                return Err(EtlError::MissingHeaderError {
                    path: path.to_string(),
                });
            }
            None => {
                return Err(EtlError::MissingHeaderError {
                    path: path.to_string(),
                })
            }
        };

        Ok(Self { records, header })
    }

    /// The discarded header row. Not checked against the mapping.
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl<R: Read> Iterator for CsvRowSource<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(EtlError::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_header_is_discarded() {
        let data = "pickup,dropoff,block\n2021-01-01T08:00:00,2021-01-01T08:20:00,100\n";
        let mut source = CsvRowSource::from_reader(data.as_bytes(), b',').unwrap();

        assert_eq!(source.header(), ["pickup", "dropoff", "block"]);
        let row = source.next().unwrap().unwrap();
        assert_eq!(row, vec!["2021-01-01T08:00:00", "2021-01-01T08:20:00", "100"]);
        assert!(source.next().is_none());
    }

    #[test]
    fn test_rows_of_varying_width() {
        let data = "a,b,c\n1,2,3\n1\n1,2,3,4,5\n";
        let widths: Vec<usize> = CsvRowSource::from_reader(data.as_bytes(), b',')
            .unwrap()
            .map(|row| row.unwrap().len())
            .collect();
        assert_eq!(widths, vec![3, 1, 5]);
    }

    #[test]
    fn test_quoted_fields_and_tab_delimiter() {
        let data = "a\tb\n\"hello\tworld\"\t2\n";
        let rows: Vec<RawRow> = CsvRowSource::from_reader(data.as_bytes(), b'\t')
            .unwrap()
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(rows, vec![vec!["hello\tworld".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let err = CsvRowSource::from_reader("".as_bytes(), b',').err().unwrap();
        assert!(matches!(err, EtlError::MissingHeaderError { .. }));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let mut source = CsvRowSource::from_reader("a,b\n".as_bytes(), b',').unwrap();
        assert!(source.next().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let err = CsvRowSource::open("/no/such/trips.csv", b',').err().unwrap();
        assert!(matches!(err, EtlError::InputOpenError { .. }));
    }

    #[test]
    fn test_open_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"h1,h2\nx,y\n").unwrap();

        let rows: Vec<RawRow> = CsvRowSource::open(file.path(), b',')
            .unwrap()
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(rows, vec![vec!["x".to_string(), "y".to_string()]]);
    }

    #[test]
    fn test_invalid_utf8_row_is_an_error() {
        let data: &[u8] = b"a,b\n\xff\xfe,1\n";
        let mut source = CsvRowSource::from_reader(data, b',').unwrap();
        assert!(matches!(source.next(), Some(Err(EtlError::CsvError(_)))));
    }
}
