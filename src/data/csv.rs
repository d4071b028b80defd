// CSV data source for uploaded tabular files
// Author: Gabriel Demetrios Lafis

use super::{DataError, DataSet, DataSource, Field, Row, Schema, SchemaInferrer};

/// File extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Lowercased extension of a filename, if it has one
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Check whether a filename carries an allowed extension
pub fn is_allowed_file(filename: &str) -> bool {
    file_extension(filename).map_or(false, |ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Pick a delimiter for non-CSV text by first match: tab, then semicolon, then comma
pub fn sniff_delimiter(content: &str) -> u8 {
    if content.contains('\t') {
        b'\t'
    } else if content.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Parse an uploaded file into a dataset
pub fn parse(raw: &[u8], filename: &str) -> Result<DataSet, DataError> {
    CsvSource::from_upload(raw, filename)?.read()
}

/// CSV data source backed by uploaded bytes
pub struct CsvSource<'a> {
    name: String,
    content: &'a str,
    delimiter: u8,
}

impl<'a> CsvSource<'a> {
    /// Create a CSV source with an explicit delimiter
    pub fn new(name: &str, content: &'a str, delimiter: u8) -> Self {
        CsvSource {
            name: name.to_string(),
            content,
            delimiter,
        }
    }

    /// Create a source for an upload, validating the extension and choosing the delimiter
    pub fn from_upload(raw: &'a [u8], filename: &str) -> Result<Self, DataError> {
        if !is_allowed_file(filename) {
            return Err(DataError::UnsupportedFile(filename.to_string()));
        }

        let content = std::str::from_utf8(raw)
            .map_err(|e| DataError::ParseError(format!("File is not valid UTF-8: {}", e)))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let delimiter = match file_extension(filename).as_deref() {
            Some("csv") => b',',
            _ => sniff_delimiter(content),
        };

        Ok(Self::new(filename, content, delimiter))
    }

    /// Delimiter this source splits fields on
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

impl DataSource for CsvSource<'_> {
    fn read(&self) -> Result<DataSet, DataError> {
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(self.content.as_bytes());

        let raw_headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| DataError::ParseError(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        if raw_headers.is_empty() || (raw_headers.len() == 1 && raw_headers[0].is_empty()) {
            return Err(DataError::ParseError("No columns to parse from file".to_string()));
        }

        let headers = SchemaInferrer::normalize_headers(&raw_headers);
        let width = headers.len();

        // Raw cells are buffered per row so types can be inferred before conversion
        let mut records: Vec<Vec<String>> = Vec::new();
        for (line, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| DataError::ParseError(e.to_string()))?;

            if record.len() > width {
                return Err(DataError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line + 2,
                    record.len()
                )));
            }

            let mut cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            cells.resize(width, String::new());
            records.push(cells);
        }

        let fields: Vec<Field> = headers
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let data_type =
                    SchemaInferrer::infer_type(records.iter().map(|cells| cells[i].as_str()));
                let nullable = records.iter().any(|cells| SchemaInferrer::is_na(&cells[i]));
                Field::new(name, data_type, nullable)
            })
            .collect();

        let mut dataset = DataSet::new(Schema::new(fields));

        for cells in &records {
            let values = cells
                .iter()
                .zip(&dataset.schema.fields)
                .map(|(raw, field)| SchemaInferrer::convert(raw, field.data_type))
                .collect();

            dataset.add_row(Row::new(values))?;
        }

        dataset.metadata.add("source".to_string(), "csv".to_string());
        dataset.metadata.add("filename".to_string(), self.name.clone());
        dataset
            .metadata
            .add("delimiter".to_string(), (self.delimiter as char).to_string());

        Ok(dataset)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
