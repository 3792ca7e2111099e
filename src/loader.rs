use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::sale::{Money, Sale, SaleRecord};

/// The columns every sales export has to provide
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "event_code",
    "add_datetime",
    "block_full_price",
    "num_seats",
    "acct_id",
    "acct_rep_full_name",
];

/// The text encodings tried when reading a sales export, in order
pub const DEFAULT_ENCODINGS: [Encoding; 4] = [
    Encoding::Utf8,
    Encoding::Latin1,
    Encoding::Iso8859_1,
    Encoding::Utf16,
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// A text encoding a sales export may be stored in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf8,
    Latin1,
    Iso8859_1,
    Utf16,
}

impl Encoding {
    /// Decodes raw file contents
    pub fn decode(self, bytes: &[u8]) -> Result<String, AttemptError> {
        match self {
            Encoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes)
                    .map(str::to_owned)
                    .map_err(|e| AttemptError::Decode(e.to_string()))
            }
            // every byte is a valid code point in both of them
            Encoding::Latin1 | Encoding::Iso8859_1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Utf16 => decode_utf16(bytes),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin1",
            Encoding::Iso8859_1 => "iso-8859-1",
            Encoding::Utf16 => "utf-16",
        })
    }
}

fn decode_utf16(bytes: &[u8]) -> Result<String, AttemptError> {
    let (big_endian, body) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };
    if body.len() % 2 != 0 {
        return Err(AttemptError::Decode("truncated utf-16 data".to_owned()));
    }

    let units = body
        .chunks_exact(2)
        .map(|pair| match big_endian {
            true => u16::from_be_bytes([pair[0], pair[1]]),
            false => u16::from_le_bytes([pair[0], pair[1]]),
        })
        .collect::<Vec<_>>();

    String::from_utf16(&units).map_err(|e| AttemptError::Decode(e.to_string()))
}

/// Possible reasons for a single encoding attempt to fail
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("decode error: {0}")]
    Decode(String),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Possible errors to occur while loading a sales export
///
/// All of them are unrecoverable for the session.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No candidate encodings were given")]
    NoEncodings,
    #[error("None of the candidate encodings could read the file: {}", summarize(.attempts))]
    Exhausted { attempts: Vec<(Encoding, AttemptError)> },
    #[error("Row {row}: malformed record (read as {encoding})")]
    Record {
        row: usize,
        encoding: Encoding,
        #[source]
        source: csv::Error,
    },
    #[error("Row {row}: cannot parse add_datetime {value:?} (read as {encoding})")]
    Timestamp {
        row: usize,
        value: String,
        encoding: Encoding,
    },
}

fn summarize(attempts: &[(Encoding, AttemptError)]) -> String {
    attempts
        .iter()
        .map(|(encoding, e)| format!("{encoding}: {e}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Possible errors to occur while writing the normalized export
#[derive(Debug, thiserror::Error)]
#[error("Failed to write the re-encoded export to {}", .path.display())]
pub struct ExportError {
    path: PathBuf,
    #[source]
    source: csv::Error,
}

/// The loaded sales export
///
/// The table is immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct SalesTable {
    sales: Vec<Sale>,
    encoding: Encoding,
}

impl SalesTable {
    pub fn new(sales: Vec<Sale>, encoding: Encoding) -> Self {
        Self { sales, encoding }
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// The encoding the file was read with
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

/// Reads sales exports, falling back through a list of text encodings
#[derive(Clone, Debug)]
pub struct Loader {
    encodings: Vec<Encoding>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODINGS.to_vec())
    }
}

impl Loader {
    /// Creates a loader trying the given encodings in order
    pub fn new(encodings: Vec<Encoding>) -> Self {
        Self { encodings }
    }

    pub fn encodings(&self) -> &[Encoding] {
        &self.encodings
    }

    /// Loads the sales export stored at `path`
    pub fn load(&self, path: impl AsRef<Path>) -> Result<SalesTable, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("read {} bytes from {}", bytes.len(), path.display());

        self.load_bytes(&bytes)
    }

    /// Loads a sales export from raw file contents
    ///
    /// The first encoding that decodes the bytes into a header with all
    /// required columns wins. Anything wrong past the header, a malformed
    /// record or timestamp, fails the whole load instead of moving on to the
    /// next encoding.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<SalesTable, LoadError> {
        let mut attempts = Vec::new();
        for &encoding in &self.encodings {
            match decode_export(encoding, bytes) {
                Ok(text) => return parse_sales(&text, encoding),
                Err(e) => {
                    log::warn!("reading the sales export as {} failed: {}", encoding, e);
                    attempts.push((encoding, e));
                }
            }
        }

        match attempts.is_empty() {
            true => Err(LoadError::NoEncodings),
            false => Err(LoadError::Exhausted { attempts }),
        }
    }
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Decodes the file and checks its header
fn decode_export(encoding: Encoding, bytes: &[u8]) -> Result<String, AttemptError> {
    let text = encoding.decode(bytes)?;

    let missing = {
        let mut reader = reader(&text);
        let headers = reader.headers()?;
        REQUIRED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|header| header == **column))
            .map(|column| column.to_string())
            .collect::<Vec<_>>()
    };
    if !missing.is_empty() {
        return Err(AttemptError::MissingColumns(missing));
    }

    Ok(text)
}

fn parse_sales(text: &str, encoding: Encoding) -> Result<SalesTable, LoadError> {
    let sales = reader(text)
        .deserialize::<SaleRecord>()
        .enumerate()
        .map(|(idx, record)| {
            let row = idx + 1;
            let record = record.map_err(|source| LoadError::Record { row, encoding, source })?;
            into_sale(record, row, encoding)
        })
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("parsed {} records as {}", sales.len(), encoding);

    Ok(SalesTable::new(sales, encoding))
}

fn into_sale(record: SaleRecord, row: usize, encoding: Encoding) -> Result<Sale, LoadError> {
    let added = parse_timestamp(&record.add_datetime).ok_or_else(|| LoadError::Timestamp {
        row,
        value: record.add_datetime.clone(),
        encoding,
    })?;
    if record.block_full_price.is_none() || record.num_seats.is_none() {
        log::warn!("row {}: blank price or seat count, counted as zero", row);
    }

    Ok(Sale {
        event_code: record.event_code,
        added,
        block_full_price: record.block_full_price.unwrap_or(Money::ZERO),
        num_seats: record.num_seats.unwrap_or_default(),
        account: record.acct_id,
        rep: record.acct_rep_full_name,
    })
}

/// Parses the textual timestamp of a sales row
///
/// Timestamps carrying an offset keep their wall clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Writes the table back to disk as utf-8
///
/// This is a one-off normalization of the source file and independent of
/// everything else the dashboard does with the table.
pub fn export_utf8(table: &SalesTable, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let error = |source| ExportError {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(error)?;
    for sale in table.sales() {
        writer.serialize(SaleRecord::from(sale)).map_err(error)?;
    }
    writer.flush().map_err(|e| error(e.into()))?;
    log::info!("exported {} rows as utf-8 to {}", table.len(), path.display());

    Ok(())
}
