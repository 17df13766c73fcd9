/// CSV ingestion
///
/// Reads the contacts spreadsheet export into [`ContactRow`]s. The first line
/// is the header; every following non-blank line becomes one row, in file
/// order. Columns are matched by header name, so their order in the file does
/// not matter. Unknown columns are ignored and absent ones read as `""`.
/// When a header name repeats, the last column of that name wins.
///
/// The file is read fresh on every call. Nothing is cached, so edits on disk
/// show up on the next request.
///
/// # Example
///
/// ```
/// use contactgate_shared::contacts::ingest::{ingest_reader, ParseMode};
///
/// let data = "Fonte,Nome Sito,Email,Telefono\nGoogle,Moka Bar,info@moka.it,0612345\n";
/// let rows = ingest_reader(data.as_bytes(), ParseMode::Strict).unwrap();
///
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].source, "Google");
/// assert_eq!(rows[0].site_name, "Moka Bar");
/// ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One line of the contacts file
///
/// Read from the Italian column headers of the export; serialized with the
/// field names below for templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRow {
    /// Where the contact was found (`Fonte`)
    pub source: String,

    /// Name of the website (`Nome Sito`)
    pub site_name: String,

    /// Contact email (`Email`)
    pub email: String,

    /// Contact phone number (`Telefono`)
    pub phone: String,
}

/// Header names of the known columns
const SOURCE_HEADER: &str = "Fonte";
const SITE_NAME_HEADER: &str = "Nome Sito";
const EMAIL_HEADER: &str = "Email";
const PHONE_HEADER: &str = "Telefono";

/// Position of each known column in the header
///
/// A name that appears more than once resolves to its last occurrence.
#[derive(Debug, Clone, Copy)]
struct Columns {
    source: Option<usize>,
    site_name: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == name)
                .map(|(index, _)| index)
                .last()
        };

        Self {
            source: find(SOURCE_HEADER),
            site_name: find(SITE_NAME_HEADER),
            email: find(EMAIL_HEADER),
            phone: find(PHONE_HEADER),
        }
    }

    fn row(&self, record: &csv::StringRecord) -> ContactRow {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        ContactRow {
            source: field(self.source),
            site_name: field(self.site_name),
            email: field(self.email),
            phone: field(self.phone),
        }
    }
}

/// How rows whose field count differs from the header are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Reject the file with [`IngestError::Parse`]
    #[default]
    Strict,

    /// Pad short rows with empty fields and drop surplus fields
    Lenient,
}

impl ParseMode {
    /// `Strict` when `strict` is true, `Lenient` otherwise
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}

/// Error type for CSV ingestion
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file is missing or could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be parsed into a row
    #[error("Malformed CSV at line {line}: {message}")]
    Parse { line: u64, message: String },
}

/// Reads every row of the CSV file at `path`
///
/// # Errors
///
/// `Io` if the file cannot be opened or read, `Parse` if a line is
/// malformed under `mode`.
pub fn ingest(path: impl AsRef<Path>, mode: ParseMode) -> Result<Vec<ContactRow>, IngestError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = read_rows(file, mode, path)?;
    debug!(path = %path.display(), rows = rows.len(), ?mode, "Ingested contacts file");

    Ok(rows)
}

/// Reads every row from an already-open CSV source
pub fn ingest_reader<R: Read>(reader: R, mode: ParseMode) -> Result<Vec<ContactRow>, IngestError> {
    read_rows(reader, mode, Path::new("<stream>"))
}

fn read_rows<R: Read>(reader: R, mode: ParseMode, path: &Path) -> Result<Vec<ContactRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(mode == ParseMode::Lenient)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| classify(e, path))?;
    let columns = Columns::locate(headers);

    // Strict readers reject a record of the wrong width here. Lenient ones
    // let it through; missing fields read as "" and extras are never looked at.
    csv_reader
        .records()
        .map(|record| {
            record
                .map(|record| columns.row(&record))
                .map_err(|e| classify(e, path))
        })
        .collect()
}

fn classify(err: csv::Error, path: &Path) -> IngestError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();

    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => IngestError::Parse { line, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Fonte,Nome Sito,Email,Telefono\n";

    fn parse(body: &str, mode: ParseMode) -> Result<Vec<ContactRow>, IngestError> {
        ingest_reader(format!("{}{}", HEADER, body).as_bytes(), mode)
    }

    #[test]
    fn test_rows_keep_file_order() {
        let rows = parse(
            "A,Sito Uno,a@x.com,111\nB,Sito Due,b@x.com,222\nA,Sito Tre,a2@x.com,333\n",
            ParseMode::Strict,
        )
        .unwrap();

        let emails: Vec<&str> = rows.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com", "a2@x.com"]);
        assert_eq!(rows[1].site_name, "Sito Due");
        assert_eq!(rows[2].phone, "333");
    }

    #[test]
    fn test_header_only_file_is_empty() {
        assert!(parse("", ParseMode::Strict).unwrap().is_empty());
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse("\"Pagine, Gialle\",\"Bar \"\"Moka\"\"\",m@x.com,\n", ParseMode::Strict).unwrap();

        assert_eq!(rows[0].source, "Pagine, Gialle");
        assert_eq!(rows[0].site_name, "Bar \"Moka\"");
        assert_eq!(rows[0].phone, "");
    }

    #[test]
    fn test_values_are_not_trimmed_or_normalized() {
        let rows = parse(" google ,x,y,z\nGoogle,x,y,z\n", ParseMode::Strict).unwrap();
        assert_eq!(rows[0].source, " google ");
        assert_eq!(rows[1].source, "Google");
    }

    #[test]
    fn test_columns_matched_by_name() {
        let data = "Email,Fonte,Extra\na@x.com,A,ignored\n";
        let rows = ingest_reader(data.as_bytes(), ParseMode::Strict).unwrap();

        assert_eq!(rows[0].source, "A");
        assert_eq!(rows[0].email, "a@x.com");
        assert_eq!(rows[0].site_name, "");
        assert_eq!(rows[0].phone, "");
    }

    #[test]
    fn test_repeated_header_keeps_last_column() {
        let data = "Fonte,Email,Email\nA,old@x.com,new@x.com\nB,,b@x.com\n";
        let rows = ingest_reader(data.as_bytes(), ParseMode::Strict).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].email, "new@x.com");
        assert_eq!(rows[1].source, "B");
        assert_eq!(rows[1].email, "b@x.com");
    }

    #[test]
    fn test_strict_rejects_short_row() {
        let err = parse("A,Sito,a@x.com,1\nB,Sito\n", ParseMode::Strict).unwrap_err();

        match err {
            IngestError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_pads_and_truncates() {
        let rows = parse("B,Sito\nC,Sito,c@x.com,3,surplus\n", ParseMode::Lenient).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source, "B");
        assert_eq!(rows[0].email, "");
        assert_eq!(rows[1].phone, "3");
    }

    #[test]
    fn test_bom_is_ignored() {
        let data = format!("\u{feff}{}A,S,a@x.com,1\n", HEADER);
        let rows = ingest_reader(data.as_bytes(), ParseMode::Strict).unwrap();
        assert_eq!(rows[0].source, "A");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        match ingest(&path, ParseMode::Strict) {
            Err(IngestError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_reads_from_disk_each_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}A,S,a@x.com,1\n", HEADER).unwrap();
        file.flush().unwrap();
        assert_eq!(ingest(file.path(), ParseMode::Strict).unwrap().len(), 1);

        write!(file, "B,S,b@x.com,2\n").unwrap();
        file.flush().unwrap();
        assert_eq!(ingest(file.path(), ParseMode::Strict).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_mode_from_strict() {
        assert_eq!(ParseMode::from_strict(true), ParseMode::Strict);
        assert_eq!(ParseMode::from_strict(false), ParseMode::Lenient);
        assert_eq!(ParseMode::default(), ParseMode::Strict);
    }
}
