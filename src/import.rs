//! Batch import of delimited `id,name,ranking[,tags]` rows.
//!
//! The importer is a plain producer: it parses each line and calls
//! [`Directory::insert_tagged`] once per well-formed row. Rows that cannot be inserted are
//! collected in an [`ImportReport`] together with the reason, and each one is logged as a
//! `tracing` warning.
//!
//! ```
//! use student_directory::Directory;
//! use student_directory::import::{ImportOptions, RowError, import_str};
//!
//! let input = "\
//! 20231001,Alice,3.75
//! 20231002,Bob,not-a-number
//! 20231001,Alice again,3.10
//! 20231003,Charlie,3.75,chess;math
//! ";
//!
//! let mut directory = Directory::new();
//! let report = import_str(&mut directory, input, &ImportOptions::default());
//!
//! assert_eq!(report.inserted, 2);
//! assert_eq!(report.skipped.len(), 2);
//! assert!(matches!(report.skipped[0].error, RowError::MalformedRanking { .. }));
//! assert!(matches!(report.skipped[1].error, RowError::DuplicateId { .. }));
//! assert_eq!(directory.find_by_id("20231003").unwrap().tags().len(), 2);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::Directory;

/// Why a row was not inserted.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RowError {
    /// The row does not have the `id`, `name` and `ranking` fields, or the id is blank.
    #[error("malformed line: expected at least 3 fields with a non-empty id, found {fields} field(s)")]
    MalformedLine { fields: usize },

    /// The ranking field is not a finite number.
    #[error("malformed ranking: {value:?}")]
    MalformedRanking { value: String },

    /// A record with this id already exists.
    #[error("duplicate id: {id}")]
    DuplicateId { id: String },
}

/// A row that was skipped, with its 1-based line number in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based position of the row in the input, counting blank and header lines.
    pub line: usize,
    /// Why the row was skipped.
    pub error: RowError,
}

/// Per-import outcome counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Non-blank data lines seen (header excluded).
    pub lines: usize,
    /// Rows that became records.
    pub inserted: usize,
    /// Rows that did not, in input order.
    pub skipped: Vec<SkippedRow>,
}

/// How rows are split into fields.
///
/// # Examples
///
/// ```
/// use student_directory::import::ImportOptions;
///
/// let options = ImportOptions::new().with_delimiter(';').with_tag_separator('|').with_header(true);
/// assert_eq!(options.delimiter(), ';');
/// assert!(options.has_header());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ImportOptions {
    delimiter: char,
    tag_separator: char,
    has_header: bool,
}

impl ImportOptions {
    /// Comma-delimited fields, `;`-separated tags, no header line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            tag_separator: ';',
            has_header: false,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the separator used inside the optional fourth (tags) field.
    #[must_use]
    pub const fn with_tag_separator(mut self, separator: char) -> Self {
        self.tag_separator = separator;
        self
    }

    /// Sets whether the first line is a header to be skipped.
    #[must_use]
    pub const fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Returns the field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Returns the separator used inside the tags field.
    #[must_use]
    pub const fn tag_separator(&self) -> char {
        self.tag_separator
    }

    /// Returns true if the first line is skipped as a header.
    #[must_use]
    pub const fn has_header(&self) -> bool {
        self.has_header
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed, not yet inserted row.
#[derive(Debug, PartialEq)]
struct Row<'a> {
    id: &'a str,
    name: &'a str,
    ranking: f64,
    tags: SmallVec<[&'a str; 4]>,
}

fn parse_row<'a>(line: &'a str, options: &ImportOptions) -> Result<Row<'a>, RowError> {
    let fields: SmallVec<[&str; 4]> = line.splitn(4, options.delimiter).map(str::trim).collect();
    let [id, name, ranking, ref rest @ ..] = fields[..] else {
        return Err(RowError::MalformedLine { fields: fields.len() });
    };
    if id.is_empty() {
        return Err(RowError::MalformedLine { fields: fields.len() });
    }

    let ranking = ranking
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RowError::MalformedRanking {
            value: ranking.to_string(),
        })?;

    let separator = options.tag_separator;
    let tags = rest
        .first()
        .copied()
        .into_iter()
        .flat_map(move |field: &'a str| field.split(separator))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect();

    Ok(Row { id, name, ranking, tags })
}

/// Imports rows from `lines` into `directory`.
///
/// Blank lines are ignored and do not count towards [`ImportReport::lines`], but line numbers
/// in [`SkippedRow`] always refer to the position in `lines`.
pub fn import_lines<'a, I>(directory: &mut Directory, lines: I, options: &ImportOptions) -> ImportReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut report = ImportReport::default();
    let skip = usize::from(options.has_header);

    for (index, line) in lines.into_iter().enumerate().skip(skip) {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        report.lines += 1;

        let outcome = parse_row(line, options).and_then(|row| {
            if directory.insert_tagged(row.id, row.name, row.ranking, row.tags) {
                debug!(line = line_number, id = row.id, ranking = row.ranking, "imported row");
                Ok(())
            } else {
                Err(RowError::DuplicateId { id: row.id.to_string() })
            }
        });

        match outcome {
            Ok(()) => report.inserted += 1,
            Err(error) => {
                warn!(line = line_number, %error, "skipped row");
                report.skipped.push(SkippedRow {
                    line: line_number,
                    error,
                });
            }
        }
    }

    info!(
        lines = report.lines,
        inserted = report.inserted,
        skipped = report.skipped.len(),
        "import finished"
    );
    report
}

/// Imports every line of `input` into `directory`. See [`import_lines`].
pub fn import_str(directory: &mut Directory, input: &str, options: &ImportOptions) -> ImportReport {
    import_lines(directory, input.lines(), options)
}
