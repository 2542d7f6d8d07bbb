//! Time-indexed CSV ingestion for load and filling-level sources.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

/// Error raised while loading a source table.
#[derive(Debug)]
pub enum SeriesError {
    /// The source file is missing or cannot be read.
    SourceUnavailable {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying failure description.
        message: String,
    },
    /// A first-column cell could not be parsed as a date-time, so the file
    /// cannot serve as a time-indexed table.
    InvalidTimestamp {
        /// Path of the offending file.
        path: PathBuf,
        /// 1-based data row number (header excluded).
        row: usize,
        /// The cell text that failed to parse.
        value: String,
    },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { path, message } => {
                write!(f, "source unavailable: \"{}\" — {message}", path.display())
            }
            Self::InvalidTimestamp { path, row, value } => {
                write!(
                    f,
                    "invalid timestamp in \"{}\" at data row {row}: \"{value}\"",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SeriesError {}

/// An ordered time series with one or more named value columns.
///
/// The first CSV column is the timestamp row key; every other column is a
/// scenario/storage-type key holding signed power values. Cells that fail to
/// parse as numbers load as NaN and later resolve to zero in the gated
/// derived columns, they are not treated as errors.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    origin: PathBuf,
    timestamps: Vec<NaiveDateTime>,
    names: Vec<String>,
    /// Column-major values: `columns[c][r]` pairs with `timestamps[r]`.
    columns: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Loads a time series from a comma-delimited file.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::SourceUnavailable`] if the file cannot be
    /// opened or read, and [`SeriesError::InvalidTimestamp`] if a row key
    /// does not parse as a date-time.
    pub fn from_csv_path(path: &Path) -> Result<Self, SeriesError> {
        let file = File::open(path).map_err(|e| SeriesError::SourceUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_reader(file, path)
    }

    /// Parses a time series from any reader; `origin` labels errors and the
    /// scenario report.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TimeSeries::from_csv_path`].
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, SeriesError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| SeriesError::SourceUnavailable {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?
            .clone();
        let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut timestamps = Vec::new();
        let mut columns = vec![Vec::new(); names.len()];
        for (i, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| SeriesError::SourceUnavailable {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
            let key = record.get(0).unwrap_or("");
            let ts = parse_timestamp(key).ok_or_else(|| SeriesError::InvalidTimestamp {
                path: origin.to_path_buf(),
                row: i + 1,
                value: key.to_string(),
            })?;
            timestamps.push(ts);
            for (c, col) in columns.iter_mut().enumerate() {
                let cell = record.get(c + 1).unwrap_or("");
                col.push(cell.trim().parse::<f64>().unwrap_or(f64::NAN));
            }
        }

        Ok(Self {
            origin: origin.to_path_buf(),
            timestamps,
            names,
            columns,
        })
    }

    /// Path this series was loaded from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Row timestamps in file order.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Column names in file order (timestamp column excluded).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values of the named column, or `None` if the key is absent.
    pub fn column(&self, key: &str) -> Option<&[f64]> {
        let idx = self.names.iter().position(|n| n == key)?;
        Some(&self.columns[idx])
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the series holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Parses the timestamp formats the scenario exports use.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for fmt in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
