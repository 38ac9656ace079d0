//! CSV Data Loader Module
//! Loads the passenger CSV using Polars, with a single fallback to the
//! reference dataset when the primary file does not exist.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Public copy of the reference dataset (seaborn's `titanic`).
pub const REFERENCE_DATASET_URL: &str =
    "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/titanic.csv";

/// Directory downloaded datasets are cached in between runs.
pub const CACHE_DIR: &str = "data";

/// Applied after lower-casing; names not listed are kept as-is.
const COLUMN_RENAMES: [(&str, &str); 12] = [
    ("passengerid", "passenger_id"),
    ("survived", "survived"),
    ("pclass", "pclass"),
    ("name", "name"),
    ("sex", "sex"),
    ("age", "age"),
    ("sibsp", "sibsp"),
    ("parch", "parch"),
    ("ticket", "ticket"),
    ("fare", "fare"),
    ("cabin", "cabin"),
    ("embarked", "embarked"),
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to download reference dataset from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Secondary source used when the primary CSV is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackSource {
    /// A local copy of the reference dataset.
    Path { path: PathBuf },
    /// Downloaded once, then read from `cache_path`.
    Url { url: String, cache_path: PathBuf },
}

impl Default for FallbackSource {
    fn default() -> Self {
        FallbackSource::from_url(REFERENCE_DATASET_URL)
    }
}

impl FallbackSource {
    /// A URL source cached at [`cache_path_for`].
    pub fn from_url(url: &str) -> Self {
        FallbackSource::Url {
            url: url.to_string(),
            cache_path: cache_path_for(url),
        }
    }

    /// Interpret a CLI argument: anything starting with `http(s)://` is a URL.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            FallbackSource::from_url(value)
        } else {
            FallbackSource::Path {
                path: PathBuf::from(value),
            }
        }
    }
}

impl fmt::Display for FallbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackSource::Path { path } => write!(f, "{}", path.display()),
            FallbackSource::Url { url, .. } => write!(f, "{}", url),
        }
    }
}

/// Which source the frame came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Primary(PathBuf),
    Fallback(String),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Primary(path) => write!(f, "{}", path.display()),
            DataSource::Fallback(source) => write!(f, "{} (fallback)", source),
        }
    }
}

/// A loaded frame with normalized column names.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: DataSource,
    pub frame: DataFrame,
}

impl LoadedDataset {
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, DataSource::Fallback(_))
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    primary: PathBuf,
    fallback: FallbackSource,
}

impl DataLoader {
    pub fn new(primary: impl Into<PathBuf>, fallback: FallbackSource) -> Self {
        Self {
            primary: primary.into(),
            fallback,
        }
    }

    /// Load the primary CSV, or the fallback if the primary does not exist.
    ///
    /// Only `NotFound` triggers the fallback; every other failure, including
    /// a failure of the fallback itself, is returned.
    pub fn load(&self) -> Result<LoadedDataset, LoaderError> {
        match File::open(&self.primary) {
            Ok(file) => {
                let mut frame = read_csv(file)?;
                normalize_column_names(&mut frame)?;
                info!(
                    "Loaded dataset from {} with shape {:?}",
                    self.primary.display(),
                    frame.shape()
                );
                Ok(LoadedDataset {
                    source: DataSource::Primary(self.primary.clone()),
                    frame,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Dataset not found at {}, falling back to {}",
                    self.primary.display(),
                    self.fallback
                );
                self.load_fallback()
            }
            Err(source) => Err(LoaderError::Io {
                path: self.primary.clone(),
                source,
            }),
        }
    }

    fn load_fallback(&self) -> Result<LoadedDataset, LoaderError> {
        let path = match &self.fallback {
            FallbackSource::Path { path } => path.clone(),
            FallbackSource::Url { url, cache_path } => {
                if !cache_path.exists() {
                    download(url, cache_path)?;
                } else {
                    debug!("Using cached reference dataset at {}", cache_path.display());
                }
                cache_path.clone()
            }
        };

        let file = File::open(&path).map_err(|source| LoaderError::Io {
            path: path.clone(),
            source,
        })?;
        let mut frame = read_csv(file)?;
        normalize_column_names(&mut frame)?;
        info!("Loaded fallback dataset with shape {:?}", frame.shape());

        Ok(LoadedDataset {
            source: DataSource::Fallback(self.fallback.to_string()),
            frame,
        })
    }
}

fn read_csv(file: File) -> Result<DataFrame, LoaderError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .into_reader_with_file_handle(file)
        .finish()?;
    Ok(df)
}

fn download(url: &str, cache_path: &Path) -> Result<(), LoaderError> {
    info!("Downloading reference dataset from {}", url);
    let to_download_error = |source| LoaderError::Download {
        url: url.to_string(),
        source,
    };
    let bytes = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(to_download_error)?;

    let to_io_error = |source| LoaderError::Io {
        path: cache_path.to_path_buf(),
        source,
    };
    if let Some(parent) = cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_io_error)?;
    }
    fs::write(cache_path, &bytes).map_err(to_io_error)?;
    debug!("Cached {} bytes at {}", bytes.len(), cache_path.display());
    Ok(())
}

/// Cache file for a downloaded URL. The file name is the URL without its
/// scheme, with every character outside `[A-Za-z0-9.-]` replaced by `_`.
pub fn cache_path_for(url: &str) -> PathBuf {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let file_name: String = without_scheme
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    Path::new(CACHE_DIR).join(file_name)
}

/// Lower-case a header and map it through the rename table.
pub fn normalized_name(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == lower)
        .map(|(_, to)| to.to_string())
        .unwrap_or(lower)
}

/// Rename every column of `df` to its normalized name.
pub fn normalize_column_names(df: &mut DataFrame) -> PolarsResult<()> {
    let renames: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .map(|name| (name.to_string(), normalized_name(name)))
        .filter(|(old, new)| old != new)
        .collect();

    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }
    Ok(())
}
