//! Passenger Schema Module
//! Typed, column-wise view of the loaded passenger table.
//!
//! Columns that the reference dataset does not carry are `Option` fields, so
//! "is this column present" is answered by the type instead of a name lookup.

use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Column '{column}' is null at row {row}")]
    NullValue { column: String, row: usize },
    #[error("Column '{column}' has invalid value {value} at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
}

/// A column whose cells may be missing.
pub type Nullable<T> = Vec<Option<T>>;

/// Travel class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pclass {
    First,
    Second,
    Third,
}

impl Pclass {
    pub fn from_number(n: f64) -> Option<Self> {
        if n == 1.0 {
            Some(Pclass::First)
        } else if n == 2.0 {
            Some(Pclass::Second)
        } else if n == 3.0 {
            Some(Pclass::Third)
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Pclass::First => 1,
            Pclass::Second => 2,
            Pclass::Third => 3,
        }
    }
}

impl fmt::Display for Pclass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Passenger records stored column by column. All columns share one length.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerTable {
    pub passenger_id: Option<Nullable<i64>>,
    pub survived: Vec<bool>,
    pub pclass: Vec<Pclass>,
    pub name: Option<Nullable<String>>,
    pub sex: Vec<String>,
    pub age: Nullable<f64>,
    pub sibsp: Vec<u32>,
    pub parch: Vec<u32>,
    pub ticket: Option<Nullable<String>>,
    pub fare: Nullable<f64>,
    pub cabin: Option<Nullable<String>>,
    pub deck: Option<Nullable<String>>,
    pub embarked: Nullable<String>,
    /// Width of the source frame, counting columns not read into the table.
    pub source_columns: usize,
}

impl PassengerTable {
    /// Build the typed table from a frame with normalized column names.
    ///
    /// Required columns must exist and (except `age`, `fare` and `embarked`)
    /// must not contain nulls. Columns not in the schema are ignored.
    pub fn from_frame(df: &DataFrame) -> Result<Self, SchemaError> {
        let survived = require(floats(required(df, "survived")?)?, "survived")?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                if v == 0.0 {
                    Ok(false)
                } else if v == 1.0 {
                    Ok(true)
                } else {
                    Err(invalid("survived", row, v))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pclass = require(floats(required(df, "pclass")?)?, "pclass")?
            .into_iter()
            .enumerate()
            .map(|(row, v)| Pclass::from_number(v).ok_or_else(|| invalid("pclass", row, v)))
            .collect::<Result<Vec<_>, _>>()?;

        let passenger_id = match df.column("passenger_id").ok() {
            Some(col) => Some(
                floats(col)?
                    .into_iter()
                    .map(|v| v.map(|id| id as i64))
                    .collect(),
            ),
            None => None,
        };

        Ok(Self {
            passenger_id,
            survived,
            pclass,
            name: optional_strings(df, "name")?,
            sex: require(strings(required(df, "sex")?)?, "sex")?,
            age: floats(required(df, "age")?)?,
            sibsp: counts(df, "sibsp")?,
            parch: counts(df, "parch")?,
            ticket: optional_strings(df, "ticket")?,
            fare: floats(required(df, "fare")?)?,
            cabin: optional_strings(df, "cabin")?,
            deck: optional_strings(df, "deck")?,
            embarked: strings(required(df, "embarked")?)?,
            source_columns: df.width(),
        })
    }

    pub fn len(&self) -> usize {
        self.survived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.survived.is_empty()
    }
}

fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, SchemaError> {
    df.column(name)
        .map_err(|_| SchemaError::MissingColumn(name.to_string()))
}

fn floats(col: &Column) -> Result<Nullable<f64>, SchemaError> {
    let cast = col.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

fn strings(col: &Column) -> Result<Nullable<String>, SchemaError> {
    let cast = col.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn optional_strings(df: &DataFrame, name: &str) -> Result<Option<Nullable<String>>, SchemaError> {
    df.column(name).ok().map(strings).transpose()
}

fn counts(df: &DataFrame, name: &str) -> Result<Vec<u32>, SchemaError> {
    require(floats(required(df, name)?)?, name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            if v >= 0.0 && v.fract() == 0.0 {
                u32::try_from(v as u64).map_err(|_| invalid(name, row, v))
            } else {
                Err(invalid(name, row, v))
            }
        })
        .collect()
}

fn require<T>(values: Nullable<T>, column: &str) -> Result<Vec<T>, SchemaError> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| SchemaError::NullValue {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

fn invalid(column: &str, row: usize, value: f64) -> SchemaError {
    SchemaError::InvalidValue {
        column: column.to_string(),
        row,
        value: value.to_string(),
    }
}
