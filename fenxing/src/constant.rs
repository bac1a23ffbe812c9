use std::fmt::{Display, Formatter};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractalType {
    Top,
    Bottom,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// 扫描模式：仅处理包含关系，或在此之上做候选分型晋升。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    MergeOnly,
    Promotion,
}

impl ScanMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MergeOnly => "merge_only",
            Self::Promotion => "promotion",
        }
    }

    pub fn parse(value: &str) -> Result<Self, FactorError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "merge_only" => Ok(Self::MergeOnly),
            "promotion" => Ok(Self::Promotion),
            _ => Err(FactorError::InvalidScanMode(value.to_string())),
        }
    }
}

pub struct Const;

impl Const {
    pub const BOOTSTRAP_WINDOW: usize = 11;
    pub const DEFAULT_SLOPE_WINDOW: usize = 10;
}

#[derive(Debug)]
pub enum FactorError {
    InvalidScanMode(String),
    InvalidDatetime(String),
    EmptyInput,
    NonIncreasingDatetime(usize),
    InvertedRange(usize),
    InsufficientData(usize),
    DegenerateSeed(usize),
    Io(std::io::Error),
    Csv(csv::Error),
    Polars(polars::error::PolarsError),
}

impl Display for FactorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidScanMode(v) => write!(f, "invalid scan mode: {v}"),
            Self::InvalidDatetime(v) => write!(f, "invalid datetime: {v}"),
            Self::EmptyInput => write!(f, "empty bar sequence"),
            Self::NonIncreasingDatetime(i) => {
                write!(f, "datetime not strictly increasing at bar {i}")
            }
            Self::InvertedRange(i) => write!(f, "high below low at bar {i}"),
            Self::InsufficientData(n) => {
                write!(f, "need at least 2 bars, got {n}")
            }
            Self::DegenerateSeed(i) => write!(
                f,
                "bootstrap window degenerate: bar {i} holds both extremes"
            ),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
        }
    }
}

impl std::error::Error for FactorError {}

impl From<std::io::Error> for FactorError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for FactorError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<polars::error::PolarsError> for FactorError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}
