use std::fmt;
use std::str::FromStr;

use crate::shared::constants::COLUMN_SIGNATURE_SEPARATOR;

/// Projectable attribute of a region row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Code,
    Name,
    PostalCode,
    Latitude,
    Longitude,
    Status,
}

pub const ALL_COLUMNS: [Column; 6] = [
    Column::Code,
    Column::Name,
    Column::PostalCode,
    Column::Latitude,
    Column::Longitude,
    Column::Status,
];

pub const DEFAULT_COLUMNS: [Column; 3] = [Column::Code, Column::Name, Column::PostalCode];

impl Column {
    /// SQL column name
    pub const fn as_str(self) -> &'static str {
        match self {
            Column::Code => "code",
            Column::Name => "name",
            Column::PostalCode => "postal_code",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::Status => "status",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_COLUMNS
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| format!("Unknown column '{}'", s))
    }
}

/// Columns requested by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Nothing requested
    #[default]
    Default,
    /// The `*` wildcard
    All,
    Explicit(Vec<Column>),
}

impl ColumnSelection {
    /// Parse a comma-separated column list (`*` for every column).
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::Default),
            Some("*") => return Ok(Self::All),
            Some(raw) => raw,
        };

        let columns = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Column::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from(columns))
    }

    /// Raw signature used by search cache keys (`default` when nothing was requested)
    pub fn signature(&self) -> String {
        match self {
            ColumnSelection::Default => "default".to_string(),
            ColumnSelection::All => "*".to_string(),
            ColumnSelection::Explicit(columns) => columns
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<Vec<Column>> for ColumnSelection {
    fn from(columns: Vec<Column>) -> Self {
        if columns.is_empty() {
            Self::Default
        } else {
            Self::Explicit(columns)
        }
    }
}

/// Normalize a selection to a concrete column list
pub fn resolve_columns(selection: &ColumnSelection) -> Vec<Column> {
    match selection {
        ColumnSelection::All => ALL_COLUMNS.to_vec(),
        ColumnSelection::Default => DEFAULT_COLUMNS.to_vec(),
        ColumnSelection::Explicit(columns) => columns.clone(),
    }
}

/// Canonical column list segment of a cache key
pub fn column_signature(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(COLUMN_SIGNATURE_SEPARATOR)
}
