use std::fmt;

/// Failures the request boundary can classify. Everything else travels as a plain
/// `anyhow::Error` and is reported as an unexpected failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    FileNotFound { path: String },
    MissingColumns { columns: Vec<String> },
    StockNotFound { stock: String },
    InvalidEdit { detail: String },
}

impl DashboardError {
    pub fn invalid_edit(detail: impl Into<String>) -> Self {
        Self::InvalidEdit {
            detail: detail.into(),
        }
    }

    /// Recover the typed error from an `anyhow` chain, if there is one.
    pub fn find(err: &anyhow::Error) -> Option<&DashboardError> {
        err.downcast_ref::<DashboardError>()
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => write!(f, "Data file '{path}' not found"),
            Self::MissingColumns { columns } => {
                write!(f, "Missing columns: {}", columns.join(", "))
            }
            Self::StockNotFound { stock } => write!(f, "No data for {stock}"),
            Self::InvalidEdit { detail } => f.write_str(detail),
        }
    }
}

impl std::error::Error for DashboardError {}
