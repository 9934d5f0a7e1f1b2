use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("sheet {name:?} not found (available: {list})", list = .available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },
    #[error("failed to read sheet {name:?}: {source}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
    #[error(
        "sheet {name:?} ends at row {last_row} and cannot hold the two header rows at rows \
         {header_start}-{header_end} (1-indexed)"
    )]
    TooShort {
        name: String,
        last_row: usize,
        header_start: usize,
        header_end: usize,
    },
}
