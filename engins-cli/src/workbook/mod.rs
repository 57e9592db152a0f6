//! Maintenance workbook model
//!
//! This module turns loosely-structured Excel sheets into normalized
//! datasets using declarative per-sheet schemas, and carries the session
//! lifecycle around them: load, filter, edit, summarize, save.

pub mod dataset;
pub mod edit;
pub mod excel;
pub mod normalize;
pub mod schema;
pub mod session;
pub mod stats;
pub mod value;

pub use dataset::Dataset;
pub use normalize::{HeadedTable, RawGrid, normalize_sheet};
pub use session::WorkbookSession;
pub use value::CellValue;
