//! Excel I/O: calamine on the way in, rust_xlsxwriter on the way out

pub mod reader;
pub mod writer;

pub use reader::WorkbookFile;
pub use writer::{export_dataset_excel, save_workbook};
