pub mod cell;
pub mod error;
pub mod report;
pub mod template;

pub use cell::{Cell, format_number};
pub use error::NormalizeError;
pub use report::NormalizeReport;
pub use template::{
    DATE_COLUMN, FINAL_COLUMNS, GROSS_SALES_COLUMN, STORE_NAME_COLUMN, TemplateConfig,
};
