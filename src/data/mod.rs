//! Data module - source loading, unification and cell formatting

pub mod cell;
pub mod columns;
pub mod formatter;
pub mod loader;
pub mod processor;
pub mod table;

pub use cell::CellValue;
pub use columns::YEAR_COLUMN;
pub use loader::{DataLoader, DatasetCache};
pub use table::UnifiedTable;
