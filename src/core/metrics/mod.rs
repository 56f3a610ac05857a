mod per_base_qual;
mod quality_table;
mod screen;
mod summary;

pub use per_base_qual::QualityStatistics;
pub use quality_table::QualityTable;
pub use screen::{ScreenRow, ScreenTable};
pub use summary::{ModuleStatus, parse_summary};
