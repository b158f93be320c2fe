pub mod criteria;
pub mod engine;

pub use criteria::FilterCriteria;
pub use engine::{FilterEngine, FilterReport, OutputRecord};
