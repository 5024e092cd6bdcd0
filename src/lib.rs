pub mod assemble;
pub mod chart;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod narrative;
pub mod paginate;
pub mod render;
pub mod scoring;
pub mod util;

pub use assemble::{ReportAssembler, compile_report};
pub use error::ReportError;
pub use scoring::compute_category_scores;
