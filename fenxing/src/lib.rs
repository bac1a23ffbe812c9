pub mod bar;
pub mod constant;
pub mod ingest;
pub mod logging;
mod metrics;
mod seed;
pub mod series;
pub mod transformer;
mod utils;

pub use bar::{is_including, merge_range, KBar, MarkedBar};
pub use constant::{Const, Direction, FactorError, FractalType, ScanMode};
pub use ingest::load_kbar_inputs;
pub use logging::init_logging;
pub use series::MarkedSeries;
pub use transformer::{FractalTransformer, TransformConfig, TransformConfigPatch};
