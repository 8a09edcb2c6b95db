pub mod observers;
pub mod session;
pub mod training_stats;

pub use observers::{CsvCurveObserver, LogObserver, TrainingObserver};
pub use session::SessionMetrics;
pub use training_stats::TrainingStats;
