/// Hourly clock and wall-clock hour.
pub mod clock;
pub mod engine;
/// Advisories over a simulated day.
pub mod insights;
pub mod summary;
pub mod types;

pub use engine::{DayReport, Engine, run_day, simulate_day};
pub use insights::{Insight, generate_insights};
pub use summary::{SimulationSummary, battery_cycles};
pub use types::{HourRecord, Season, SimulationParams, SimulationSeries, Weather};
