pub mod analyze;
pub mod buy;
pub mod dashboard;
pub mod metrics;
pub mod positions;
pub mod sell;
