pub mod reports;
pub mod settlement;
pub mod week;

pub use reports::ReportService;
pub use settlement::SettlementService;
