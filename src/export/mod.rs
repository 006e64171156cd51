//! Export functionality: CSV rows and plain-text reports

pub mod csv;
pub mod report;

pub use csv::export_expenses_csv;
pub use report::render_monthly_report;
