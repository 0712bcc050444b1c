pub mod records;
pub mod summary;

pub use records::export_records;
pub use summary::write_summary;
