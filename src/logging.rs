pub mod record;

pub use record::FilterLogRecord;
