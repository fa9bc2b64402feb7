pub mod filter;

pub use filter::handle_filter;
