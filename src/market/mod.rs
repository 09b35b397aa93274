// Reference price series retrieval
pub mod weekly_close;

pub use weekly_close::fetch_weekly_closes;
