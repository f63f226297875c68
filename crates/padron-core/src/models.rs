pub mod query;
pub mod report;
pub mod state;

pub use query::Query;
pub use report::{NationalityCount, Report};
pub use state::RequestState;
