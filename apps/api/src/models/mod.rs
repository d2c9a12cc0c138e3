pub mod listing;

pub use listing::{JobListing, JobType};
