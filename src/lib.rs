pub mod aggregate;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod search;

pub use aggregate::aggregate;
pub use error::{AggregateError, ReviewError};
pub use models::{EntityStats, NewRating, RatingRecord};
