pub mod basemap;
pub mod incidents;

pub use incidents::{Dataset, Incident};
