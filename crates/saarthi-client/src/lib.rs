//! Client side of the Saarthi marketplace: a typed wrapper over the REST API, the
//! signed-in state the web app keeps, the job tracker with its local cache, and the
//! third-party job search lookups.

pub mod auth;
pub mod client;
pub mod error;
mod http;
pub mod jsearch;
pub mod tracker;

pub use auth::AuthState;
pub use client::SaarthiClient;
pub use error::ClientError;
pub use jsearch::{JobSearchClient, SalaryEstimate, SearchJob};
pub use tracker::{FileTrackerCache, JobTracker, TrackerCache};
