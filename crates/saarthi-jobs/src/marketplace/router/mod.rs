//! `/api` resource routers. Each returns a stateful router merged by
//! [`marketplace_router`](super::marketplace_router).

use std::sync::Arc;

use axum::extract::State;

use super::Marketplace;

pub mod applications;
pub mod hackathons;
pub mod jobs;
pub mod notifications;
pub mod profiles;
pub mod students;
pub mod users;

pub(crate) type AppState<S> = State<Arc<Marketplace<S>>>;
