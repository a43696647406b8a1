// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod provider;
pub mod reducers;
pub mod routes;
pub mod snapshot_repo;
pub mod window;
