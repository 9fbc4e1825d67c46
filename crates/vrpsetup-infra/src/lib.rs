//! Infrastructure layer - tabular ingestion, export store, HTTP job client

pub mod export;
pub mod http_client;
pub mod tabular;
