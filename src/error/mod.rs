mod app;
mod config;
mod corpus;
mod http;
mod metrics;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use corpus::CorpusError;
pub use http::{HttpError, TransportError};
pub use metrics::MetricsError;
pub use validation::ValidationError;
