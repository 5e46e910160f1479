pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::FwBuilderOptions;

pub mod catalog;
pub use catalog::Catalog;
pub use catalog::Feature;

pub mod feature_resolver;
pub use feature_resolver::FeatureSelector;

pub mod build_request;
pub use build_request::BuildRequest;
