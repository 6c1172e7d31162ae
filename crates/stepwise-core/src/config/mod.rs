//! Configuration for Stepwise
//!
//! - [`ProviderConfig`]: endpoint, credential and connection settings for one backend
//! - [`ModelParameters`]: model identifier and per-handler sampling defaults
//! - [`ReasoningConfig`]: step budget and pacing of a reasoning session
//! - [`EnvStore`]: the `.env` key-value store credentials are read from and saved to

mod api_key;
mod env_store;
mod model_params;
mod provider;
mod reasoning;

pub use api_key::{mask_api_key, standard_env_var};
pub use env_store::{EnvStore, keys};
pub use model_params::ModelParameters;
pub use provider::ProviderConfig;
pub use reasoning::{
    DEFAULT_FINAL_ANSWER_TOKENS, DEFAULT_MAX_STEPS, DEFAULT_MAX_TOKENS, DEFAULT_SLEEP_TIME,
    MAX_STEPS_CAP, ReasoningConfig,
};
