//! Random ensemble mixture (REM) agent.
mod base;
mod checkpoint;
mod config;
mod ensemble;
mod explorer;
mod model;
pub use base::Rem;
pub use checkpoint::{Checkpoint, CHECKPOINT_FILE};
pub use config::RemConfig;
pub use ensemble::{
    combine_q_functions, head_mean, random_stochastic_matrix, CombinedQ, EnsembleCombiner,
    TransformStrategy,
};
pub use explorer::{argmax, linear_schedule, EpsilonGreedy};
pub use model::{LearnerInput, LearnerOutput, NamedParams, RemModel, RemModelConfig};
