use ct_agent::AgentError;
use ct_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("{got} initial agents exceed the population cap of {max}")]
    TooManyAgents { got: usize, max: usize },

    #[error("population error: {0}")]
    Agent(#[from] AgentError),
}

pub type SimResult<T> = Result<T, SimError>;
