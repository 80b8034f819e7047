use ct_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("population is at capacity ({capacity} agents)")]
    AtCapacity { capacity: usize },

    #[error("{0} is already present in the population")]
    DuplicateId(AgentId),

    #[error("{0} is the reserved invalid id")]
    InvalidId(AgentId),

    #[error("no agent ids left to allocate")]
    IdsExhausted,
}

pub type AgentResult<T> = Result<T, AgentError>;
