/// Errors that can occur during golden section search.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bracket contains non-finite value: {value}")]
    NonFiniteBracket { value: f64 },

    #[error("objective evaluation failed at x = {x}")]
    Objective {
        x: f64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("non-finite objective {objective} at x = {x}")]
    NonFiniteObjective { x: f64, objective: f64 },
}
