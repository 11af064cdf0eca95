/// Errors produced by the selection/ranking/archive core.
///
/// The core never retries or degrades silently: every failure is signalled
/// with enough context for the calling algorithm or driver to diagnose it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when an archive is constructed with a zero capacity.
    #[error("archive capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    /// Returned when an algorithm is configured with a population too small to run.
    #[error("population size must be at least 2, got {0}")]
    InvalidPopulationSize(usize),

    /// Returned when a probability parameter lies outside [0, 1].
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability {
        /// The name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when an adaptive grid would have zero or too many hypercubes.
    #[error("adaptive grid configuration invalid: {bisections} bisections over {objectives} objectives")]
    InvalidGrid { bisections: usize, objectives: usize },

    /// Returned when a weighted scalarizing function is built without weights.
    #[error("scalarizing function `{function}` requires a weight vector")]
    MissingWeights { function: &'static str },

    /// Returned when a weight that must be positive is not.
    #[error("weights must be positive: weight {index} is {value}")]
    NonPositiveWeight { index: usize, value: f64 },

    /// Returned when a weight vector set is constructed with no vectors.
    #[error("weight vector set is empty")]
    EmptyWeightVectorSet,

    /// Returned when preference selection is configured without interest points.
    #[error("preference selection requires at least one interest point")]
    NoInterestPoints,

    /// Returned when a generated weight set would need more vectors than requested.
    #[error("a uniform weight set needs at least two vectors, got {0}")]
    InvalidWeightCount(usize),

    /// Returned when two objective vectors of different lengths are compared.
    #[error("objective vector length mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The number of objectives the operation expected.
        expected: usize,
        /// The number of objectives actually found.
        got: usize,
    },

    /// Returned when selection asks for more solutions than are available.
    #[error("selection requested {requested} solutions but only {available} are available")]
    InsufficientPopulation { requested: usize, available: usize },

    /// Returned on an out-of-range weight vector lookup.
    #[error("index {index} out of range for a set of {len} weight vectors")]
    InvalidIndex { index: usize, len: usize },

    /// Returned when a weight file does not follow the `# <count> <dimension>` format.
    #[error("malformed weight file at line {line}: {reason}")]
    WeightFileParse { line: usize, reason: String },

    /// Returned when a weight file cannot be read at all.
    #[error("failed to read weight file: {0}")]
    WeightFileIo(#[from] std::io::Error),

    /// Returned when an operation needs at least one solution.
    #[error("operation requires a non-empty population")]
    EmptyPopulation,

    /// Returned when a problem fails to evaluate a candidate solution.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
