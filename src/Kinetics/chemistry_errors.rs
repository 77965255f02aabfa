use thiserror::Error;

/// Errors of reaction network construction, configuration and step setup.
/// Per-cell evaluation never fails; zero denominators are floored instead.
#[derive(Debug, Error)]
pub enum ChemistryError {
    #[error("could not open chemistry file '{path}': {source}")]
    Resource {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("chemistry file '{path}' is malformed: {reason}")]
    Format { path: String, reason: String },
    #[error("chemistry file '{path}', row {row}, column '{column}': cannot parse '{value}' as a number")]
    Parse {
        path: String,
        row: usize,
        column: String,
        value: String,
    },
    #[error("invalid perturbation token '{0}' (expected 'all' or a row number such as 'R12')")]
    PerturbToken(String),
    #[error("cannot perturb reaction from row {row}: {reason}")]
    Perturbation { row: usize, reason: String },
    #[error("field '{0}' referenced by the reaction network is not available")]
    MissingField(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
