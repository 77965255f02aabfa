/// reading tabular resources (the reaction table) into rows of text cells
pub mod load_from_file;
/// log level setup
pub mod logger;
