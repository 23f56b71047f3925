use std::{fmt, path::PathBuf};

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid selection for {entity}: {source}")]
    Selection {
        entity: String,
        #[source]
        source: SelectionError,
    },
    #[error("failed to generate custom operation `{name}`: {source}")]
    CustomOperation {
        name: String,
        #[source]
        source: Box<CodegenError>,
    },
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),
    #[error("`{operation}` needs a value for `{argument}`")]
    MissingArgument { operation: String, argument: String },
    #[error("failed to render generated source")]
    Render(#[from] fmt::Error),
}

/// A selection that does not fit the shape it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("`{field}` is not a field of {shape} (at {path})")]
    UnknownField { path: String, field: String, shape: String },
    #[error("relation `{field}` needs a sub-selection, not `true` (at {path})")]
    RelationRequiresSubSelection { path: String, field: String },
    #[error("`{field}` is a leaf field and takes no sub-selection (at {path})")]
    SubSelectionOnLeaf { path: String, field: String },
    #[error("selection is nested deeper than {max_depth} levels (at {path})")]
    TooDeep { path: String, max_depth: usize },
    #[error("selection selects no fields (at {path})")]
    EmptySelection { path: String },
}
