use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("diff error: {0}")]
    Diff(#[from] vtree_diff::DiffError),

    #[error("patch error: {0}")]
    Patch(#[from] vtree_host::PatchError),

    #[error("host error: {0}")]
    Host(#[from] vtree_host::HostError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
