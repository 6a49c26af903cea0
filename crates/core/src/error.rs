use thiserror::Error;

use crate::model::{ContentKindError, CredentialsError, ParseIdError, ProgressError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    ContentKind(#[from] ContentKindError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
