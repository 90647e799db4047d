/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
    #[error("stored recipe is not valid JSON: {0}")]
    CorruptRecipe(#[from] serde_json::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    /// Unique violations (SQLSTATE 23505) carry meaning for the caller: the title is taken.
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}
