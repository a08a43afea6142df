use std::path::PathBuf;

use crisis_shared::errors::{AppError, AppResult, ErrorCode};

use super::render::missing_tokens;

/// HTML template read from disk on every generation run.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    path: PathBuf,
}

impl TemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> AppResult<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "failed to read report template"
            );
            AppError::with_details(
                ErrorCode::TemplateUnavailable,
                "report template is unavailable",
                serde_json::json!({ "path": self.path.display().to_string() }),
            )
        })
    }

    /// Loads the template once and warns about absent placeholder tokens.
    pub async fn check(&self) -> AppResult<()> {
        let template = self.load().await?;
        let missing = missing_tokens(&template);
        if !missing.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                missing = ?missing,
                "report template lacks placeholder tokens; they will be left unsubstituted"
            );
        }
        Ok(())
    }
}
