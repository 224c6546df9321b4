use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory, its storage directory and an initial `config.json`.
///
/// # Arguments
/// - `expense_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/expenses`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(expense_home: &Path) -> Result<Out<()>> {
    let config = Config::create(expense_home).await?;
    Ok(format!(
        "Successfully created the expense directory and config at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("expenses");
        let out = init(&home).await.unwrap();
        assert!(out.message().starts_with("Successfully created"));
        assert!(Config::load(&home).await.is_ok());
    }
}
