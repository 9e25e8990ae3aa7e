use anyhow::{anyhow, Result};

/// Table names are interpolated into SQL, so only `[A-Za-z0-9_]` is allowed.
pub fn validate_table_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{} is empty", field));
    }
    if !value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(anyhow!("{} must only contain [A-Za-z0-9_]: {}", field, value));
    }
    Ok(())
}
