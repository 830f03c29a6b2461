//! Upstream LLM provider implementations

pub mod google;

use crate::{Error, Model, Result, TextEventStream, Turn};
use async_trait::async_trait;

/// Trait for upstream text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stream generated text for the given conversation contents
    async fn stream(&self, model: &Model, contents: &[Turn]) -> Result<TextEventStream>;
}

/// Get an API key from a provided value or the first set environment variable
pub fn get_api_key(provided: Option<&str>, env_vars: &[&str]) -> Result<String> {
    if let Some(key) = provided.filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }

    env_vars
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .ok_or(Error::InvalidApiKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_key_wins() {
        let key = get_api_key(Some("abc"), &["ZOLA_TEST_UNSET_VAR_1"]).unwrap();
        assert_eq!(key, "abc");
    }

    #[test]
    fn test_blank_key_falls_through() {
        let result = get_api_key(Some("  "), &["ZOLA_TEST_UNSET_VAR_2"]);
        assert!(matches!(result, Err(Error::InvalidApiKey)));
    }
}
