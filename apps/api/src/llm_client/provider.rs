//! Provider selection. Keys are checked in a fixed priority order; the first
//! one present decides the provider. Nothing else reads provider env vars.

pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_OVERRIDE_VAR: &str = "LLM_MODEL";

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Anthropic,
    OpenAi,
}

impl LlmProvider {
    fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            LlmProvider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: String,
}

// Keep the key out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Resolves the provider from `lookup` (an env-var reader). Blank values count
/// as unset. `None` means no provider key is configured.
pub fn resolve_provider<F>(lookup: F) -> Option<ProviderConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let present = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    let (provider, api_key) = [
        (LlmProvider::Anthropic, ANTHROPIC_KEY_VAR),
        (LlmProvider::OpenAi, OPENAI_KEY_VAR),
    ]
    .into_iter()
    .find_map(|(provider, var)| present(var).map(|key| (provider, key)))?;

    let model = present(MODEL_OVERRIDE_VAR).unwrap_or_else(|| provider.default_model().to_string());

    Some(ProviderConfig {
        provider,
        model,
        api_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_anthropic_key_wins_over_openai() {
        let config = resolve_provider(env(&[
            (OPENAI_KEY_VAR, "sk-openai"),
            (ANTHROPIC_KEY_VAR, "sk-ant"),
        ]))
        .unwrap();
        assert_eq!(config.provider, LlmProvider::Anthropic);
        assert_eq!(config.api_key, "sk-ant");
        assert_eq!(config.model, DEFAULT_ANTHROPIC_MODEL);
    }

    #[test]
    fn test_falls_back_to_openai() {
        let config = resolve_provider(env(&[(ANTHROPIC_KEY_VAR, "  "), (OPENAI_KEY_VAR, "sk-openai")]))
            .unwrap();
        assert_eq!(config.provider, LlmProvider::OpenAi);
        assert_eq!(config.model, DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn test_model_override() {
        let config = resolve_provider(env(&[
            (OPENAI_KEY_VAR, "sk-openai"),
            (MODEL_OVERRIDE_VAR, "gpt-4.1"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gpt-4.1");
    }

    #[test]
    fn test_no_keys_resolves_to_none() {
        assert!(resolve_provider(env(&[(MODEL_OVERRIDE_VAR, "x")])).is_none());
    }

    #[test]
    fn test_debug_output_hides_key() {
        let config = resolve_provider(env(&[(ANTHROPIC_KEY_VAR, "sk-secret")])).unwrap();
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
