// Backend selection from the environment
//
// The environment is read exactly once at startup; the rest of the session
// consumes the resolved `SessionMode` and never re-checks credentials.

use anyhow::Result;

use super::claude::ClaudeProvider;
use super::openai::OpenAIProvider;
use super::LlmProvider;

/// How the session runs, decided once at startup
pub enum SessionMode {
    /// Full chat loop against the selected provider
    Chat(Box<dyn LlmProvider>),
    /// No credentials: degrade to printing the discovered tools
    ListOnly,
}

/// Resolve the session mode from the process environment.
///
/// `OPENAI_API_KEY` takes priority over `ANTHROPIC_API_KEY`; neither present
/// is a soft degradation, not an error.
pub fn resolve_session_mode() -> Result<SessionMode> {
    from_keys(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("ANTHROPIC_API_KEY").ok(),
    )
}

fn from_keys(openai_key: Option<String>, anthropic_key: Option<String>) -> Result<SessionMode> {
    if let Some(key) = openai_key.filter(|k| !k.is_empty()) {
        let provider = OpenAIProvider::new(key)?;
        tracing::info!("Using OpenAI backend ({})", provider.default_model());
        return Ok(SessionMode::Chat(Box::new(provider)));
    }

    if let Some(key) = anthropic_key.filter(|k| !k.is_empty()) {
        let provider = ClaudeProvider::new(key)?;
        tracing::info!("Using Anthropic backend ({})", provider.default_model());
        return Ok(SessionMode::Chat(Box::new(provider)));
    }

    Ok(SessionMode::ListOnly)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_wins_when_both_present() {
        let mode = from_keys(Some("sk-openai".to_string()), Some("sk-ant".to_string())).unwrap();
        match mode {
            SessionMode::Chat(provider) => assert_eq!(provider.name(), "openai"),
            SessionMode::ListOnly => panic!("expected chat mode"),
        }
    }

    #[test]
    fn test_anthropic_used_when_openai_absent() {
        let mode = from_keys(None, Some("sk-ant".to_string())).unwrap();
        match mode {
            SessionMode::Chat(provider) => assert_eq!(provider.name(), "claude"),
            SessionMode::ListOnly => panic!("expected chat mode"),
        }
    }

    #[test]
    fn test_no_keys_degrades_to_list_only() {
        let mode = from_keys(None, None).unwrap();
        assert!(matches!(mode, SessionMode::ListOnly));
    }

    #[test]
    fn test_empty_key_is_treated_as_absent() {
        let mode = from_keys(Some(String::new()), None).unwrap();
        assert!(matches!(mode, SessionMode::ListOnly));
    }
}
