//! Inline suggestion ("ghost text") providers
//!
//! A provider looks at the text typed so far and may propose a continuation.
//! The editor renders the continuation dimmed after the buffer without storing
//! it; it becomes real text only when the caller accepts it.

/// Supplies ghost text for the current input.
///
/// The returned string is the suffix to display after `input`, not the whole
/// completed line. Returning `None` or an empty string shows nothing.
///
/// # Examples
///
/// ```
/// use shellkit_core::suggestion::SuggestionProvider;
///
/// let provider = |input: &str| "git status".strip_prefix(input).map(str::to_string);
/// assert_eq!(provider.suggest("git s"), Some("tatus".to_string()));
/// assert_eq!(provider.suggest("ls"), None);
/// ```
pub trait SuggestionProvider {
    fn suggest(&self, input: &str) -> Option<String>;
}

impl<F> SuggestionProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn suggest(&self, input: &str) -> Option<String> {
        self(input)
    }
}

/// Suggests the remainder of the first candidate that starts with the input.
#[derive(Debug, Clone, Default)]
pub struct PrefixSuggester {
    candidates: Vec<String>,
}

impl PrefixSuggester {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

impl SuggestionProvider for PrefixSuggester {
    fn suggest(&self, input: &str) -> Option<String> {
        if input.is_empty() {
            return None;
        }
        self.candidates
            .iter()
            .filter_map(|c| c.strip_prefix(input))
            .find(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}
