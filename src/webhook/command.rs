use std::fmt;

use crate::domain::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Recognized command shape for inbound content: a single keyword, one
/// space, then a free-text argument (`weather paris`).
pub struct CommandGrammar {
    keyword: String,
}

impl CommandGrammar {
    /// Create a grammar for `keyword`.
    ///
    /// Invariant: the keyword is non-empty after trimming and contains no
    /// whitespace; matching is case-sensitive and anchored at the start of
    /// the content.
    pub fn new(keyword: impl Into<String>) -> Result<Self, ValidationError> {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "keyword" });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::KeywordNotSingleWord {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self {
            keyword: trimmed.to_owned(),
        })
    }

    /// The keyword this grammar matches.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Extract the argument when `content` matches `<keyword> <argument>`.
    ///
    /// The argument may be empty (`"weather "` matches with an empty
    /// argument); a bare keyword without the separating space does not
    /// match.
    pub fn parse<'a>(&self, content: &'a str) -> Option<&'a str> {
        content
            .strip_prefix(self.keyword.as_str())
            .and_then(|rest| rest.strip_prefix(' '))
    }
}

/// Composes reply content for inbound messages: the recognized command
/// yields a reply built from the extracted argument, anything else yields
/// the fixed syntax-error reply.
pub struct AutoResponder {
    grammar: CommandGrammar,
    compose: Box<dyn Fn(&str) -> String + Send + Sync>,
    syntax_error: String,
}

impl AutoResponder {
    /// Create a responder for `grammar`.
    ///
    /// `compose` receives the extracted argument; `syntax_error` is
    /// returned verbatim for non-matching content.
    pub fn new(
        grammar: CommandGrammar,
        compose: impl Fn(&str) -> String + Send + Sync + 'static,
        syntax_error: impl Into<String>,
    ) -> Self {
        Self {
            grammar,
            compose: Box::new(compose),
            syntax_error: syntax_error.into(),
        }
    }

    /// Build the reply content for `content`.
    pub fn reply_content(&self, content: &str) -> String {
        match self.grammar.parse(content) {
            Some(argument) => (self.compose)(argument),
            None => self.syntax_error.clone(),
        }
    }
}

impl fmt::Debug for AutoResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoResponder")
            .field("grammar", &self.grammar)
            .field("syntax_error", &self.syntax_error)
            .finish_non_exhaustive()
    }
}
