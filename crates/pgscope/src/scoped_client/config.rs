use crate::placeholder::PlaceholderStyle;

/// Configuration for [`ScopedClient`](super::ScopedClient).
#[derive(Debug, Clone)]
pub struct ScopedClientConfig {
    /// How predicate markers are rendered. Defaults to `$n` (PostgreSQL).
    pub placeholder: PlaceholderStyle,
    /// Emit a `tracing` event for each rewritten statement.
    pub log_rewrites: bool,
}

impl Default for ScopedClientConfig {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderStyle::Dollar,
            log_rewrites: true,
        }
    }
}

impl ScopedClientConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder style.
    pub fn placeholder(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder = style;
        self
    }

    /// Keep `?` markers as written (for backends with positional `?` binding).
    pub fn question_marks(self) -> Self {
        self.placeholder(PlaceholderStyle::Question)
    }

    /// Enable or disable rewrite logging.
    pub fn log_rewrites(mut self, enabled: bool) -> Self {
        self.log_rewrites = enabled;
        self
    }
}
