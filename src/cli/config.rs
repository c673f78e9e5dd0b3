//! Output formatting configuration
//!
//! Defaults can be overridden through environment variables; explicit
//! command-line flags are applied on top.

/// Default indentation width for rendered documents
pub const DEFAULT_INDENT: usize = 2;

/// Environment variable for the indentation width
pub const ENV_INDENT: &str = "FLOW_MIGRATE_INDENT";

/// How converted documents are rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Spaces per nesting level
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl OutputConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides. Unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(indent) = std::env::var(ENV_INDENT)
            && let Ok(indent) = indent.trim().parse()
        {
            self.indent = indent;
        }
    }

    /// Indentation unit used by the JSON formatter
    pub fn indent_unit(&self) -> Vec<u8> {
        vec![b' '; self.indent]
    }
}
