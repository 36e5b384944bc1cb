//! Layout settings for generated Go source.
//!
//! Defaults follow gofmt: one tab per block level and a single blank line between top-level
//! declarations.

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Indent with tabs instead of spaces
    pub use_tabs: bool,
    /// Indent units per block level (tabs or spaces)
    pub indent_width: usize,
    /// Number of blank lines between top-level declarations
    pub blank_lines_top_level: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            use_tabs: true,
            indent_width: 1,
            blank_lines_top_level: 1,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent with `width` spaces per level
    pub fn with_spaces(mut self, width: usize) -> Self {
        self.use_tabs = false;
        self.indent_width = width;
        self
    }

    /// Set the blank lines between top-level declarations
    pub fn with_blank_lines_top_level(mut self, count: usize) -> Self {
        self.blank_lines_top_level = count;
        self
    }

    /// The text written for `level` levels of indentation.
    pub fn indent_for(&self, level: usize) -> String {
        let unit = if self.use_tabs { "\t" } else { " " };
        unit.repeat(level * self.indent_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_gofmt_layout() {
        let config = FormatConfig::default();
        assert!(config.use_tabs);
        assert_eq!(config.indent_for(2), "\t\t");
        assert_eq!(config.blank_lines_top_level, 1);
    }

    #[test]
    fn test_with_spaces() {
        let config = FormatConfig::new().with_spaces(4);
        assert!(!config.use_tabs);
        assert_eq!(config.indent_for(1), "    ");
        assert_eq!(config.indent_for(0), "");
    }

    #[test]
    fn test_builder_override() {
        let config = FormatConfig::new().with_blank_lines_top_level(2).with_blank_lines_top_level(1);
        assert_eq!(config.blank_lines_top_level, 1); // Last value wins
    }
}
