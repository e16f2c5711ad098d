use serde::Deserialize;

use crate::error::ConfigError;

/// Parse and render options.
///
/// Every option defaults to off, which gives plain CommonMark behavior.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Emit `data-sourcepos` attributes on block elements.
    pub sourcepos: bool,
    /// Render soft breaks as `<br />`.
    pub hardbreaks: bool,
    /// Render soft breaks as spaces.
    pub nobreaks: bool,
    /// Suppress raw HTML and dangerous URL schemes.
    pub safe: bool,
    /// Curly quotes, en/em dashes and ellipses.
    pub smart: bool,
    /// Merge adjacent text nodes after parsing.
    pub normalize: bool,
}

impl Config {
    /// Reads a configuration table such as
    ///
    /// ```toml
    /// smart = true
    /// sourcepos = true
    /// ```
    ///
    /// Unknown keys are ignored; missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn sourcepos(mut self, enabled: bool) -> Self {
        self.config.sourcepos = enabled;
        self
    }

    pub fn hardbreaks(mut self, enabled: bool) -> Self {
        self.config.hardbreaks = enabled;
        self
    }

    pub fn nobreaks(mut self, enabled: bool) -> Self {
        self.config.nobreaks = enabled;
        self
    }

    pub fn safe(mut self, enabled: bool) -> Self {
        self.config.safe = enabled;
        self
    }

    pub fn smart(mut self, enabled: bool) -> Self {
        self.config.smart = enabled;
        self
    }

    pub fn normalize(mut self, enabled: bool) -> Self {
        self.config.normalize = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_off() {
        let config = Config::default();
        assert!(!config.smart);
        assert!(!config.safe);
        assert!(!config.sourcepos);
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::default().smart(true).safe(true).build();
        assert!(config.smart);
        assert!(config.safe);
        assert!(!config.hardbreaks);
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str("smart = true\nhardbreaks = true\n").unwrap();
        assert!(config.smart);
        assert!(config.hardbreaks);
        assert!(!config.nobreaks);
    }

    #[test]
    fn test_from_toml_rejects_wrong_types() {
        assert!(Config::from_toml_str("smart = \"yes\"").is_err());
    }
}
