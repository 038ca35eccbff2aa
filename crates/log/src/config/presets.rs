//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Fields, Format};

impl Config {
    /// Configuration from environment variables
    ///
    /// `DEVSHARE_LOG` wins over `RUST_LOG`; `DEVSHARE_LOG_FORMAT` selects
    /// `pretty`, `json` or `compact`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("DEVSHARE_LOG") {
            config.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }

        if let Ok(format) = std::env::var("DEVSHARE_LOG_FORMAT") {
            config.format = Format::parse(&format);
        }

        config.display.parse_env();
        config.fields = Fields::from_env();

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug,sqlx=warn".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info,sqlx=warn".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}

impl Format {
    /// Lenient parse; unknown names fall back to compact
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_presets() {
        let dev = Config::development();
        assert_eq!(dev.format, Format::Pretty);
        assert!(dev.level.starts_with("debug"));

        let prod = Config::production();
        assert_eq!(prod.format, Format::Json);
        assert!(!prod.display.colors);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("JSON"), Format::Json);
        assert_eq!(Format::parse("pretty"), Format::Pretty);
        assert_eq!(Format::parse("logfmt"), Format::Compact);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(r#"{"level":"warn","format":"json"}"#).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.writer, crate::WriterConfig::Stderr);
        assert!(config.fields.is_empty());
    }
}
