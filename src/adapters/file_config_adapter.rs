//! INI file configuration adapter.
//!
//! Backs `ConfigPort` with a configparser `Ini`. The sections read by this
//! crate are `[index_plot]` (Sina endpoint, symbol, bar scale, moving
//! average, data length, SVG size), `[indicator_chart]` (Yahoo endpoint,
//! symbol, date range, proxy, adjusted closes, RSI/MACD periods, zoom) and
//! `[viewer]` (optional opener command). Keys are looked up case-insensitively;
//! a missing config file is handled by the caller with `empty()`, which makes
//! every lookup fall back to its default.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// No file given: every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[index_plot]
symbol = sh000001
datalen = 3250

[indicator_chart]
symbol = TSLA
proxy = http://127.0.0.1:10809
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("index_plot", "symbol"),
            Some("sh000001".to_string())
        );
        assert_eq!(
            adapter.get_string("indicator_chart", "proxy"),
            Some("http://127.0.0.1:10809".to_string())
        );
    }

    #[test]
    fn empty_adapter_returns_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("index_plot", "symbol"), None);
        assert_eq!(adapter.get_int("index_plot", "datalen", 3250), 3250);
        assert_eq!(adapter.get_double("indicator_chart", "zoom_start", 50.0), 50.0);
        assert!(adapter.get_bool("indicator_chart", "adjusted", true));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[index_plot]\ndatalen = 100\n").unwrap();
        assert_eq!(adapter.get_string("index_plot", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[index_plot]\ndatalen = 500\n").unwrap();
        assert_eq!(adapter.get_int("index_plot", "datalen", 0), 500);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[index_plot]\ndatalen = abc\n").unwrap();
        assert_eq!(adapter.get_int("index_plot", "datalen", 42), 42);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[indicator_chart]\nzoom_start = 62.5\n").unwrap();
        assert_eq!(adapter.get_double("indicator_chart", "zoom_start", 0.0), 62.5);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[indicator_chart]\nzoom_start = half\n").unwrap();
        assert_eq!(adapter.get_double("indicator_chart", "zoom_start", 50.0), 50.0);
    }

    #[test]
    fn get_bool_parses_true_and_false_values() {
        let adapter = FileConfigAdapter::from_string(
            "[index_plot]\na = true\nb = yes\nc = on\nd = false\ne = no\nf = 0\n",
        )
        .unwrap();
        assert!(adapter.get_bool("index_plot", "a", false));
        assert!(adapter.get_bool("index_plot", "b", false));
        assert!(adapter.get_bool("index_plot", "c", false));
        assert!(!adapter.get_bool("index_plot", "d", true));
        assert!(!adapter.get_bool("index_plot", "e", true));
        assert!(!adapter.get_bool("index_plot", "f", true));
    }

    #[test]
    fn get_bool_returns_default_for_unrecognized() {
        let adapter = FileConfigAdapter::from_string("[index_plot]\nma = maybe\n").unwrap();
        assert!(adapter.get_bool("index_plot", "ma", true));
        assert!(!adapter.get_bool("index_plot", "ma", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[viewer]\ncommand = firefox\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("viewer", "command"),
            Some("firefox".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/marketcharts.ini");
        assert!(result.is_err());
    }
}
