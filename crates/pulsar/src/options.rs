use std::str::FromStr;

use tracing::Level;

pub const DEFAULT_LOG_LEVEL: Level = Level::INFO;

/// Developer settings read from the page query string.
///
/// None of these affect pixel content; they only tune diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Maximum level forwarded to the browser console.
    pub log_level: Level,
    /// Log the frame rate once per second at `debug`.
    pub log_fps: bool,
    /// Keys or values that were not understood, reported once logging is up.
    pub ignored: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            log_fps: false,
            ignored: Vec::new(),
        }
    }
}

impl LaunchOptions {
    /// Parses `?log=debug&fps=1`-style query strings. The leading `?` is optional.
    pub fn from_query(query: &str) -> Self {
        let mut options = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "log" => match Level::from_str(value) {
                    Ok(level) => options.log_level = level,
                    Err(_) => options.ignored.push(pair.to_string()),
                },
                "fps" => match parse_flag(value) {
                    Some(flag) => options.log_fps = flag,
                    None => options.ignored.push(pair.to_string()),
                },
                _ => options.ignored.push(pair.to_string()),
            }
        }
        options
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "" | "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_uses_defaults() {
        assert_eq!(LaunchOptions::from_query(""), LaunchOptions::default());
        assert_eq!(LaunchOptions::from_query("?"), LaunchOptions::default());
    }

    #[test]
    fn parses_level_and_fps_flag() {
        let options = LaunchOptions::from_query("?log=debug&fps=1");
        assert_eq!(options.log_level, Level::DEBUG);
        assert!(options.log_fps);
        assert!(options.ignored.is_empty());
    }

    #[test]
    fn bare_fps_key_enables_counter() {
        let options = LaunchOptions::from_query("fps&log=WARN");
        assert!(options.log_fps);
        assert_eq!(options.log_level, Level::WARN);
    }

    #[test]
    fn unknown_keys_and_bad_values_are_collected() {
        let options = LaunchOptions::from_query("?log=loud&dpr=3&fps=maybe");
        assert_eq!(options.log_level, DEFAULT_LOG_LEVEL);
        assert!(!options.log_fps);
        assert_eq!(options.ignored, vec!["log=loud", "dpr=3", "fps=maybe"]);
    }
}
