pub mod domain;
pub mod error;
pub mod feed;

pub mod config {
    const DEFAULT_FEED_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";
    const DEMO_API_KEY: &str = "DEMO_KEY";
    const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub feed_base_url: Option<String>,
        pub feed_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub port: Option<u16>,
        pub cors_allowlist: Vec<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                feed_base_url: std::env::var("NEO_FEED_BASE_URL").ok(),
                feed_api_key: std::env::var("NASA_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()),
                cors_allowlist: parse_allowlist(std::env::var("CORS_ALLOWLIST").ok()),
            })
        }

        pub fn feed_base_url(&self) -> &str {
            self.feed_base_url
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_FEED_BASE_URL)
        }

        /// NASA issues a shared low-quota demo key; used when no real key is set.
        pub fn feed_api_key(&self) -> &str {
            self.feed_api_key
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEMO_API_KEY)
        }

        pub fn port(&self) -> u16 {
            self.port.unwrap_or(DEFAULT_PORT)
        }
    }

    fn parse_allowlist(v: Option<String>) -> Vec<String> {
        let parsed: Vec<String> = v
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if parsed.is_empty() {
            vec![
                "http://localhost:3001".to_string(),
                "http://127.0.0.1:3001".to_string(),
            ]
        } else {
            parsed
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn empty_settings() -> Settings {
            Settings {
                feed_base_url: None,
                feed_api_key: None,
                sentry_dsn: None,
                port: None,
                cors_allowlist: parse_allowlist(None),
            }
        }

        #[test]
        fn falls_back_to_demo_key_and_defaults() {
            let s = empty_settings();
            assert_eq!(s.feed_api_key(), "DEMO_KEY");
            assert_eq!(s.feed_base_url(), "https://api.nasa.gov/neo/rest/v1/feed");
            assert_eq!(s.port(), 3000);
            assert_eq!(s.cors_allowlist.len(), 2);
        }

        #[test]
        fn splits_and_trims_allowlist() {
            let list = parse_allowlist(Some(" https://a.example , https://b.example ,".to_string()));
            assert_eq!(list, vec!["https://a.example", "https://b.example"]);
        }

        #[test]
        fn blank_override_keeps_defaults() {
            let s = Settings {
                feed_base_url: Some("   ".to_string()),
                feed_api_key: Some(String::new()),
                ..empty_settings()
            };
            assert_eq!(s.feed_base_url(), "https://api.nasa.gov/neo/rest/v1/feed");
            assert_eq!(s.feed_api_key(), "DEMO_KEY");
        }
    }
}
