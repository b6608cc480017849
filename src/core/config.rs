use serde::Deserialize;
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FEEDS: &[&str] = &[
    "https://www.leboncoin.fr/recherche?text=ancien&owner_type=private&sort=publication&limit=100&rss=1",
    "https://www.leboncoin.fr/recherche?text=bronze&owner_type=private&sort=publication&limit=100&rss=1",
    "https://www.leboncoin.fr/recherche?text=peinture&owner_type=private&sort=publication&limit=100&rss=1",
    "https://www.leboncoin.fr/recherche?text=bd%20ancienne&owner_type=private&sort=publication&limit=100&rss=1",
    "https://www.leboncoin.fr/recherche?text=faience&owner_type=private&sort=publication&limit=100&rss=1",
    "https://www.leboncoin.fr/recherche?text=porcelaine&owner_type=private&sort=publication&limit=100&rss=1",
    "https://www.leboncoin.fr/recherche?text=art%20tribal&owner_type=private&sort=publication&limit=100&rss=1",
    "https://www.leboncoin.fr/recherche?text=militaria&owner_type=private&sort=publication&limit=100&rss=1",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub scan: ScanConfig,
    pub storage: StorageConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
    pub send_startup_message: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub feeds: Vec<String>,
    pub score_threshold: i64,
    pub ratio_threshold: f64,
    pub http_timeout_secs: u64,
    pub feed_delay_min_ms: u64,
    pub feed_delay_max_ms: u64,
    pub cycle_delay_min_secs: u64,
    pub cycle_delay_max_secs: u64,
    pub marketplace_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub seen_file: PathBuf,
    pub keywords_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub health_port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let feeds = env::var("SCOUT_FEEDS")
            .ok()
            .map(|raw| parse_feed_list(&raw))
            .filter(|feeds| !feeds.is_empty())
            .unwrap_or_else(|| DEFAULT_FEEDS.iter().map(|f| f.to_string()).collect());

        Config {
            telegram: TelegramConfig {
                bot_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
                chat_id: env::var("TELEGRAM_CHAT_ID").unwrap_or_default(),
                api_base: env::var("TELEGRAM_API_BASE")
                    .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
                send_startup_message: env_or("SCOUT_STARTUP_MESSAGE", true),
            },
            scan: ScanConfig {
                feeds,
                score_threshold: env_or("SCOUT_SCORE_THRESHOLD", 40),
                ratio_threshold: finite_or(env::var("SCOUT_RATIO_THRESHOLD").ok(), 10.0),
                http_timeout_secs: env_or("SCOUT_HTTP_TIMEOUT_SECS", 10),
                feed_delay_min_ms: env_or("SCOUT_FEED_DELAY_MIN_MS", 1000),
                feed_delay_max_ms: env_or("SCOUT_FEED_DELAY_MAX_MS", 2000),
                cycle_delay_min_secs: env_or("SCOUT_CYCLE_DELAY_MIN_SECS", 18),
                cycle_delay_max_secs: env_or("SCOUT_CYCLE_DELAY_MAX_SECS", 25),
                marketplace_url: env::var("SCOUT_MARKETPLACE_URL")
                    .unwrap_or_else(|_| "https://www.ebay.fr/sch/i.html".to_string()),
            },
            storage: StorageConfig {
                seen_file: env::var("SCOUT_SEEN_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("seen.json")),
                keywords_file: env::var("SCOUT_KEYWORDS_FILE")
                    .ok()
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from),
            },
            monitoring: MonitoringConfig {
                health_port: env_or("PORT", 3000),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        }
    }
}

impl ScanConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn feed_delay_ms(&self) -> RangeInclusive<u64> {
        ordered(self.feed_delay_min_ms, self.feed_delay_max_ms)
    }

    pub fn cycle_delay_secs(&self) -> RangeInclusive<u64> {
        ordered(self.cycle_delay_min_secs, self.cycle_delay_max_secs)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|f| f.to_string()).collect(),
            score_threshold: 40,
            ratio_threshold: 10.0,
            http_timeout_secs: 10,
            feed_delay_min_ms: 1000,
            feed_delay_max_ms: 2000,
            cycle_delay_min_secs: 18,
            cycle_delay_max_secs: 25,
            marketplace_url: "https://www.ebay.fr/sch/i.html".to_string(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// "nan" and "inf" parse as `f64` but would make every ratio comparison meaningless.
fn finite_or(raw: Option<String>, default: f64) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn ordered(a: u64, b: u64) -> RangeInclusive<u64> {
    if a <= b {
        a..=b
    } else {
        b..=a
    }
}

fn parse_feed_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
