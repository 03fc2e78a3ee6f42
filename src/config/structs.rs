use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// 单个 sitemap 分片的协议上限
pub const MAX_PART_SIZE: usize = 10_000;

/// 航司关联查询的并发上限
pub const MAX_CORRELATION_FANOUT: usize = 10;

/// 航司派生条目（airline-route / airline-airport）的收录门槛
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DerivedLinkGate {
    /// 基础实体（航线/机场）本身可收录时才收录
    #[default]
    InheritBase,
    /// 只要采样中存在航段即收录
    PresenceOnly,
}

impl std::fmt::Display for DerivedLinkGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for DerivedLinkGate {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inherit_base" => Ok(Self::InheritBase),
            "presence_only" => Ok(Self::PresenceOnly),
            _ => Err(format!(
                "Invalid derived link gate: '{}'. Valid: inherit_base, presence_only",
                s
            )),
        }
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、CPU 数量
/// - database: 目录数据库连接配置
/// - logging: 日志配置
/// - sitemap: 收录策略与分片参数
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：RM，分隔符：__
    /// 示例：RM__SITEMAP__BASE_URL=https://example.com
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 RM，分隔符 __
            .add_source(
                Environment::with_prefix("RM")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// Sitemap 生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// 站点根地址，不带结尾斜杠
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_part_size")]
    pub part_size: usize,
    /// 按出港量排名前 K 的机场视为枢纽
    #[serde(default = "default_hub_top_k")]
    pub hub_top_k: usize,
    /// 每个航司最多扫描的航段数
    #[serde(default = "default_leg_sample_cap")]
    pub leg_sample_cap: u64,
    #[serde(default = "default_correlation_concurrency")]
    pub correlation_concurrency: usize,
    #[serde(default = "default_lastmod_age_days")]
    pub default_lastmod_age_days: i64,
    #[serde(default = "default_fresh_window_days")]
    pub fresh_window_days: i64,
    #[serde(default)]
    pub derived_link_gate: DerivedLinkGate,
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,
    #[serde(default = "default_request_budget_secs")]
    pub request_budget_secs: u64,
}

impl SitemapConfig {
    /// 分片大小，限制在 1..=MAX_PART_SIZE
    pub fn effective_part_size(&self) -> usize {
        self.part_size.clamp(1, MAX_PART_SIZE)
    }

    /// 并发度，限制在 1..=MAX_CORRELATION_FANOUT
    pub fn effective_concurrency(&self) -> usize {
        self.correlation_concurrency
            .clamp(1, MAX_CORRELATION_FANOUT)
    }

    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "catalog.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_base_url() -> String {
    "https://example.com".to_string()
}

fn default_part_size() -> usize {
    MAX_PART_SIZE
}

fn default_hub_top_k() -> usize {
    50
}

fn default_leg_sample_cap() -> u64 {
    1500
}

fn default_correlation_concurrency() -> usize {
    MAX_CORRELATION_FANOUT
}

fn default_lastmod_age_days() -> i64 {
    7
}

fn default_fresh_window_days() -> i64 {
    15
}

fn default_cache_max_age_secs() -> u64 {
    3600
}

fn default_request_budget_secs() -> u64 {
    30
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            part_size: default_part_size(),
            hub_top_k: default_hub_top_k(),
            leg_sample_cap: default_leg_sample_cap(),
            correlation_concurrency: default_correlation_concurrency(),
            default_lastmod_age_days: default_lastmod_age_days(),
            fresh_window_days: default_fresh_window_days(),
            derived_link_gate: DerivedLinkGate::default(),
            cache_max_age_secs: default_cache_max_age_secs(),
            request_budget_secs: default_request_budget_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_defaults() {
        let cfg = SitemapConfig::default();
        assert_eq!(cfg.part_size, 10_000);
        assert_eq!(cfg.correlation_concurrency, 10);
        assert_eq!(cfg.default_lastmod_age_days, 7);
        assert_eq!(cfg.fresh_window_days, 15);
        assert_eq!(cfg.derived_link_gate, DerivedLinkGate::InheritBase);
    }

    #[test]
    fn test_effective_limits_are_clamped() {
        let cfg = SitemapConfig {
            part_size: 50_000,
            correlation_concurrency: 0,
            ..Default::default()
        };
        assert_eq!(cfg.effective_part_size(), MAX_PART_SIZE);
        assert_eq!(cfg.effective_concurrency(), 1);

        let cfg = SitemapConfig {
            correlation_concurrency: 64,
            ..Default::default()
        };
        assert_eq!(cfg.effective_concurrency(), MAX_CORRELATION_FANOUT);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let cfg = SitemapConfig {
            base_url: "https://fly.example/".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.normalized_base_url(), "https://fly.example");
    }

    #[test]
    fn test_derived_link_gate_parse() {
        assert_eq!(
            "presence_only".parse::<DerivedLinkGate>().unwrap(),
            DerivedLinkGate::PresenceOnly
        );
        assert!("sometimes".parse::<DerivedLinkGate>().is_err());
    }

    #[test]
    fn test_sample_config_roundtrips_through_toml() {
        let toml_str = StaticConfig::generate_sample_config();
        assert!(toml_str.contains("[sitemap]"));
        let parsed: StaticConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.sitemap.hub_top_k, 50);
        assert_eq!(parsed.sitemap.derived_link_gate, DerivedLinkGate::InheritBase);
    }
}
