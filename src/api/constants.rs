//! API 模块常量定义

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// 兜底文档的缓存时间（秒），避免 CDN 长时间持有故障结果
pub const FAILSAFE_MAX_AGE_SECS: u64 = 60;

/// 健康检查中目录探测的超时（秒）
pub const HEALTH_PROBE_TIMEOUT_SECS: u64 = 5;
