use chrono::{DateTime, Duration, NaiveDate, Utc};

/// lastmod 计算，每次运行只取一次当前时间
#[derive(Debug, Clone, Copy)]
pub struct LastmodClock {
    now: DateTime<Utc>,
    default_age: Duration,
    fresh_window: Duration,
}

impl LastmodClock {
    pub fn new(now: DateTime<Utc>, default_age_days: i64, fresh_window_days: i64) -> Self {
        Self {
            now,
            default_age: Duration::days(default_age_days.max(0)),
            fresh_window: Duration::days(fresh_window_days.max(0)),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// 没有近期更新时使用的日期
    pub fn default_date(&self) -> NaiveDate {
        (self.now - self.default_age).date_naive()
    }

    /// 窗口内的真实更新时间优先，未来时间截断为当前时间
    pub fn resolve(&self, updated_at: Option<DateTime<Utc>>) -> NaiveDate {
        match updated_at {
            Some(ts) if ts >= self.now - self.fresh_window => ts.min(self.now).date_naive(),
            _ => self.default_date(),
        }
    }
}
