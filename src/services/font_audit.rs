//! 缺字体检查服务 - 业务能力层

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::CorelDriver;

/// 缺字体检查
///
/// CorelDRAW 报告的缺失列表里经常混着 arial、calibri 这类系统字体，
/// 那些不算真缺，过滤掉之后剩下的才值得退稿
pub struct FontAudit {
    ignored: Vec<String>,
}

impl FontAudit {
    pub fn new(config: &Config) -> Self {
        Self {
            ignored: config
                .ignored_system_fonts
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
        }
    }

    /// 活动文档里真正缺失的字体
    pub async fn really_missing<D: CorelDriver>(&self, driver: &D) -> AppResult<Vec<String>> {
        let reported = driver.missing_fonts().await?;
        Ok(filter_ignored(reported, &self.ignored))
    }
}

fn filter_ignored(fonts: Vec<String>, ignored_lower: &[String]) -> Vec<String> {
    fonts
        .into_iter()
        .filter(|font| {
            let lower = font.to_lowercase();
            !ignored_lower.iter().any(|ignored| ignored == &lower)
        })
        .collect()
}
