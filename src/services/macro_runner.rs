//! 宏执行服务 - 业务能力层
//!
//! GMSManager.RunMacro 启动后立即返回，宏是否跑完只能靠轮询判断

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{CorelDriver, MacroArg};
use std::time::{Duration, Instant};
use tracing::debug;

pub struct MacroRunner {
    project: String,
    poll_timeout: Duration,
    poll_interval: Duration,
}

impl MacroRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            project: config.macro_project.clone(),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// 自定义超时和轮询间隔
    pub fn with_timing(
        project: impl Into<String>,
        poll_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            project: project.into(),
            poll_timeout,
            poll_interval,
        }
    }

    /// 启动宏并等它执行完
    ///
    /// 优先看 Busy 标志；对象模型不支持 Busy 时退回
    /// `ActiveDocument.Pages.Count` 探针（宏跑完文档才能访问）
    pub async fn run_to_completion<D: CorelDriver>(
        &self,
        driver: &D,
        entry: &str,
        args: &[MacroArg],
    ) -> AppResult<()> {
        debug!("启动宏 {}.{}，参数 {} 个", self.project, entry, args.len());
        driver.start_macro(&self.project, entry, args).await?;

        let start = Instant::now();
        loop {
            match driver.busy().await? {
                Some(false) => return Ok(()),
                Some(true) => {}
                None => {
                    if driver.active_document_ready().await? {
                        return Ok(());
                    }
                }
            }

            if start.elapsed() > self.poll_timeout {
                return Err(AppError::macro_timeout(entry, self.poll_timeout.as_secs()));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
