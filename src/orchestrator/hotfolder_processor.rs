//! 热文件夹处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责外层循环和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动 COM 执行器、确认 CorelDRAW 存活
//! 2. **外层循环**：探活 → 扫描 → 逐个处理 → 停顿，周而复始
//! 3. **故障恢复**：CorelDRAW 失联时重连；单轮失败不退出
//! 4. **统计输出**：汇总每一轮的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单份稿件的细节
//! - **资源所有者**：唯一持有驱动的模块
//! - **向下委托**：委托 artwork_processor 处理单份稿件

use crate::config::Config;
use crate::infrastructure::CorelDriver;
use crate::orchestrator::artwork_processor::{process_artwork, SweepStats};
use crate::scanner;
use crate::workflow::{ArtworkCtx, ArtworkFlow};
use anyhow::Result;
use std::time::Duration;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App<D: CorelDriver> {
    config: Config,
    driver: D,
    flow: ArtworkFlow,
}

#[cfg(windows)]
impl App<crate::infrastructure::ComExecutor> {
    /// 初始化应用：启动 COM 执行器并确认 CorelDRAW 可用
    pub async fn initialize(config: Config) -> Result<Self> {
        let driver = crate::infrastructure::ComExecutor::spawn(config.corel_progid.clone())?;
        driver.ensure_alive().await?;
        Ok(Self::with_driver(config, driver))
    }
}

impl<D: CorelDriver> App<D> {
    /// 注入任意驱动（测试用）
    pub fn with_driver(config: Config, driver: D) -> Self {
        let flow = ArtworkFlow::new(&config);
        Self {
            config,
            driver,
            flow,
        }
    }

    /// 运行主循环（不会正常返回）
    pub async fn run(&self) -> Result<()> {
        log_startup(&self.config);

        loop {
            match self.run_sweep().await {
                Ok(stats) if stats.total() > 0 => log_sweep_complete(&stats),
                Ok(_) => {}
                Err(e) => error!("本轮扫描失败: {}", e),
            }

            tokio::time::sleep(Duration::from_secs(self.config.scan_interval_secs)).await;
        }
    }

    /// 跑一轮：探活 → 扫描 → 逐个处理
    pub async fn run_sweep(&self) -> Result<SweepStats> {
        // 1) 确保 CorelDRAW 开着（随便读一下版本号就能探出来）
        if let Err(e) = self.driver.version().await {
            warn!("CorelDRAW 没有响应，重新连接... ({})", e);
            self.driver.ensure_alive().await?;
        }

        // 2) 收集候选稿件
        let candidates = scanner::collect_candidates(&self.config).await?;
        let mut stats = SweepStats::default();

        // 3) 逐个处理
        for (idx, candidate) in candidates.into_iter().enumerate() {
            let ctx = ArtworkCtx::new(idx + 1, candidate.subfolder, candidate.path);

            if let Some(e) = process_artwork(&self.driver, &self.flow, &ctx, &mut stats).await {
                // COM 层面的错误说明 Corel 挂了，重连后再处理下一份
                if is_com_error(&e) {
                    warn!("检测到 COM 故障，重新连接 CorelDRAW...");
                    if let Err(e) = self.driver.ensure_alive().await {
                        error!("重连失败，本轮提前结束: {}", e);
                        break;
                    }
                }
            }
        }

        Ok(stats)
    }
}

fn is_com_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<crate::error::AppError>()
        .map(|app_err| app_err.is_com())
        .unwrap_or(false)
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 热文件夹自动处理模式");
    info!("📁 监控根目录 {} 个:", config.root_dirs.len());
    for root in &config.root_dirs {
        info!("   - {}", root);
    }
    info!(
        "⏱️ 宏超时: {}s / 扫描间隔: {}s",
        config.poll_timeout_secs, config.scan_interval_secs
    );
    info!("{}", "=".repeat(60));
}

fn log_sweep_complete(stats: &SweepStats) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 本轮完成: 处理 {} / 退稿 {} / 跳过 {} / 失败 {}",
        stats.treated, stats.rejected, stats.skipped, stats.failed
    );
    info!("{}", "─".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{DriverCall, ScriptedDriver};
    use std::path::Path;

    async fn make_order(root: &Path, name: &str, file: &str) {
        let order = root.join(name);
        tokio::fs::create_dir(&order).await.unwrap();
        tokio::fs::write(order.join(file), b"x").await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_processes_each_candidate() {
        let dir = tempfile::tempdir().unwrap();
        make_order(dir.path(), "pedido-001", "foto.jpg").await;
        make_order(dir.path(), "pedido-002", "arte-final.cdr").await;

        let config = Config {
            root_dirs: vec![dir.path().display().to_string()],
            journal_file: dir.path().join("tratamento.log").display().to_string(),
            open_settle_secs: 0,
            poll_interval_ms: 1,
            ..Config::default()
        };

        let app = App::with_driver(config, ScriptedDriver::new());
        let stats = app.run_sweep().await.unwrap();

        // jpg 走处理，关键词不符的 CDR 被跳过
        assert_eq!(stats.treated, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 0);

        let opened: Vec<_> = app
            .driver
            .calls()
            .into_iter()
            .filter(|c| matches!(c, DriverCall::Open(_)))
            .collect();
        assert_eq!(opened.len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_with_empty_hotfolders() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            root_dirs: vec![dir.path().display().to_string()],
            ..Config::default()
        };

        let app = App::with_driver(config, ScriptedDriver::new());
        let stats = app.run_sweep().await.unwrap();
        assert_eq!(stats.total(), 0);
    }
}
