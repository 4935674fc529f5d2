//! 单份稿件处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **流程调度**：把稿件交给 `ArtworkFlow`
//! 2. **统计维护**：按结果累加 SweepStats
//! 3. **错误上报**：把处理错误交还给上层判断要不要重连

use crate::infrastructure::CorelDriver;
use crate::workflow::{ArtworkCtx, ArtworkFlow, ProcessResult};
use tracing::{error, info};

/// 一轮扫描的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub treated: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SweepStats {
    pub fn total(&self) -> usize {
        self.treated + self.rejected + self.skipped + self.failed
    }
}

/// 处理单份稿件并把结果计入统计
///
/// 出错时把错误返回给上层（已计入 failed），由上层决定要不要重连
pub async fn process_artwork<D: CorelDriver>(
    driver: &D,
    flow: &ArtworkFlow,
    ctx: &ArtworkCtx,
    stats: &mut SweepStats,
) -> Option<anyhow::Error> {
    log_artwork_start(ctx);

    match flow.run(driver, ctx).await {
        Ok(ProcessResult::Treated) => {
            stats.treated += 1;
            None
        }
        Ok(ProcessResult::Rejected) => {
            stats.rejected += 1;
            None
        }
        Ok(ProcessResult::Skipped) => {
            stats.skipped += 1;
            None
        }
        Err(e) => {
            error!("[稿件 {}] ❌ 处理过程中发生错误: {}", ctx.index, e);
            stats.failed += 1;
            Some(e)
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_artwork_start(ctx: &ArtworkCtx) {
    info!("\n[稿件 {}] {}", ctx.index, "─".repeat(30));
    info!("[稿件 {}] 文件: {}", ctx.index, ctx.path.display());
    info!("[稿件 {}] 订单: {}", ctx.index, ctx.subfolder.display());
    info!("[稿件 {}] 类型: {}", ctx.index, ctx.kind);
}
