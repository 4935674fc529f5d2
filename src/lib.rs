//! # Tratamento Automático
//!
//! 盯着热文件夹、驱动 CorelDRAW 自动处理印刷稿件的守护程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（COM 会话），只暴露能力
//! - `ComExecutor` - 唯一的会话 owner，在专用 STA 线程上执行 COM 调用
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单份稿件
//! - `MacroRunner` - 启动宏并等执行完
//! - `FontAudit` - 过滤系统字体后的真缺字体
//! - `PdfPageCounter` - 数配套 PDF 的页数
//! - `JournalWriter` - 写处理结果流水账
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份稿件"的完整处理流程
//! - `ArtworkCtx` - 上下文封装（订单 + 稿件 + 类型）
//! - `ArtworkFlow` - 流程编排（分类 → 字体检查 → 宏 → 流水账）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/hotfolder_processor` - 外层循环，管资源和故障恢复
//! - `orchestrator/artwork_processor` - 单份稿件处理器，维护统计
//!
//! ## 模块结构

pub mod artwork;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod orchestrator;
pub mod scanner;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(windows)]
pub mod corel;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CorelDriver, MacroArg};
pub use orchestrator::{App, SweepStats};
pub use scanner::{collect_candidates, Candidate};
pub use workflow::{ArtworkCtx, ArtworkFlow, ProcessResult};

#[cfg(windows)]
pub use infrastructure::ComExecutor;
