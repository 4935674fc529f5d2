//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责外层循环和故障恢复，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `hotfolder_processor` - 热文件夹处理器
//! - 管理应用生命周期（初始化、主循环）
//! - 探活并在必要时重连 CorelDRAW
//! - 扫描热文件夹收集候选（Vec<Candidate>）
//! - 输出每一轮的统计信息
//!
//! ### `artwork_processor` - 单份稿件处理器
//! - 处理单个候选稿件
//! - 把结果计入 SweepStats
//! - 把 COM 故障报告给上层
//!
//! ## 层次关系
//!
//! ```text
//! hotfolder_processor (处理 Vec<Candidate>)
//!     ↓
//! artwork_processor (处理单个 Candidate)
//!     ↓
//! workflow::ArtworkFlow (处理单份稿件)
//!     ↓
//! services (能力层：macro / font / pdf / journal)
//!     ↓
//! infrastructure (基础设施：ComExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：hotfolder_processor 管循环，artwork_processor 管单份
//! 2. **资源隔离**：只有编排层持有驱动（ComExecutor）
//! 3. **故障隔离**：单份稿件失败只记一笔，COM 失联才触发重连
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod artwork_processor;
pub mod hotfolder_processor;

// 重新导出主要类型
pub use artwork_processor::{process_artwork, SweepStats};
pub use hotfolder_processor::App;
