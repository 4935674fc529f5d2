//! 基础设施层
//!
//! 持有稀缺资源（CorelDRAW 的 COM 会话），只向上暴露能力：
//! - `CorelDriver` - 自动化能力的抽象（打开文档 / 查字体 / 跑宏 / 探活）
//! - `ComExecutor` - 唯一的会话 owner，在专用 STA 线程上执行所有 COM 调用
//!
//! 不认识 Candidate / ArtworkCtx，不处理业务流程

pub mod driver;

#[cfg(windows)]
pub mod com_executor;

#[cfg(test)]
pub mod testing;

pub use driver::{CorelDriver, MacroArg};

#[cfg(windows)]
pub use com_executor::ComExecutor;
