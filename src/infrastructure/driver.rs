use crate::error::AppResult;
use std::path::Path;

/// 传给 GMS 宏的参数
#[derive(Debug, Clone, PartialEq)]
pub enum MacroArg {
    Bool(bool),
    I32(i32),
    Str(String),
}

impl std::fmt::Display for MacroArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MacroArg::Bool(b) => write!(f, "{}", b),
            MacroArg::I32(n) => write!(f, "{}", n),
            MacroArg::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// CorelDRAW 自动化能力
///
/// 职责：
/// - 对上层隐藏 COM 细节（上层只认识路径、字体名、宏名）
/// - 每个方法对应对象模型里的一小步，不编排流程
///
/// Windows 上由 [`ComExecutor`](super::ComExecutor) 实现；
/// 测试里用脚本化的假实现替代
#[allow(async_fn_in_trait)]
pub trait CorelDriver {
    /// 确保 CorelDRAW 实例存活：探测失败时先从 ROT 找已打开的实例，
    /// 找不到再启动一个新实例
    async fn ensure_alive(&self) -> AppResult<()>;

    /// 应用程序版本号（也用作存活探针）
    async fn version(&self) -> AppResult<String>;

    /// 当前打开的文档数量
    async fn document_count(&self) -> AppResult<usize>;

    /// 关闭所有打开的文档
    async fn close_all_documents(&self) -> AppResult<()>;

    /// 打开文档并使其成为活动文档
    async fn open_document(&self, path: &Path) -> AppResult<()>;

    /// 关闭活动文档
    async fn close_active_document(&self) -> AppResult<()>;

    /// 活动文档缺失的字体列表（未过滤）
    async fn missing_fonts(&self) -> AppResult<Vec<String>>;

    /// 启动一个 GMS 宏（不等待执行完成）
    async fn start_macro(&self, project: &str, entry: &str, args: &[MacroArg]) -> AppResult<()>;

    /// 应用程序是否忙；对象模型不支持 Busy 属性时返回 None
    async fn busy(&self) -> AppResult<Option<bool>>;

    /// 活动文档是否可访问（`ActiveDocument.Pages.Count` 探针）
    async fn active_document_ready(&self) -> AppResult<bool>;
}
