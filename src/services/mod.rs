//! 业务能力层
//!
//! 描述"我能做什么"，每个服务只处理单份稿件的一种能力：
//! - `MacroRunner` - 启动宏并等它执行完
//! - `FontAudit` - 判断哪些缺失字体是真缺
//! - `PdfPageCounter` - 数配套 PDF 的页数
//! - `JournalWriter` - 写处理结果流水账
//!
//! 不出现 Vec<Candidate>，不关心流程顺序

pub mod font_audit;
pub mod journal;
pub mod macro_runner;
pub mod pdf_pages;

pub use font_audit::FontAudit;
pub use journal::JournalWriter;
pub use macro_runner::MacroRunner;
pub use pdf_pages::PdfPageCounter;
