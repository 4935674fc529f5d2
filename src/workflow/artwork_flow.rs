//! 稿件处理流程 - 流程层
//!
//! 核心职责：定义"一份稿件"的完整处理流程
//!
//! 流程顺序：
//! 1. CDR → 关键词门槛 → 缺字体检查 → 退稿宏 或 处理宏
//! 2. 数码印刷 TIF → 找配套 PDF → 数页数 → 处理宏
//! 3. 其他位图 → 打开 → 处理宏

use crate::artwork::{naming, ArtworkKind};
use crate::config::Config;
use crate::infrastructure::{CorelDriver, MacroArg};
use crate::services::{journal, FontAudit, JournalWriter, MacroRunner, PdfPageCounter};
use crate::workflow::artwork_ctx::ArtworkCtx;
use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

/// 稿件处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理宏执行完毕
    Treated,
    /// 缺字体，已退稿
    Rejected,
    /// 跳过（不满足处理条件）
    Skipped,
}

/// 稿件处理流程

/// - 编排完整的稿件处理流程
/// - 决定何时检查字体、何时退稿、何时跑处理宏
/// - 不持有 COM 会话
/// - 只依赖业务能力（services）
pub struct ArtworkFlow {
    macro_runner: MacroRunner,
    font_audit: FontAudit,
    pdf_pages: PdfPageCounter,
    journal: JournalWriter,
    treat_macro: String,
    reject_macro: String,
    auto_close_multiple: bool,
    only_keyword_cdr: bool,
    cdr_keywords: Vec<String>,
    digital_marker: String,
    open_settle: Duration,
}

impl ArtworkFlow {
    /// 创建新的稿件处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            macro_runner: MacroRunner::new(config),
            font_audit: FontAudit::new(config),
            pdf_pages: PdfPageCounter::new(config),
            journal: JournalWriter::new(config),
            treat_macro: config.treat_macro.clone(),
            reject_macro: config.reject_macro.clone(),
            auto_close_multiple: config.auto_close_multiple,
            only_keyword_cdr: config.only_keyword_cdr,
            cdr_keywords: config.cdr_keywords.clone(),
            digital_marker: config.digital_marker.clone(),
            open_settle: Duration::from_secs(config.open_settle_secs),
        }
    }

    pub async fn run<D: CorelDriver>(
        &self,
        driver: &D,
        ctx: &ArtworkCtx,
    ) -> Result<ProcessResult> {
        // 有多个文档开着说明上一单没收拾干净，先关掉
        if self.auto_close_multiple {
            match driver.document_count().await {
                Ok(count) if count > 1 => {
                    info!(
                        "[稿件 {}] 检测到 {} 个打开的文档，全部关闭",
                        ctx.index, count
                    );
                    if let Err(e) = driver.close_all_documents().await {
                        warn!("[稿件 {}] ⚠️ 关闭文档失败: {}", ctx.index, e);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("[稿件 {}] ⚠️ 读取文档数失败: {}", ctx.index, e),
            }
        }

        match ctx.kind {
            ArtworkKind::Cdr => self.treat_cdr(driver, ctx).await,
            ArtworkKind::Tiff if naming::contains_marker(&ctx.name, &self.digital_marker) => {
                self.treat_digital_tiff(driver, ctx).await
            }
            _ => self.treat_generic(driver, ctx, Vec::new()).await,
        }
    }

    /// CDR：只打开一次，先查字体再决定处理还是退稿
    async fn treat_cdr<D: CorelDriver>(
        &self,
        driver: &D,
        ctx: &ArtworkCtx,
    ) -> Result<ProcessResult> {
        if self.only_keyword_cdr && !naming::contains_keyword(&ctx.name, &self.cdr_keywords) {
            info!(
                "[稿件 {}] CDR 文件名不带关键词，跳过: {}",
                ctx.index, ctx.name
            );
            return Ok(ProcessResult::Skipped);
        }

        driver.open_document(&ctx.path).await?;

        // 无论处理成败都要把文档关掉
        let outcome = self.treat_open_cdr(driver, ctx).await;
        if let Err(e) = driver.close_active_document().await {
            warn!("[稿件 {}] ⚠️ 关闭文档失败: {}", ctx.index, e);
        }
        outcome
    }

    async fn treat_open_cdr<D: CorelDriver>(
        &self,
        driver: &D,
        ctx: &ArtworkCtx,
    ) -> Result<ProcessResult> {
        let missing = self.font_audit.really_missing(driver).await?;
        if !missing.is_empty() {
            return self.reject_for_fonts(driver, ctx, &missing).await;
        }

        self.macro_runner
            .run_to_completion(driver, &self.treat_macro, &[])
            .await?;
        self.journal
            .record(journal::OUTCOME_TREATED, &ctx.path, "-")?;
        info!("[稿件 {}] ✓ 处理完成", ctx.index);
        Ok(ProcessResult::Treated)
    }

    /// 执行退稿宏并记流水账
    async fn reject_for_fonts<D: CorelDriver>(
        &self,
        driver: &D,
        ctx: &ArtworkCtx,
        missing: &[String],
    ) -> Result<ProcessResult> {
        warn!("[稿件 {}] ⚠️ 缺字体，退稿: {:?}", ctx.index, missing);

        let fonts = missing.join(",");
        let args = vec![
            MacroArg::Str(ctx.path.display().to_string()),
            MacroArg::Str(fonts.clone()),
        ];
        self.macro_runner
            .run_to_completion(driver, &self.reject_macro, &args)
            .await?;
        self.journal
            .record(journal::OUTCOME_REJECTED, &ctx.path, &fonts)?;
        Ok(ProcessResult::Rejected)
    }

    /// 数码印刷 TIF：把"有没有配套 PDF、一共多少页"传给宏
    async fn treat_digital_tiff<D: CorelDriver>(
        &self,
        driver: &D,
        ctx: &ArtworkCtx,
    ) -> Result<ProcessResult> {
        let pdf_path = naming::companion_pdf_path(&ctx.path);

        let args = if tokio::fs::try_exists(&pdf_path).await.unwrap_or(false) {
            info!(
                "[稿件 {}] 找到配套 PDF: {}",
                ctx.index,
                pdf_path.display()
            );
            let pages = match self.pdf_pages.page_count(&pdf_path).await {
                Ok(pages) => {
                    info!("[稿件 {}] PDF 共 {} 页", ctx.index, pages);
                    pages
                }
                Err(e) => {
                    warn!("[稿件 {}] ⚠️ 页数统计失败，按 0 页处理: {}", ctx.index, e);
                    0
                }
            };
            vec![MacroArg::Bool(true), MacroArg::I32(pages as i32)]
        } else {
            warn!(
                "[稿件 {}] ⚠️ 没找到配套 PDF: {}",
                ctx.index,
                pdf_path.display()
            );
            vec![MacroArg::Bool(false), MacroArg::I32(0)]
        };

        self.treat_generic(driver, ctx, args).await
    }

    /// 通用路径：打开、等加载、跑处理宏（文档交给宏收尾）
    async fn treat_generic<D: CorelDriver>(
        &self,
        driver: &D,
        ctx: &ArtworkCtx,
        args: Vec<MacroArg>,
    ) -> Result<ProcessResult> {
        driver.open_document(&ctx.path).await?;

        if !self.open_settle.is_zero() {
            tokio::time::sleep(self.open_settle).await;
        }

        self.macro_runner
            .run_to_completion(driver, &self.treat_macro, &args)
            .await?;

        let detail = if args.is_empty() {
            "-".to_string()
        } else {
            args.iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.journal
            .record(journal::OUTCOME_TREATED, &ctx.path, &detail)?;
        info!("[稿件 {}] ✓ 处理完成，参数: {}", ctx.index, detail);
        Ok(ProcessResult::Treated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{DriverCall, ScriptedDriver};

    /// 指向临时目录的测试配置（流水账也写进去，打开后不等待）
    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            journal_file: dir.join("tratamento.log").display().to_string(),
            open_settle_secs: 0,
            poll_interval_ms: 1,
            ..Config::default()
        }
    }

    fn ctx_for(dir: &std::path::Path, file_name: &str) -> ArtworkCtx {
        ArtworkCtx::new(1, dir.to_path_buf(), dir.join(file_name))
    }

    #[tokio::test]
    async fn test_cdr_without_keyword_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ArtworkFlow::new(&test_config(dir.path()));
        let driver = ScriptedDriver::new();

        let result = flow
            .run(&driver, &ctx_for(dir.path(), "arte-final.cdr"))
            .await
            .unwrap();

        assert_eq!(result, ProcessResult::Skipped);
        // 连打开都不应该发生
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cdr_with_missing_fonts_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ArtworkFlow::new(&test_config(dir.path()));
        let driver = ScriptedDriver::with_missing_fonts(&["arial", "Futura Md BT"]);

        let ctx = ctx_for(dir.path(), "arte-banner.cdr");
        let result = flow.run(&driver, &ctx).await.unwrap();

        assert_eq!(result, ProcessResult::Rejected);
        assert_eq!(
            driver.macro_calls(),
            vec![DriverCall::Macro {
                project: "Graficonauta".to_string(),
                entry: "Dump.RefugarPorFonteFaltando".to_string(),
                args: vec![
                    MacroArg::Str(ctx.path.display().to_string()),
                    MacroArg::Str("Futura Md BT".to_string()),
                ],
            }]
        );
        // CDR 分支结束时必须关文档
        assert!(driver.calls().contains(&DriverCall::CloseActive));

        let journal = std::fs::read_to_string(dir.path().join("tratamento.log")).unwrap();
        assert!(journal.contains("REFUGADO"));
        assert!(journal.contains("Futura Md BT"));
    }

    #[tokio::test]
    async fn test_clean_cdr_is_treated() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ArtworkFlow::new(&test_config(dir.path()));
        // 只缺系统字体，不算真缺
        let driver = ScriptedDriver::with_missing_fonts(&["Arial"]);

        let result = flow
            .run(&driver, &ctx_for(dir.path(), "pedido-lona.cdr"))
            .await
            .unwrap();

        assert_eq!(result, ProcessResult::Treated);
        assert_eq!(
            driver.macro_calls(),
            vec![DriverCall::Macro {
                project: "Graficonauta".to_string(),
                entry: "Dump.TratamentoAutomatico".to_string(),
                args: vec![],
            }]
        );
        assert!(driver.calls().contains(&DriverCall::CloseActive));
    }

    #[tokio::test]
    async fn test_digital_tiff_without_companion_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ArtworkFlow::new(&test_config(dir.path()));
        let driver = ScriptedDriver::new();

        let result = flow
            .run(&driver, &ctx_for(dir.path(), "arte-impressao-digital-01.tif"))
            .await
            .unwrap();

        assert_eq!(result, ProcessResult::Treated);
        assert_eq!(
            driver.macro_calls(),
            vec![DriverCall::Macro {
                project: "Graficonauta".to_string(),
                entry: "Dump.TratamentoAutomatico".to_string(),
                args: vec![MacroArg::Bool(false), MacroArg::I32(0)],
            }]
        );
        // 非 CDR 文档留给宏收尾，不关
        assert!(!driver.calls().contains(&DriverCall::CloseActive));
    }

    #[tokio::test]
    async fn test_digital_tiff_with_companion_pdf() {
        let dir = tempfile::tempdir().unwrap();
        // 放一个假 PDF；页数统计必然失败，应按"找到了但 0 页"处理
        std::fs::write(dir.path().join("arte-impressao-digital.pdf"), b"%PDF-").unwrap();

        let config = Config {
            mutool_bin: "/nao/existe/mutool".to_string(),
            ..test_config(dir.path())
        };
        let flow = ArtworkFlow::new(&config);
        let driver = ScriptedDriver::new();

        let result = flow
            .run(&driver, &ctx_for(dir.path(), "arte-impressao-digital-02.tif"))
            .await
            .unwrap();

        assert_eq!(result, ProcessResult::Treated);
        assert_eq!(
            driver.macro_calls(),
            vec![DriverCall::Macro {
                project: "Graficonauta".to_string(),
                entry: "Dump.TratamentoAutomatico".to_string(),
                args: vec![MacroArg::Bool(true), MacroArg::I32(0)],
            }]
        );
    }

    #[tokio::test]
    async fn test_plain_raster_goes_straight_to_macro() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ArtworkFlow::new(&test_config(dir.path()));
        let driver = ScriptedDriver::new();

        let ctx = ctx_for(dir.path(), "foto.jpg");
        let result = flow.run(&driver, &ctx).await.unwrap();

        assert_eq!(result, ProcessResult::Treated);
        assert!(driver.calls().contains(&DriverCall::Open(ctx.path.clone())));
        assert!(!driver.calls().contains(&DriverCall::CloseActive));
    }

    #[tokio::test]
    async fn test_leftover_documents_are_closed_first() {
        let dir = tempfile::tempdir().unwrap();
        let flow = ArtworkFlow::new(&test_config(dir.path()));
        let driver = ScriptedDriver::new();
        *driver.document_count.lock().unwrap() = 3;

        flow.run(&driver, &ctx_for(dir.path(), "foto.png"))
            .await
            .unwrap();

        assert_eq!(driver.calls()[0], DriverCall::CloseAll);
    }
}
