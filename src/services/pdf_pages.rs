//! PDF 页数统计服务 - 业务能力层
//!
//! 数码印刷的 TIF 是单页的，要把整单的页数传给宏，
//! 页数从配套 PDF 里来，用 mutool 查

use crate::config::Config;
use crate::error::{AppError, AppResult, ToolError};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

pub struct PdfPageCounter {
    mutool_bin: String,
}

impl PdfPageCounter {
    pub fn new(config: &Config) -> Self {
        Self {
            mutool_bin: config.mutool_bin.clone(),
        }
    }

    /// `mutool info <pdf>` 并解析 `Pages: N` 行
    pub async fn page_count(&self, pdf: &Path) -> AppResult<usize> {
        debug!("统计 PDF 页数: {}", pdf.display());

        let output = Command::new(&self.mutool_bin)
            .arg("info")
            .arg(pdf)
            .output()
            .await
            .map_err(|e| {
                AppError::Tool(ToolError::SpawnFailed {
                    tool: self.mutool_bin.clone(),
                    source: Box::new(e),
                })
            })?;

        if !output.status.success() {
            return Err(AppError::Tool(ToolError::Failed {
                tool: self.mutool_bin.clone(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_page_count(&stdout).ok_or_else(|| {
            AppError::Tool(ToolError::ParseFailed {
                tool: self.mutool_bin.clone(),
                detail: "输出里没有 Pages 行".to_string(),
            })
        })
    }
}

/// 从 `mutool info` 的输出里找 `Pages: N`
fn parse_page_count(output: &str) -> Option<usize> {
    for line in output.lines() {
        let line = line.trim();
        if line.to_lowercase().starts_with("pages:") {
            return line.split_whitespace().nth(1)?.parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typical_mutool_output() {
        let output = "\
arte-impressao-digital.pdf:

PDF-1.7
Pages: 12
Retained partial xref sections
";
        assert_eq!(parse_page_count(output), Some(12));
    }

    #[test]
    fn test_parse_missing_pages_line() {
        assert_eq!(parse_page_count("PDF-1.4\nEncrypted: no\n"), None);
    }

    #[test]
    fn test_parse_malformed_count() {
        assert_eq!(parse_page_count("Pages: muitas\n"), None);
    }
}
