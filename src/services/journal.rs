//! 流水账服务 - 业务能力层
//!
//! 只负责"记一笔"能力，不关心流程

use crate::config::Config;
use crate::error::{AppError, AppResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// 处理结果
pub const OUTCOME_TREATED: &str = "TRATADO";
/// 缺字体退稿
pub const OUTCOME_REJECTED: &str = "REFUGADO";

/// 处理结果流水账
///
/// 每处理一份稿件追加一行，早班对单用
pub struct JournalWriter {
    journal_path: String,
}

impl JournalWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            journal_path: config.journal_file.clone(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            journal_path: path.into(),
        }
    }

    /// 记一笔
    ///
    /// # 参数
    /// - `outcome`: 结果（TRATADO / REFUGADO）
    /// - `artwork`: 稿件路径
    /// - `detail`: 补充信息（缺的字体、传了什么参数等）
    pub fn record(&self, outcome: &str, artwork: &Path, detail: &str) -> AppResult<()> {
        debug!("流水账: {} | {}", outcome, artwork.display());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_path)
            .map_err(|e| AppError::file_write_failed(&self.journal_path, e))?;

        let line = format!(
            "{} | {} | {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            outcome,
            artwork.display(),
            detail
        );

        file.write_all(line.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.journal_path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tratamento.log");
        let journal = JournalWriter::with_path(path.display().to_string());

        journal
            .record(OUTCOME_TREATED, Path::new("arte.cdr"), "-")
            .unwrap();
        journal
            .record(OUTCOME_REJECTED, Path::new("arte2.cdr"), "Futura Md BT")
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("TRATADO | arte.cdr"));
        assert!(lines[1].contains("REFUGADO | arte2.cdr | Futura Md BT"));
    }
}
