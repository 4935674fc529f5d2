//! 测试用的脚本化驱动
//!
//! 不碰 COM，按预先写好的脚本应答，并记录上层发起的每一次调用

use super::driver::{CorelDriver, MacroArg};
use crate::error::{AppError, AppResult, ComError};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 驱动收到的调用记录
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    EnsureAlive,
    CloseAll,
    Open(PathBuf),
    CloseActive,
    Macro {
        project: String,
        entry: String,
        args: Vec<MacroArg>,
    },
}

#[derive(Default)]
pub struct ScriptedDriver {
    calls: Mutex<Vec<DriverCall>>,
    /// busy() 的应答脚本；耗尽后返回 Some(false)
    pub busy_script: Mutex<VecDeque<Option<bool>>>,
    /// busy() 永远返回 Some(true)，用来制造超时
    pub always_busy: Mutex<bool>,
    /// active_document_ready() 的应答脚本；耗尽后返回 true
    pub ready_script: Mutex<VecDeque<bool>>,
    /// missing_fonts() 的应答
    pub missing_fonts: Mutex<Vec<String>>,
    /// document_count() 的应答
    pub document_count: Mutex<usize>,
    /// open_document() 直接失败
    pub fail_open: Mutex<bool>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_fonts(fonts: &[&str]) -> Self {
        let driver = Self::default();
        *driver.missing_fonts.lock().unwrap() = fonts.iter().map(|f| f.to_string()).collect();
        driver
    }

    pub fn script_busy(&self, script: impl IntoIterator<Item = Option<bool>>) {
        self.busy_script.lock().unwrap().extend(script);
    }

    pub fn script_ready(&self, script: impl IntoIterator<Item = bool>) {
        self.ready_script.lock().unwrap().extend(script);
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }

    /// 记录到的宏调用（忽略其余调用）
    pub fn macro_calls(&self) -> Vec<DriverCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, DriverCall::Macro { .. }))
            .collect()
    }

    fn record(&self, call: DriverCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CorelDriver for ScriptedDriver {
    async fn ensure_alive(&self) -> AppResult<()> {
        self.record(DriverCall::EnsureAlive);
        Ok(())
    }

    async fn version(&self) -> AppResult<String> {
        Ok("24.0 (scripted)".to_string())
    }

    async fn document_count(&self) -> AppResult<usize> {
        Ok(*self.document_count.lock().unwrap())
    }

    async fn close_all_documents(&self) -> AppResult<()> {
        *self.document_count.lock().unwrap() = 0;
        self.record(DriverCall::CloseAll);
        Ok(())
    }

    async fn open_document(&self, path: &Path) -> AppResult<()> {
        if *self.fail_open.lock().unwrap() {
            return Err(AppError::Com(ComError::CallFailed {
                member: "OpenDocument".to_string(),
                source: "脚本要求打开失败".into(),
            }));
        }
        self.record(DriverCall::Open(path.to_path_buf()));
        Ok(())
    }

    async fn close_active_document(&self) -> AppResult<()> {
        self.record(DriverCall::CloseActive);
        Ok(())
    }

    async fn missing_fonts(&self) -> AppResult<Vec<String>> {
        Ok(self.missing_fonts.lock().unwrap().clone())
    }

    async fn start_macro(&self, project: &str, entry: &str, args: &[MacroArg]) -> AppResult<()> {
        self.record(DriverCall::Macro {
            project: project.to_string(),
            entry: entry.to_string(),
            args: args.to_vec(),
        });
        Ok(())
    }

    async fn busy(&self) -> AppResult<Option<bool>> {
        if *self.always_busy.lock().unwrap() {
            return Ok(Some(true));
        }
        Ok(self
            .busy_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Some(false)))
    }

    async fn active_document_ready(&self) -> AppResult<bool> {
        Ok(self.ready_script.lock().unwrap().pop_front().unwrap_or(true))
    }
}
