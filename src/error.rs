use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// COM / CorelDRAW 自动化相关错误
    Com(ComError),
    /// 宏执行错误
    Macro(MacroError),
    /// 文件操作错误
    File(FileError),
    /// 外部工具调用错误
    Tool(ToolError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Com(e) => write!(f, "COM错误: {}", e),
            AppError::Macro(e) => write!(f, "宏错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Tool(e) => write!(f, "外部工具错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Com(e) => Some(e),
            AppError::Macro(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Tool(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// COM / CorelDRAW 自动化相关错误
#[derive(Debug)]
pub enum ComError {
    /// COM 运行时初始化失败
    InitFailed {
        detail: String,
    },
    /// 连接（或启动）CorelDRAW 实例失败
    AttachFailed {
        progid: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 调用对象成员失败
    CallFailed {
        member: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 对象模型中不存在该成员
    UnknownMember {
        member: String,
    },
    /// 返回值类型与预期不符
    UnexpectedValue {
        member: String,
    },
    /// COM 工作线程已退出
    ThreadGone,
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::InitFailed { detail } => {
                write!(f, "COM 初始化失败: {}", detail)
            }
            ComError::AttachFailed { progid, source } => {
                write!(f, "无法连接到 {}: {}", progid, source)
            }
            ComError::CallFailed { member, source } => {
                write!(f, "调用 {} 失败: {}", member, source)
            }
            ComError::UnknownMember { member } => {
                write!(f, "对象模型中不存在成员: {}", member)
            }
            ComError::UnexpectedValue { member } => {
                write!(f, "{} 返回了意料之外的类型", member)
            }
            ComError::ThreadGone => {
                write!(f, "COM 工作线程已退出")
            }
        }
    }
}

impl std::error::Error for ComError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComError::AttachFailed { source, .. } | ComError::CallFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 宏执行错误
#[derive(Debug)]
pub enum MacroError {
    /// 宏启动失败
    LaunchFailed {
        entry: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 宏在限定时间内没有执行完
    Timeout {
        entry: String,
        timeout_secs: u64,
    },
}

impl fmt::Display for MacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroError::LaunchFailed { entry, source } => {
                write!(f, "宏 {} 启动失败: {}", entry, source)
            }
            MacroError::Timeout {
                entry,
                timeout_secs,
            } => {
                write!(f, "宏 {} 在 {}s 内没有执行完", entry, timeout_secs)
            }
        }
    }
}

impl std::error::Error for MacroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MacroError::LaunchFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件或目录失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 外部工具调用错误
#[derive(Debug)]
pub enum ToolError {
    /// 工具启动失败
    SpawnFailed {
        tool: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 工具以非零状态退出
    Failed {
        tool: String,
        detail: String,
    },
    /// 工具输出无法解析
    ParseFailed {
        tool: String,
        detail: String,
    },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::SpawnFailed { tool, source } => {
                write!(f, "无法启动 {}: {}", tool, source)
            }
            ToolError::Failed { tool, detail } => {
                write!(f, "{} 执行失败: {}", tool, detail)
            }
            ToolError::ParseFailed { tool, detail } => {
                write!(f, "无法解析 {} 的输出: {}", tool, detail)
            }
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::SpawnFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件解析失败
    ParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseFailed { path, source } => {
                write!(f, "配置文件解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::ParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 COM 调用失败错误
    pub fn com_call_failed(
        member: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Com(ComError::CallFailed {
            member: member.into(),
            source: Box::new(source),
        })
    }

    /// 创建连接失败错误
    pub fn com_attach_failed(
        progid: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Com(ComError::AttachFailed {
            progid: progid.into(),
            source: Box::new(source),
        })
    }

    /// 创建宏启动失败错误
    pub fn macro_launch_failed(
        entry: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Macro(MacroError::LaunchFailed {
            entry: entry.into(),
            source: Box::new(source),
        })
    }

    /// 创建宏超时错误
    pub fn macro_timeout(entry: impl Into<String>, timeout_secs: u64) -> Self {
        AppError::Macro(MacroError::Timeout {
            entry: entry.into(),
            timeout_secs,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否为 COM 层面的错误（需要重新连接 CorelDRAW）
    pub fn is_com(&self) -> bool {
        matches!(self, AppError::Com(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_timeout_display() {
        let err = AppError::macro_timeout("Dump.TratamentoAutomatico", 60);
        assert_eq!(
            err.to_string(),
            "宏错误: 宏 Dump.TratamentoAutomatico 在 60s 内没有执行完"
        );
        assert!(!err.is_com());
    }

    #[test]
    fn test_com_error_is_com() {
        let err = AppError::Com(ComError::ThreadGone);
        assert!(err.is_com());
        assert_eq!(err.to_string(), "COM错误: COM 工作线程已退出");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err = AppError::from(io);
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }
}
