//! 日志工具模块

use tracing_subscriber::EnvFilter;

/// 初始化日志输出
///
/// `RUST_LOG` 优先；没设置时由 `verbose` 决定默认级别
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("curto", 10), "curto");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
    }
}
