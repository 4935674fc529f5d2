//! 稿件处理上下文
//!
//! 封装"我正在处理哪个订单的哪份稿件"这一信息

use crate::artwork::ArtworkKind;
use std::fmt::Display;
use std::path::PathBuf;

/// 稿件处理上下文
#[derive(Debug, Clone)]
pub struct ArtworkCtx {
    /// 本轮扫描里的序号（仅用于日志显示，从 1 开始）
    pub index: usize,

    /// 订单子文件夹
    pub subfolder: PathBuf,

    /// 稿件文件完整路径
    pub path: PathBuf,

    /// 文件名
    pub name: String,

    /// 稿件类型
    pub kind: ArtworkKind,
}

impl ArtworkCtx {
    /// 创建新的稿件上下文（类型从扩展名推导）
    pub fn new(index: usize, subfolder: PathBuf, path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let kind = ArtworkKind::from_path(&path);
        Self {
            index,
            subfolder,
            path,
            name,
            kind,
        }
    }
}

impl Display for ArtworkCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[稿件#{} {} ({})]", self.index, self.name, self.kind)
    }
}
