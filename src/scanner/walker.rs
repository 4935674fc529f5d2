use crate::config::Config;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// 扫描阶段的错误
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ScanError {
    #[error("读取目录失败 ({}): {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 一个待处理的候选稿件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 订单子文件夹
    pub subfolder: PathBuf,
    /// 选中的稿件文件
    pub path: PathBuf,
}

/// 扫描所有根目录，收集本轮的候选稿件
///
/// 规则（与门店流程约定一致）：
/// - 根目录本身不产出候选，只有子文件夹（任意层级）才算订单
/// - 子文件夹里有暂停标记文件（`hold_marker`）则整个跳过
/// - 有效文件数超过上限（`max_files_per_subfolder`，0 表示不限）则跳过
/// - 合格的子文件夹按文件名排序取第一个有效文件
pub async fn collect_candidates(config: &Config) -> Result<Vec<Candidate>, ScanError> {
    let mut candidates = Vec::new();

    for root in &config.root_dirs {
        let root = PathBuf::from(root);
        if !root.is_dir() {
            // 网络盘没挂载时常见，下一轮再试
            warn!("⚠️ 根目录不存在，跳过: {}", root.display());
            continue;
        }
        walk_root(&root, config, &mut candidates).await?;
    }

    Ok(candidates)
}

async fn walk_root(
    root: &Path,
    config: &Config,
    out: &mut Vec<Candidate>,
) -> Result<(), ScanError> {
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let is_root = dir == root;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if is_root => {
                return Err(ScanError::ReadDir {
                    path: dir,
                    source: e,
                });
            }
            Err(e) => {
                warn!("⚠️ 子文件夹无法读取，跳过: {} ({})", dir.display(), e);
                continue;
            }
        };

        let mut valid_files: Vec<String> = Vec::new();
        let mut on_hold = false;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("⚠️ 遍历 {} 时出错: {}", dir.display(), e);
                    break;
                }
            };

            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if name.eq_ignore_ascii_case(&config.hold_marker) {
                on_hold = true;
                continue;
            }

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();
            if config
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
            {
                valid_files.push(name.to_string());
            }
        }

        if is_root || on_hold {
            if on_hold {
                debug!("子文件夹有暂停标记，跳过: {}", dir.display());
            }
            continue;
        }
        if valid_files.is_empty() {
            continue;
        }
        if config.max_files_per_subfolder > 0 && valid_files.len() > config.max_files_per_subfolder
        {
            debug!(
                "子文件夹文件过多 ({} > {})，跳过: {}",
                valid_files.len(),
                config.max_files_per_subfolder,
                dir.display()
            );
            continue;
        }

        valid_files.sort();
        out.push(Candidate {
            path: dir.join(&valid_files[0]),
            subfolder: dir,
        });
    }

    Ok(())
}
