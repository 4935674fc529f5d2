use crate::error::{AppResult, ConfigError};
use std::path::Path;
use tracing::warn;

/// 程序配置
///
/// 默认值即门店当前的生产参数，可被 `tratar.toml` 和 `TRATAR_*` 环境变量覆盖
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// 热文件夹根目录（每个订单是其中的一个子文件夹）
    pub root_dirs: Vec<String>,
    /// 允许处理的文件扩展名
    pub allowed_extensions: Vec<String>,
    /// 子文件夹内有效文件超过该数量则忽略整个子文件夹（0 表示不限制）
    pub max_files_per_subfolder: usize,
    /// 子文件夹内存在该文件时跳过（人工暂停标记）
    pub hold_marker: String,
    /// CorelDRAW 的 COM ProgID
    pub corel_progid: String,
    /// GMS 宏工程名
    pub macro_project: String,
    /// 自动处理宏（模块.过程）
    pub treat_macro: String,
    /// 缺字体退稿宏（模块.过程）
    pub reject_macro: String,
    /// 等待宏执行完成的超时（秒）
    pub poll_timeout_secs: u64,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 两次扫描之间的停顿（秒）
    pub scan_interval_secs: u64,
    /// 打开非 CDR 文件后等待加载的时间（秒）
    pub open_settle_secs: u64,
    /// 处理前若有多个文档打开则全部关闭
    pub auto_close_multiple: bool,
    /// 视为系统自带、不算缺失的字体
    pub ignored_system_fonts: Vec<String>,
    /// 是否只处理文件名带关键词的 CDR
    pub only_keyword_cdr: bool,
    /// CDR 文件名关键词列表
    pub cdr_keywords: Vec<String>,
    /// 数码印刷 TIF 的文件名标记
    pub digital_marker: String,
    /// 统计 PDF 页数用的外部工具
    pub mutool_bin: String,
    /// 处理结果流水账文件
    pub journal_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dirs: vec![
                r"Z:\Pedidos\Sign - Lona".to_string(),
                r"Z:\Pedidos\Sign - Adesivos".to_string(),
                r"Z:\Pedidos\Digital Colorido".to_string(),
                r"Z:\Pedidos\Digital PB".to_string(),
            ],
            allowed_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "tif".to_string(),
                "cdr".to_string(),
            ],
            max_files_per_subfolder: 5,
            hold_marker: "observacoes.txt".to_string(),
            corel_progid: "CorelDRAW.Application".to_string(),
            macro_project: "Graficonauta".to_string(),
            treat_macro: "Dump.TratamentoAutomatico".to_string(),
            reject_macro: "Dump.RefugarPorFonteFaltando".to_string(),
            poll_timeout_secs: 60,
            poll_interval_ms: 200,
            scan_interval_secs: 3,
            open_settle_secs: 3,
            auto_close_multiple: true,
            ignored_system_fonts: vec!["arial".to_string(), "calibri".to_string()],
            only_keyword_cdr: true,
            cdr_keywords: vec![
                "impressao-digital".to_string(),
                "banner".to_string(),
                "lona".to_string(),
                "vinil-adesivo".to_string(),
                "papel-adesivo".to_string(),
                "adesivo".to_string(),
            ],
            digital_marker: "impressao-digital".to_string(),
            mutool_bin: "mutool".to_string(),
            journal_file: "tratamento.log".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置（缺失或非法的值回退到 `base` 中的值）
    pub fn from_env_with_base(base: Self) -> Self {
        Self {
            root_dirs: env_list("TRATAR_ROOT_DIRS").unwrap_or(base.root_dirs),
            allowed_extensions: env_list("TRATAR_ALLOWED_EXTENSIONS").unwrap_or(base.allowed_extensions),
            max_files_per_subfolder: env_parsed("TRATAR_MAX_FILES_PER_SUBFOLDER").unwrap_or(base.max_files_per_subfolder),
            hold_marker: env_string("TRATAR_HOLD_MARKER").unwrap_or(base.hold_marker),
            corel_progid: env_string("TRATAR_COREL_PROGID").unwrap_or(base.corel_progid),
            macro_project: env_string("TRATAR_MACRO_PROJECT").unwrap_or(base.macro_project),
            treat_macro: env_string("TRATAR_TREAT_MACRO").unwrap_or(base.treat_macro),
            reject_macro: env_string("TRATAR_REJECT_MACRO").unwrap_or(base.reject_macro),
            poll_timeout_secs: env_parsed("TRATAR_POLL_TIMEOUT_SECS").unwrap_or(base.poll_timeout_secs),
            poll_interval_ms: env_parsed("TRATAR_POLL_INTERVAL_MS").unwrap_or(base.poll_interval_ms),
            scan_interval_secs: env_parsed("TRATAR_SCAN_INTERVAL_SECS").unwrap_or(base.scan_interval_secs),
            open_settle_secs: env_parsed("TRATAR_OPEN_SETTLE_SECS").unwrap_or(base.open_settle_secs),
            auto_close_multiple: env_parsed("TRATAR_AUTO_CLOSE_MULTIPLE").unwrap_or(base.auto_close_multiple),
            ignored_system_fonts: env_list("TRATAR_IGNORED_SYSTEM_FONTS").unwrap_or(base.ignored_system_fonts),
            only_keyword_cdr: env_parsed("TRATAR_ONLY_KEYWORD_CDR").unwrap_or(base.only_keyword_cdr),
            cdr_keywords: env_list("TRATAR_CDR_KEYWORDS").unwrap_or(base.cdr_keywords),
            digital_marker: env_string("TRATAR_DIGITAL_MARKER").unwrap_or(base.digital_marker),
            mutool_bin: env_string("TRATAR_MUTOOL_BIN").unwrap_or(base.mutool_bin),
            journal_file: env_string("TRATAR_JOURNAL_FILE").unwrap_or(base.journal_file),
            verbose_logging: env_parsed("TRATAR_VERBOSE_LOGGING").unwrap_or(base.verbose_logging),
        }
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_env_with_base(Self::default())
    }

    /// 从 TOML 文件加载配置（文件可以只写需要覆盖的字段）
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::AppError::Config(ConfigError::ParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(config)
    }

    /// 加载完整配置：默认值 → `tratar.toml`（若存在）→ 环境变量
    pub fn load() -> Self {
        let path_name =
            std::env::var("TRATAR_CONFIG").unwrap_or_else(|_| "tratar.toml".to_string());
        let path = Path::new(&path_name);

        let base = if path.is_file() {
            match Self::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("配置文件 {} 加载失败，使用默认配置: {}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        Self::from_env_with_base(base)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// 逗号分隔的列表型环境变量
fn env_list(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shop_setup() {
        let config = Config::default();
        assert_eq!(config.root_dirs.len(), 4);
        assert_eq!(config.max_files_per_subfolder, 5);
        assert_eq!(config.poll_timeout_secs, 60);
        assert_eq!(config.treat_macro, "Dump.TratamentoAutomatico");
        assert!(config.allowed_extensions.contains(&"cdr".to_string()));
        assert!(config.only_keyword_cdr);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let partial = r#"
            poll_timeout_secs = 120
            cdr_keywords = ["banner"]
        "#;
        let config: Config = toml::from_str(partial).unwrap();
        assert_eq!(config.poll_timeout_secs, 120);
        assert_eq!(config.cdr_keywords, vec!["banner".to_string()]);
        // 未覆盖的字段保持默认
        assert_eq!(config.max_files_per_subfolder, 5);
        assert_eq!(config.hold_marker, "observacoes.txt");
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tratar.toml");
        std::fs::write(&path, "poll_timeout_secs = \"não é número\"").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
