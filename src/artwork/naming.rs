//! 文件名约定
//!
//! 门店的下单系统把关键词和页序号编进文件名里，这里集中处理这些约定

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// 去掉文件名末尾页序号用的正则（如 `-01`、`2`）
fn trailing_number_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^(.*?)(?:-)?\d+$").expect("正则写错了"))
}

/// 文件名是否包含任一关键词（不区分大小写）
pub fn contains_keyword(file_name: &str, keywords: &[String]) -> bool {
    let lower = file_name.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// 文件名是否包含指定标记（不区分大小写）
pub fn contains_marker(file_name: &str, marker: &str) -> bool {
    file_name.to_lowercase().contains(&marker.to_lowercase())
}

/// 由稿件主名推导配套 PDF 的文件名
///
/// 多页稿会带 `-01`、`-02` 这样的页序号，而配套 PDF 没有序号，
/// 因此先把末尾的数字（连同可选的连字符）去掉再拼 `.pdf`
pub fn companion_pdf_name(stem: &str) -> String {
    match trailing_number_re().captures(stem) {
        Some(caps) => format!("{}.pdf", &caps[1]),
        None => format!("{}.pdf", stem),
    }
}

/// 配套 PDF 的完整路径（与稿件同目录）
pub fn companion_pdf_path(artwork_path: &Path) -> PathBuf {
    let stem = artwork_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let dir = artwork_path.parent().unwrap_or_else(|| Path::new(""));
    dir.join(companion_pdf_name(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_keyword() {
        let keywords = vec!["banner".to_string(), "lona".to_string()];
        assert!(contains_keyword("Arte-BANNER-01.cdr", &keywords));
        assert!(contains_keyword("pedido-lona.cdr", &keywords));
        assert!(!contains_keyword("adesivo-vinil.cdr", &keywords));
    }

    #[test]
    fn test_companion_pdf_name_strips_page_number() {
        assert_eq!(
            companion_pdf_name("arte-impressao-digital-01"),
            "arte-impressao-digital.pdf"
        );
        assert_eq!(companion_pdf_name("banner2"), "banner.pdf");
        assert_eq!(companion_pdf_name("arte-final"), "arte-final.pdf");
    }

    #[test]
    fn test_companion_pdf_path_same_dir() {
        let p = Path::new("pedidos/123/arte-impressao-digital-03.tif");
        let pdf = companion_pdf_path(p);
        assert!(pdf.ends_with("arte-impressao-digital.pdf"));
        assert_eq!(pdf.parent(), p.parent());
    }
}
