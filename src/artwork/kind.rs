use std::path::Path;

/// 稿件类型
///
/// 决定走哪条处理分支：CDR 要做缺字体检查，数码印刷 TIF 要找配套 PDF，
/// 其余位图直接交给处理宏
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtworkKind {
    /// CorelDRAW 源文件
    Cdr,
    /// TIF 位图（可能是数码印刷稿）
    Tiff,
    /// 其他位图（jpg / jpeg / png 等）
    Raster,
}

/// 扩展名到稿件类型的静态映射
static KIND_BY_EXT: phf::Map<&'static str, ArtworkKind> = phf::phf_map! {
    "cdr" => ArtworkKind::Cdr,
    "tif" => ArtworkKind::Tiff,
    "tiff" => ArtworkKind::Tiff,
    "jpg" => ArtworkKind::Raster,
    "jpeg" => ArtworkKind::Raster,
    "png" => ArtworkKind::Raster,
};

impl ArtworkKind {
    /// 从扩展名解析（不区分大小写），未知扩展名按普通位图处理
    pub fn from_extension(ext: &str) -> Self {
        KIND_BY_EXT
            .get(ext.to_lowercase().as_str())
            .copied()
            .unwrap_or(ArtworkKind::Raster)
    }

    /// 从文件路径解析
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(ArtworkKind::Raster)
    }

    pub fn name(self) -> &'static str {
        match self {
            ArtworkKind::Cdr => "CDR",
            ArtworkKind::Tiff => "TIF",
            ArtworkKind::Raster => "位图",
        }
    }
}

impl std::fmt::Display for ArtworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(ArtworkKind::from_extension("cdr"), ArtworkKind::Cdr);
        assert_eq!(ArtworkKind::from_extension("CDR"), ArtworkKind::Cdr);
        assert_eq!(ArtworkKind::from_extension("tif"), ArtworkKind::Tiff);
        assert_eq!(ArtworkKind::from_extension("jpeg"), ArtworkKind::Raster);
        // 未知扩展名回退到位图分支
        assert_eq!(ArtworkKind::from_extension("bmp"), ArtworkKind::Raster);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ArtworkKind::from_path(Path::new(r"Z:\Pedidos\123\arte-banner.CDR")),
            ArtworkKind::Cdr
        );
        assert_eq!(
            ArtworkKind::from_path(Path::new("sem-extensao")),
            ArtworkKind::Raster
        );
    }
}
