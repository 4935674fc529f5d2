//! 热文件夹扫描
//!
//! 每个合格的订单子文件夹最多产出一个候选稿件

pub mod walker;

pub use walker::{collect_candidates, Candidate, ScanError};
