//! 稿件模型层
//!
//! 只描述"一份稿件是什么"：类型分类与文件名约定，不碰 COM、不碰流程

pub mod kind;
pub mod naming;

pub use kind::ArtworkKind;
