// ==========================================
// IPC 报价数量监控系统 - 上传批次
// ==========================================
// 用途: 记录每次上传的元信息（historico_uploads 表）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 上传类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadKind {
    Quotations, // 报价文件
    Exceptions, // 例外文件
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadKind::Quotations => write!(f, "QUOTATIONS"),
            UploadKind::Exceptions => write!(f, "EXCEPTIONS"),
        }
    }
}

impl FromStr for UploadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "QUOTATIONS" => Ok(UploadKind::Quotations),
            "EXCEPTIONS" => Ok(UploadKind::Exceptions),
            other => Err(format!("tipo de upload desconhecido: {}", other)),
        }
    }
}

// ==========================================
// UploadBatch - 上传批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadBatch {
    pub batch_id: String,           // 批次 ID（UUID）
    pub kind: UploadKind,           // 上传类型
    pub file_name: Option<String>,  // 源文件名
    pub uploaded_at: DateTime<Utc>, // 上传时间
    pub row_count: usize,           // 解析出的行数
    pub months_added: Vec<String>,  // 新增月份列（MM/YYYY）
    pub unmatched_rows: usize,      // 合并时被丢弃的新商品行
}
