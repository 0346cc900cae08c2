// ==========================================
// IPC 报价数量监控系统 - 例外登记
// ==========================================
// 职责: 不参与 IPC 临界计算的商品描述集合
// 生命周期: 每次上传例外文件时整体替换
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRegistry {
    descriptions: BTreeSet<String>,
}

impl ExceptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否为例外商品（按描述精确匹配, 忽略首尾空白）
    pub fn contains(&self, description: &str) -> bool {
        self.descriptions.contains(description.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.descriptions.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExceptionRegistry {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let descriptions = iter
            .into_iter()
            .map(|d| d.as_ref().trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        Self { descriptions }
    }
}
