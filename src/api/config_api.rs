// ==========================================
// IPC 报价数量监控系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新
// ==========================================

use crate::api::error::ApiResult;
use crate::config::{config_keys, ConfigEntry, ConfigManager};
use crate::i18n;
use std::sync::Arc;
use tracing::info;

pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询所有配置（含默认值）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigEntry>> {
        Ok(self.config_manager.list()?)
    }

    /// 更新配置
    ///
    /// # 返回
    /// - Ok(ConfigEntry): 规范化后的生效值
    /// - Err(InvalidInput): 未知键或非法值
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<ConfigEntry> {
        let stored = self.config_manager.set_global_config_value(key, value)?;
        if key == config_keys::LOCALE {
            i18n::set_locale(&stored);
        }
        info!(key = key, "配置更新完成");
        Ok(ConfigEntry {
            key: key.to_string(),
            value: stored,
            is_default: false,
        })
    }

    /// 应用已存储的界面语言
    pub fn apply_locale(&self) -> ApiResult<String> {
        let locale = self.config_manager.locale()?;
        i18n::set_locale(&locale);
        Ok(locale)
    }
}
