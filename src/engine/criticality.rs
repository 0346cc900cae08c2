// ==========================================
// IPC 报价数量监控系统 - 临界等级判定
// ==========================================
// 规则: ≤25 SuperCrítico / 26-55 Crítico / 56-100 Aceitável / >100 Suficiente
// 红线: 例外项在调用前判定, 不进入本函数
// ==========================================

use crate::domain::types::CriticalityBand;

/// 将报价数量映射为临界等级
///
/// # 返回
/// - None: 值缺失、非有限数、负数，或落在两个等级之间的小数（如 25.5）
pub fn classify(value: Option<f64>) -> Option<CriticalityBand> {
    let v = value?;
    if !v.is_finite() || v < 0.0 {
        return None;
    }

    if v <= 25.0 {
        Some(CriticalityBand::SuperCritico)
    } else if (26.0..=55.0).contains(&v) {
        Some(CriticalityBand::Critico)
    } else if (56.0..=100.0).contains(&v) {
        Some(CriticalityBand::Aceitavel)
    } else if v > 100.0 {
        Some(CriticalityBand::Suficiente)
    } else {
        None
    }
}
