// ==========================================
// IPC 报价数量监控系统 - 领域类型定义
// ==========================================
// 职责: 月份键、临界等级、临界筛选项
// 红线: 临界等级只对"非例外、非空"数值有意义
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 月份 (Month)
// ==========================================
// 宽表的列键, 文本格式 MM/YYYY, 按时间先后排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// 创建月份（month 必须在 1..=12）
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// 常量构造, 仅用于编译期已知的合法月份
    pub(crate) const fn from_parts(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// 解析严格的 MM/YYYY 文本
    pub fn parse(text: &str) -> Option<Self> {
        let (mm, yyyy) = text.trim().split_once('/')?;
        if mm.len() != 2 || yyyy.len() != 4 {
            return None;
        }
        if !mm.chars().all(|c| c.is_ascii_digit()) || !yyyy.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let month: u32 = mm.parse().ok()?;
        let year: i32 = yyyy.parse().ok()?;
        Self::new(year, month)
    }

    /// 所在日期的月份
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 月份第一天
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::parse(s).ok_or_else(|| format!("mês inválido (esperado MM/AAAA): {}", s))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ==========================================
// 临界等级 (Criticality Band)
// ==========================================
// 依据报价数量划分: ≤25 / 26-55 / 56-100 / >100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CriticalityBand {
    #[serde(rename = "SuperCrítico")]
    SuperCritico, // 极度不足
    #[serde(rename = "Crítico")]
    Critico, // 不足
    #[serde(rename = "Aceitável")]
    Aceitavel, // 可接受
    #[serde(rename = "Suficiente")]
    Suficiente, // 充足
}

impl CriticalityBand {
    /// 全部等级（由低到高）
    pub const ALL: [CriticalityBand; 4] = [
        CriticalityBand::SuperCritico,
        CriticalityBand::Critico,
        CriticalityBand::Aceitavel,
        CriticalityBand::Suficiente,
    ];

    /// 展示名称（同时也是汇总表列名）
    pub fn label(&self) -> &'static str {
        match self {
            CriticalityBand::SuperCritico => "SuperCrítico",
            CriticalityBand::Critico => "Crítico",
            CriticalityBand::Aceitavel => "Aceitável",
            CriticalityBand::Suficiente => "Suficiente",
        }
    }

    /// 图例说明
    pub fn description(&self) -> &'static str {
        match self {
            CriticalityBand::SuperCritico => "Qtd de cotações abaixo ou igual a 25",
            CriticalityBand::Critico => "Qtd de cotações entre 26 e 55",
            CriticalityBand::Aceitavel => "Qtd de cotações entre 56 e 100",
            CriticalityBand::Suficiente => "Qtd de cotações acima de 100",
        }
    }

    /// 单元格底色（十六进制 RGB）
    pub fn color(&self) -> u32 {
        match self {
            CriticalityBand::SuperCritico => 0xFF4D4D,
            CriticalityBand::Critico => 0xFFA500,
            CriticalityBand::Aceitavel => 0xFCDA51,
            CriticalityBand::Suficiente => 0x66CC66,
        }
    }

    /// 单元格字体颜色
    pub fn font_color(&self) -> u32 {
        match self {
            CriticalityBand::Aceitavel => 0x000000,
            _ => 0xFFFFFF,
        }
    }
}

impl fmt::Display for CriticalityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// 例外项的展示颜色（灰底白字）
pub const EXCEPTION_COLOR: u32 = 0x808080;

/// 例外标签（筛选项）
pub const EXCEPTION_LABEL: &str = "Exceção";

/// 例外计数列名（汇总表）
pub const EXCEPTION_COUNT_LABEL: &str = "Excessão";

/// 例外图例说明
pub const EXCEPTION_DESCRIPTION: &str = "Itens que não entram no cálculo do IPC";

// ==========================================
// 临界筛选项 (Criticality Option)
// ==========================================
// 明细筛选: 四个等级 + 例外
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CriticalityOption {
    Band(CriticalityBand),
    Exception,
}

impl fmt::Display for CriticalityOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriticalityOption::Band(band) => f.write_str(band.label()),
            CriticalityOption::Exception => f.write_str(EXCEPTION_LABEL),
        }
    }
}

impl FromStr for CriticalityOption {
    type Err = String;

    /// 接受带/不带重音、大小写不敏感的写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_accents(s.trim()).to_lowercase();
        match folded.as_str() {
            "supercritico" | "super-critico" | "super_critico" => {
                Ok(CriticalityOption::Band(CriticalityBand::SuperCritico))
            }
            "critico" => Ok(CriticalityOption::Band(CriticalityBand::Critico)),
            "aceitavel" => Ok(CriticalityOption::Band(CriticalityBand::Aceitavel)),
            "suficiente" => Ok(CriticalityOption::Band(CriticalityBand::Suficiente)),
            "excecao" | "excessao" => Ok(CriticalityOption::Exception),
            _ => Err(format!(
                "criticidade inválida: {} (use SuperCrítico, Crítico, Aceitável, Suficiente ou Exceção)",
                s
            )),
        }
    }
}

// 去掉葡语常见重音
fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'a',
            'é' | 'ê' | 'É' | 'Ê' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'o',
            'ú' | 'Ú' => 'u',
            'ç' | 'Ç' => 'c',
            other => other,
        })
        .collect()
}
