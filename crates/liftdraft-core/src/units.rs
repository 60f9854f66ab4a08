//! 单位系统与容差
//!
//! 几何内核本身不做单位换算：坐标按文档单位原样存储和导出。
//! 单位只用来缩放数值容差，使同一张图纸换成米或英尺时
//! “多近算重合”的判断仍然成立。

use crate::math::{EPSILON, INTERSECTION_EPSILON};
use serde::{Deserialize, Serialize};

/// 文档单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    /// 毫米 (默认)
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
    /// 厘米
    #[serde(rename = "cm")]
    Centimeter,
    /// 米
    #[serde(rename = "m")]
    Meter,
    /// 英寸
    #[serde(rename = "in")]
    Inch,
    /// 英尺 (12 英寸)
    #[serde(rename = "ft")]
    Foot,
}

impl Unit {
    /// 获取单位到毫米的转换因子
    pub fn to_mm_factor(&self) -> f64 {
        match self {
            Unit::Millimeter => 1.0,
            Unit::Centimeter => 10.0,
            Unit::Meter => 1000.0,
            Unit::Inch => 25.4,
            Unit::Foot => 304.8,
        }
    }

    /// 是否是公制单位
    pub fn is_metric(&self) -> bool {
        matches!(self, Unit::Millimeter | Unit::Centimeter | Unit::Meter)
    }

    /// 获取单位符号
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::Inch => "in",
            Unit::Foot => "ft",
        }
    }

    /// DXF `$INSUNITS` 代码
    pub fn dxf_code(&self) -> i32 {
        match self {
            Unit::Inch => 1,
            Unit::Foot => 2,
            Unit::Millimeter => 4,
            Unit::Centimeter => 5,
            Unit::Meter => 6,
        }
    }

    /// 从字符串解析单位
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Some(Unit::Millimeter),
            "cm" | "centimeter" | "centimeters" => Some(Unit::Centimeter),
            "m" | "meter" | "meters" => Some(Unit::Meter),
            "in" | "inch" | "inches" | "\"" => Some(Unit::Inch),
            "ft" | "foot" | "feet" | "'" => Some(Unit::Foot),
            _ => None,
        }
    }
}

/// 单位转换
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    value * from.to_mm_factor() / to.to_mm_factor()
}

/// 几何操作使用的数值容差
///
/// 默认值以毫米为基准，用 [`Tolerances::for_unit`] 换算到其他单位。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// 直线求交分母阈值（面积量纲）
    pub intersection: f64,
    /// 打断/延伸时的拾取容差
    pub snap: f64,
    /// 零长度判断
    pub geometry: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            intersection: INTERSECTION_EPSILON,
            snap: 1.0,
            geometry: EPSILON,
        }
    }
}

impl Tolerances {
    /// 以毫米默认值换算到指定单位
    pub fn for_unit(unit: Unit) -> Self {
        Self::default().scaled_to(unit)
    }

    /// 把当前（毫米）容差换算到指定单位
    pub fn scaled_to(&self, unit: Unit) -> Self {
        let factor = unit.to_mm_factor();
        Self {
            intersection: self.intersection / (factor * factor),
            snap: self.snap / factor,
            geometry: self.geometry / factor,
        }
    }
}
