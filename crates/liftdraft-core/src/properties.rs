//! 图元样式
//!
//! 包含颜色、线型、线宽、填充和字体等视觉属性。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA颜色
///
/// 序列化为 `#rrggbb`（不透明）或 `#rrggbbaa`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// 颜色字符串解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color `{0}`: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ParseColorError(pub String);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 从十六进制值创建（如 0xFF0000 表示红色）
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 255,
        }
    }

    /// 解析 `#rgb` / `#rrggbb` / `#rrggbbaa`
    pub fn parse(s: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2).ok_or_else(err)?, 16).map_err(|_| err());

        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    hex.get(i..i + 1)
                        .and_then(|c| u8::from_str_radix(c, 16).ok())
                        .map(|v| v * 17)
                        .ok_or_else(err)
                };
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::with_alpha(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    /// `#rrggbb` 形式（忽略透明度）
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// 转换为 [0.0, 1.0] 范围的 RGB 分量
    pub fn to_unit_rgb(&self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// 透明度，范围 [0.0, 1.0]
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// 最接近的 AutoCAD 颜色索引 (ACI)
    ///
    /// 只识别标准色，其余一律映射为 7（白/黑，随背景反色）。
    pub fn to_aci(&self) -> i16 {
        match (self.r, self.g, self.b) {
            (255, 0, 0) => 1,
            (255, 255, 0) => 2,
            (0, 255, 0) => 3,
            (0, 255, 255) => 4,
            (0, 0, 255) => 5,
            (255, 0, 255) => 6,
            (128, 128, 128) => 8,
            _ => 7,
        }
    }

    // 预定义颜色
    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const GRAY: Color = Color::new(128, 128, 128);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        if color.a == 255 {
            color.to_hex_rgb()
        } else {
            format!("{}{:02x}", color.to_hex_rgb(), color.a)
        }
    }
}

/// 线型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// 实线
    #[default]
    Solid,
    /// 虚线
    Dashed,
    /// 点线
    Dotted,
}

impl LineType {
    /// 获取线型的模式数据（画线长度、空白长度交替）
    pub fn pattern(&self) -> &'static [f64] {
        match self {
            LineType::Solid => &[],
            LineType::Dashed => &[12.0, 6.0],
            LineType::Dotted => &[2.0, 4.0],
        }
    }

    /// 计算线型的总长度（一个重复单元）
    pub fn pattern_length(&self) -> f64 {
        self.pattern().iter().sum()
    }
}

/// 图元的视觉属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// 描边颜色
    pub stroke_color: Color,
    /// 描边宽度（必须为正）
    pub stroke_width: f64,
    /// 填充颜色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// 填充透明度 [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    /// 线型
    #[serde(default)]
    pub line_type: LineType,
    /// 字号（文字与标注）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// 字体
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            fill: None,
            fill_opacity: None,
            line_type: LineType::Solid,
            font_size: None,
            font_family: None,
        }
    }
}

impl Style {
    /// 默认字号
    pub const DEFAULT_FONT_SIZE: f64 = 12.0;

    /// 创建带有指定颜色的样式
    pub fn with_color(color: Color) -> Self {
        Self {
            stroke_color: color,
            ..Default::default()
        }
    }

    /// 设置描边宽度
    pub fn set_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// 设置线型
    pub fn set_line_type(mut self, line_type: LineType) -> Self {
        self.line_type = line_type;
        self
    }

    /// 设置填充
    pub fn set_fill(mut self, fill: Color, opacity: Option<f64>) -> Self {
        self.fill = Some(fill);
        self.fill_opacity = opacity;
        self
    }

    /// 设置字号
    pub fn set_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// 实际字号（未设置时取默认值）
    pub fn effective_font_size(&self) -> f64 {
        self.font_size.filter(|s| *s > 0.0).unwrap_or(Self::DEFAULT_FONT_SIZE)
    }

    /// 实际描边宽度（非正值按 1 处理）
    pub fn effective_stroke_width(&self) -> f64 {
        if self.stroke_width > 0.0 {
            self.stroke_width
        } else {
            1.0
        }
    }
}
