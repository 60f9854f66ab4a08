//! 导出选项

use chrono::{DateTime, Utc};
use liftdraft_core::units::Unit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// DXF R12 交换格式
    Dxf,
    /// SVG 矢量标记
    Svg,
    /// 封装 PostScript
    #[serde(alias = "ps", alias = "postscript")]
    Eps,
    Pdf,
    Png,
    Jpg,
}

impl ExportFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Dxf => "dxf",
            ExportFormat::Svg => "svg",
            ExportFormat::Eps => "eps",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
        }
    }

    /// 是否由本 crate 输出；栅格和 PDF 由渲染端负责
    pub fn is_supported(&self) -> bool {
        matches!(self, ExportFormat::Dxf | ExportFormat::Svg | ExportFormat::Eps)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dxf" => Ok(ExportFormat::Dxf),
            "svg" => Ok(ExportFormat::Svg),
            "eps" | "ps" | "postscript" => Ok(ExportFormat::Eps),
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpg),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// 纸张大小
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    A3,
    A2,
    A1,
    A0,
    Letter,
    Legal,
    Tabloid,
    Custom { width: f64, height: f64 },
}

impl PaperSize {
    /// 获取纸张尺寸（毫米）
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A2 => (420.0, 594.0),
            PaperSize::A1 => (594.0, 841.0),
            PaperSize::A0 => (841.0, 1189.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// 纸张方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// 页边距（毫米）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
            left: 10.0,
        }
    }
}

/// 编辑器传入的导出选项
///
/// 未列出的字段取默认值，编辑器只需要传它改过的部分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// 不含扩展名的文件名
    pub filename: String,
    /// 栅格质量 (0, 1]，仅供渲染端使用
    pub quality: f64,
    /// 栅格分辨率（DPI），仅供渲染端使用
    pub resolution: u32,
    pub scale: f64,
    /// 写入 DXF `$INSUNITS`，坐标本身不换算
    pub units: Unit,
    pub include_metadata: bool,
    pub include_layers: bool,
    pub include_grid: bool,
    pub include_dimensions: bool,
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: Margins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    /// EPS 头部的创建时间；为空时写入 Unix 纪元，保证输出可复现
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Svg,
            filename: "drawing".to_string(),
            quality: 0.92,
            resolution: 300,
            scale: 1.0,
            units: Unit::Millimeter,
            include_metadata: true,
            include_layers: true,
            include_grid: false,
            include_dimensions: true,
            paper_size: PaperSize::A4,
            orientation: Orientation::Landscape,
            margins: Margins::default(),
            author: None,
            title: None,
            subject: None,
            keywords: Vec::new(),
            created_at: None,
        }
    }
}

impl ExportOptions {
    /// 指定格式的默认选项
    pub fn for_format(format: ExportFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// 带扩展名的文件名
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.format.extension())
    }

    /// 文档标题，未设置时使用文件名
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.filename)
    }

    /// 去掉边距后的可打印区域（毫米）
    pub fn printable_size(&self) -> (f64, f64) {
        let (paper_w, paper_h) = self.paper_size.dimensions_mm();
        let (w, h) = match self.orientation {
            Orientation::Portrait => (paper_w, paper_h),
            Orientation::Landscape => (paper_h, paper_w),
        };
        (
            w - self.margins.left - self.margins.right,
            h - self.margins.top - self.margins.bottom,
        )
    }
}

/// 画布尺寸（编辑器像素，与图元坐标同一单位）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
