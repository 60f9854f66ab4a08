//! LiftDraft 导出
//!
//! 把图元列表序列化为：
//! - `.dxf` R12 ASCII 交换格式
//! - `.svg` 矢量标记
//! - `.eps` 封装 PostScript（只含线条）
//!
//! 所有导出器都是纯函数：相同输入得到逐字节相同的输出，不修改输入，
//! 不做文件 I/O。某种格式不支持的图元会被跳过，其余照常导出。

pub mod dxf_export;
pub mod error;
pub mod options;
pub mod ps_export;
pub mod svg_export;

pub use dxf_export::DxfExporter;
pub use error::ExportError;
pub use options::{Canvas, ExportFormat, ExportOptions, Margins, Orientation, PaperSize};
pub use ps_export::PostScriptExporter;
pub use svg_export::SvgExporter;

use liftdraft_core::element::{convert_raw, DrawingElement, RawElement};
use liftdraft_core::geometry::Geometry;
use tracing::{debug, trace, warn};

/// 单一格式的导出器
pub trait Exporter {
    /// 输出格式
    fn format(&self) -> ExportFormat;

    /// 序列化图元列表
    fn export(&self, elements: &[DrawingElement], options: &ExportOptions, canvas: Canvas) -> String;
}

/// 获取格式对应的导出器，栅格与 PDF 返回 `None`
pub fn exporter_for(format: ExportFormat) -> Option<&'static dyn Exporter> {
    match format {
        ExportFormat::Dxf => Some(&DxfExporter),
        ExportFormat::Svg => Some(&SvgExporter),
        ExportFormat::Eps => Some(&PostScriptExporter),
        ExportFormat::Pdf | ExportFormat::Png | ExportFormat::Jpg => None,
    }
}

/// 按 `options.format` 导出
pub fn export(
    elements: &[DrawingElement],
    options: &ExportOptions,
    canvas: Canvas,
) -> Result<String, ExportError> {
    let exporter =
        exporter_for(options.format).ok_or(ExportError::UnsupportedFormat(options.format))?;
    let payload = exporter.export(elements, options, canvas);
    debug!(
        format = %options.format,
        elements = elements.len(),
        bytes = payload.len(),
        "export finished"
    );
    Ok(payload)
}

/// 导出编辑器记录，无法转换的记录被跳过
pub fn export_raw(
    records: &[RawElement],
    options: &ExportOptions,
    canvas: Canvas,
) -> Result<String, ExportError> {
    let (elements, errors) = convert_raw(records);
    for err in &errors {
        warn!("skipping record: {}", err);
    }
    export(&elements, options, canvas)
}

/// 导出 JSON 形式的编辑器记录数组
pub fn export_json(
    json: &str,
    options: &ExportOptions,
    canvas: Canvas,
) -> Result<String, ExportError> {
    let records: Vec<RawElement> = serde_json::from_str(json)?;
    export_raw(&records, options, canvas)
}

/// 导出前的公共处理：展开块、按选项去掉标注、丢弃坐标无效的图元
pub(crate) fn drawable(elements: &[DrawingElement], options: &ExportOptions) -> Vec<DrawingElement> {
    let mut result = Vec::with_capacity(elements.len());
    let mut skipped = 0usize;

    for element in elements.iter().flat_map(DrawingElement::flatten) {
        if !options.include_dimensions && element.geometry.is_dimension() {
            continue;
        }
        if !is_well_formed(&element) {
            trace!(id = %element.id, kind = element.kind(), "skipping malformed element");
            skipped += 1;
            continue;
        }
        result.push(element);
    }

    if skipped > 0 {
        debug!(kept = result.len(), skipped, "dropped malformed elements");
    }
    result
}

fn is_well_formed(element: &DrawingElement) -> bool {
    let finite = element
        .points()
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite());
    let arity = match &element.geometry {
        Geometry::Polyline(pl) => pl.points.len() >= 2,
        Geometry::AngularDimension(d) => d.radius.is_finite(),
        _ => true,
    };
    finite && arity
}

/// 格式化坐标：最短可往返的十进制表示，`-0` 写作 `0`
pub(crate) fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// 转义 XML 文本与属性值
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
