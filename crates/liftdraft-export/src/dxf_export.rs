//! DXF R12 ASCII 导出
//!
//! 按组码/值成对输出，每个段和实体以组码 0 开头：
//! HEADER（版本、单位、范围）、TABLES（线型表、图层表）、ENTITIES、EOF。
//! 矩形、多段线和标注都拆成 LINE / ARC / TEXT，R12 读取器都能识别。

use crate::options::{Canvas, ExportFormat, ExportOptions};
use crate::{drawable, fmt_num, Exporter};
use liftdraft_core::element::DrawingElement;
use liftdraft_core::geometry::{Arc, Geometry, Line};
use liftdraft_core::math::{BoundingBox2, Point2};
use liftdraft_core::properties::{LineType, Style};
use std::collections::BTreeSet;
use std::fmt::Display;

/// 默认图层
const DEFAULT_LAYER: &str = "0";

/// 图层名中不允许出现的字符
const LAYER_RESERVED: &[char] = &[
    '<', '>', '/', '\\', '"', ':', ';', '?', '*', '|', '=', ',', '`',
];

/// 组码值占一行，换行会打乱后续的组码/值配对
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// 图层名：保留字符和控制字符替换为 `_`，空名落到默认图层
fn layer_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_control() || LAYER_RESERVED.contains(&c) { '_' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        DEFAULT_LAYER.to_string()
    } else {
        cleaned
    }
}

/// DXF 导出器
#[derive(Debug, Clone, Copy, Default)]
pub struct DxfExporter;

impl Exporter for DxfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Dxf
    }

    fn export(&self, elements: &[DrawingElement], options: &ExportOptions, canvas: Canvas) -> String {
        let elements = drawable(elements, options);
        let mut writer = DxfWriter::default();

        if options.include_metadata {
            writer.pair(999, single_line(&format!("{} (liftdraft)", options.display_title())));
            if let Some(author) = &options.author {
                writer.pair(999, single_line(author));
            }
        }

        write_header(&mut writer, &elements, options, canvas);
        write_tables(&mut writer, &elements, options);

        writer.section("ENTITIES");
        for element in &elements {
            write_entity(&mut writer, element, options);
        }
        writer.end_section();

        writer.pair(0, "EOF");
        writer.finish()
    }
}

/// 组码/值写入器
#[derive(Default)]
struct DxfWriter {
    out: String,
}

impl DxfWriter {
    fn pair(&mut self, code: i32, value: impl Display) {
        self.out.push_str(&format!("{}\n{}\n", code, value));
    }

    fn point(&mut self, code: i32, point: &Point2) {
        self.pair(code, fmt_num(point.x));
        self.pair(code + 10, fmt_num(point.y));
    }

    fn section(&mut self, name: &str) {
        self.pair(0, "SECTION");
        self.pair(2, name);
    }

    fn end_section(&mut self) {
        self.pair(0, "ENDSEC");
    }

    fn finish(self) -> String {
        self.out
    }
}

fn write_header(
    writer: &mut DxfWriter,
    elements: &[DrawingElement],
    options: &ExportOptions,
    canvas: Canvas,
) {
    let extents = elements
        .iter()
        .map(|element| element.geometry.extents())
        .fold(BoundingBox2::empty(), |acc, bbox| acc.union(&bbox));
    let extents = if extents.is_empty() {
        BoundingBox2::new(Point2::origin(), Point2::new(canvas.width, canvas.height))
    } else {
        extents
    };

    writer.section("HEADER");
    writer.pair(9, "$ACADVER");
    writer.pair(1, "AC1009");
    writer.pair(9, "$INSUNITS");
    writer.pair(70, options.units.dxf_code());
    writer.pair(9, "$EXTMIN");
    writer.point(10, &extents.min);
    writer.pair(9, "$EXTMAX");
    writer.point(10, &extents.max);
    writer.end_section();
}

fn write_tables(writer: &mut DxfWriter, elements: &[DrawingElement], options: &ExportOptions) {
    writer.section("TABLES");

    let line_types = [LineType::Solid, LineType::Dashed, LineType::Dotted];
    writer.pair(0, "TABLE");
    writer.pair(2, "LTYPE");
    writer.pair(70, line_types.len());
    for line_type in line_types {
        let pattern = line_type.pattern();
        writer.pair(0, "LTYPE");
        writer.pair(2, line_type_name(line_type));
        writer.pair(70, 0);
        writer.pair(3, line_type_description(line_type));
        writer.pair(72, 65);
        writer.pair(73, pattern.len());
        writer.pair(40, fmt_num(line_type.pattern_length()));
        // 奇数位是空白，DXF 用负数表示
        for (i, length) in pattern.iter().enumerate() {
            let length = if i % 2 == 1 { -length } else { *length };
            writer.pair(49, fmt_num(length));
        }
    }
    writer.pair(0, "ENDTAB");

    let mut layers = BTreeSet::new();
    layers.insert(DEFAULT_LAYER.to_string());
    if options.include_layers {
        layers.extend(elements.iter().filter_map(|e| e.layer.as_deref().map(layer_name)));
    }

    writer.pair(0, "TABLE");
    writer.pair(2, "LAYER");
    writer.pair(70, layers.len());
    for layer in &layers {
        writer.pair(0, "LAYER");
        writer.pair(2, layer);
        writer.pair(70, 0);
        writer.pair(62, 7);
        writer.pair(6, "CONTINUOUS");
    }
    writer.pair(0, "ENDTAB");

    writer.end_section();
}

fn line_type_name(line_type: LineType) -> &'static str {
    match line_type {
        LineType::Solid => "CONTINUOUS",
        LineType::Dashed => "DASHED",
        LineType::Dotted => "DOT",
    }
}

fn line_type_description(line_type: LineType) -> &'static str {
    match line_type {
        LineType::Solid => "Solid line",
        LineType::Dashed => "Dashed __ __ __",
        LineType::Dotted => "Dotted . . . .",
    }
}

/// 单个图元的公共组码：图层、线型、颜色
struct EntityStyle<'a> {
    layer: &'a str,
    style: &'a Style,
}

impl EntityStyle<'_> {
    fn begin(&self, writer: &mut DxfWriter, kind: &str) {
        writer.pair(0, kind);
        writer.pair(8, self.layer);
        if self.style.line_type != LineType::Solid {
            writer.pair(6, line_type_name(self.style.line_type));
        }
        writer.pair(62, self.style.stroke_color.to_aci());
    }

    fn line(&self, writer: &mut DxfWriter, line: &Line) {
        self.begin(writer, "LINE");
        writer.point(10, &line.start);
        writer.point(11, &line.end);
    }

    fn circle(&self, writer: &mut DxfWriter, center: &Point2, radius: f64) {
        self.begin(writer, "CIRCLE");
        writer.point(10, center);
        writer.pair(40, fmt_num(radius));
    }

    fn arc(&self, writer: &mut DxfWriter, arc: &Arc) {
        self.begin(writer, "ARC");
        writer.point(10, &arc.center);
        writer.pair(40, fmt_num(arc.radius()));
        writer.pair(50, fmt_num(arc.start_angle().to_degrees()));
        writer.pair(51, fmt_num(arc.end_angle().to_degrees()));
    }

    fn text(&self, writer: &mut DxfWriter, position: &Point2, content: &str) {
        self.begin(writer, "TEXT");
        writer.point(10, position);
        writer.pair(40, fmt_num(self.style.effective_font_size()));
        // R12 文本为单行
        writer.pair(1, single_line(content));
    }
}

fn write_entity(writer: &mut DxfWriter, element: &DrawingElement, options: &ExportOptions) {
    let layer = match element.layer.as_deref() {
        Some(name) if options.include_layers => layer_name(name),
        _ => DEFAULT_LAYER.to_string(),
    };
    let entity = EntityStyle {
        layer: &layer,
        style: &element.style,
    };

    match &element.geometry {
        Geometry::Line(line) => entity.line(writer, line),
        Geometry::Rectangle(rect) => {
            for edge in rect.edges() {
                entity.line(writer, &edge);
            }
        }
        Geometry::Circle(circle) => entity.circle(writer, &circle.center, circle.radius()),
        Geometry::Arc(arc) => entity.arc(writer, arc),
        Geometry::Polyline(polyline) => {
            for segment in polyline.segments() {
                entity.line(writer, &segment);
            }
        }
        Geometry::Text(text) => entity.text(writer, &text.position, &text.content),
        Geometry::LinearDimension(dim) => {
            entity.line(writer, &Line::new(dim.p1, dim.witness1));
            entity.line(writer, &Line::new(dim.p2, dim.witness2));
            entity.line(writer, &Line::new(dim.witness1, dim.witness2));
            entity.text(writer, &dim.text_position(), &dim.display_text());
        }
        Geometry::AngularDimension(dim) => {
            entity.arc(writer, &dim.arc());
            entity.text(writer, &dim.text_position(), &dim.display_text());
        }
        Geometry::RadialDimension(dim) => {
            entity.line(writer, &Line::new(dim.center, dim.point));
            entity.text(writer, &dim.text_position(), &dim.display_text());
        }
        // 块在导出前已展开
        Geometry::Block(_) => {}
    }
}
