//! SVG 导出
//!
//! 根元素的 `width`/`height`/`viewBox` 等于画布尺寸，图元坐标原样写出。

use crate::options::{Canvas, ExportFormat, ExportOptions};
use crate::{drawable, escape_xml, fmt_num, Exporter};
use liftdraft_core::element::DrawingElement;
use liftdraft_core::geometry::{Arc, Geometry, Line};
use liftdraft_core::math::Point2;
use liftdraft_core::properties::Style;
use std::f64::consts::PI;

/// 网格间距
pub const GRID_SPACING: f64 = 50.0;

/// SVG 导出器
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgExporter;

impl Exporter for SvgExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Svg
    }

    fn export(&self, elements: &[DrawingElement], options: &ExportOptions, canvas: Canvas) -> String {
        let elements = drawable(elements, options);
        let width = fmt_num(canvas.width);
        let height = fmt_num(canvas.height);

        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        ));

        if options.include_metadata {
            svg.push_str(&format!("  <title>{}</title>\n", escape_xml(options.display_title())));
            let desc = metadata_description(options);
            if !desc.is_empty() {
                svg.push_str(&format!("  <desc>{}</desc>\n", escape_xml(&desc)));
            }
        }

        if options.include_grid {
            svg.push_str(&grid(canvas));
        }

        for element in &elements {
            svg.push_str(&element_to_svg(element, options));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn metadata_description(options: &ExportOptions) -> String {
    let mut parts = Vec::new();
    if let Some(subject) = &options.subject {
        parts.push(subject.clone());
    }
    if let Some(author) = &options.author {
        parts.push(format!("Author: {}", author));
    }
    if !options.keywords.is_empty() {
        parts.push(format!("Keywords: {}", options.keywords.join(", ")));
    }
    parts.join("; ")
}

/// 覆盖整个画布的网格，线条画在图元之前
fn grid(canvas: Canvas) -> String {
    let mut out = String::from("  <g id=\"grid\" stroke=\"#e0e0e0\" stroke-width=\"0.5\">\n");
    let height = fmt_num(canvas.height);
    let width = fmt_num(canvas.width);

    let columns = (canvas.width / GRID_SPACING).floor().max(0.0) as usize;
    for i in 0..=columns {
        let x = fmt_num(i as f64 * GRID_SPACING);
        out.push_str(&format!(
            "    <line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{height}\"/>\n"
        ));
    }
    let rows = (canvas.height / GRID_SPACING).floor().max(0.0) as usize;
    for i in 0..=rows {
        let y = fmt_num(i as f64 * GRID_SPACING);
        out.push_str(&format!(
            "    <line x1=\"0\" y1=\"{y}\" x2=\"{width}\" y2=\"{y}\"/>\n"
        ));
    }
    out.push_str("  </g>\n");
    out
}

/// 描边与填充属性
fn paint(style: &Style, filled: bool) -> String {
    let mut attrs = format!(
        "stroke=\"{}\" stroke-width=\"{}\"",
        style.stroke_color.to_hex_rgb(),
        fmt_num(style.effective_stroke_width())
    );
    if style.stroke_color.a < 255 {
        attrs.push_str(&format!(" stroke-opacity=\"{}\"", fmt_num(style.stroke_color.opacity())));
    }
    let pattern = style.line_type.pattern();
    if !pattern.is_empty() {
        let dashes: Vec<String> = pattern.iter().map(|v| fmt_num(*v)).collect();
        attrs.push_str(&format!(" stroke-dasharray=\"{}\"", dashes.join(",")));
    }
    match style.fill.filter(|_| filled) {
        Some(fill) => {
            attrs.push_str(&format!(" fill=\"{}\"", fill.to_hex_rgb()));
            if let Some(opacity) = style.fill_opacity {
                attrs.push_str(&format!(" fill-opacity=\"{}\"", fmt_num(opacity.clamp(0.0, 1.0))));
            }
        }
        None => attrs.push_str(" fill=\"none\""),
    }
    attrs
}

fn text_attrs(style: &Style) -> String {
    let mut attrs = format!(
        "font-size=\"{}\" fill=\"{}\"",
        fmt_num(style.effective_font_size()),
        style.stroke_color.to_hex_rgb()
    );
    if let Some(family) = &style.font_family {
        attrs.push_str(&format!(" font-family=\"{}\"", escape_xml(family)));
    }
    attrs
}

/// `head` 为放在最前面的属性（id 等），可为空
fn line_tag(head: &str, line: &Line, paint: &str) -> String {
    format!(
        "<line {}x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {}/>",
        lead(head),
        fmt_num(line.start.x),
        fmt_num(line.start.y),
        fmt_num(line.end.x),
        fmt_num(line.end.y),
        paint
    )
}

fn text_tag(
    head: &str,
    position: &Point2,
    content: &str,
    style: &Style,
    anchor: Option<&str>,
) -> String {
    let anchor = anchor
        .map(|a| format!(" text-anchor=\"{}\"", a))
        .unwrap_or_default();
    format!(
        "<text {}x=\"{}\" y=\"{}\" {}{}>{}</text>",
        lead(head),
        fmt_num(position.x),
        fmt_num(position.y),
        text_attrs(style),
        anchor,
        escape_xml(content)
    )
}

fn lead(head: &str) -> String {
    if head.is_empty() {
        String::new()
    } else {
        format!("{} ", head)
    }
}

/// 圆弧路径，扫掠方向与角度递增方向一致
fn arc_path(arc: &Arc) -> String {
    let r = fmt_num(arc.radius());
    let start = arc.start;
    let end = arc.end_point();
    let sweep = arc.sweep_angle();

    if sweep >= 2.0 * PI - 1e-9 {
        // 整圆：起止点重合时路径为空，拆成两个半圆
        let opposite = Point2::new(2.0 * arc.center.x - start.x, 2.0 * arc.center.y - start.y);
        return format!(
            "M {} {} A {r} {r} 0 1 1 {} {} A {r} {r} 0 1 1 {} {}",
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(opposite.x),
            fmt_num(opposite.y),
            fmt_num(start.x),
            fmt_num(start.y),
        );
    }

    let large = if sweep > PI { 1 } else { 0 };
    format!(
        "M {} {} A {r} {r} 0 {} 1 {} {}",
        fmt_num(start.x),
        fmt_num(start.y),
        large,
        fmt_num(end.x),
        fmt_num(end.y),
    )
}

fn points_attr(points: &[Point2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_to_svg(element: &DrawingElement, options: &ExportOptions) -> String {
    let mut attrs = format!("id=\"{}\"", escape_xml(element.id.as_str()));
    if options.include_layers {
        if let Some(layer) = &element.layer {
            attrs.push_str(&format!(" data-layer=\"{}\"", escape_xml(layer)));
        }
    }
    let style = &element.style;

    match &element.geometry {
        Geometry::Line(line) => format!("  {}\n", line_tag(&attrs, line, &paint(style, false))),
        Geometry::Rectangle(rect) => {
            let (origin, width, height) = rect.normalized();
            format!(
                "  <rect {} x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}/>\n",
                attrs,
                fmt_num(origin.x),
                fmt_num(origin.y),
                fmt_num(width),
                fmt_num(height),
                paint(style, true)
            )
        }
        Geometry::Circle(circle) => format!(
            "  <circle {} cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>\n",
            attrs,
            fmt_num(circle.center.x),
            fmt_num(circle.center.y),
            fmt_num(circle.radius()),
            paint(style, true)
        ),
        Geometry::Arc(arc) => format!(
            "  <path {} d=\"{}\" {}/>\n",
            attrs,
            arc_path(arc),
            paint(style, false)
        ),
        Geometry::Polyline(polyline) => {
            let tag = if polyline.closed { "polygon" } else { "polyline" };
            format!(
                "  <{} {} points=\"{}\" {}/>\n",
                tag,
                attrs,
                points_attr(&polyline.points),
                paint(style, polyline.closed)
            )
        }
        Geometry::Text(text) => format!(
            "  {}\n",
            text_tag(&attrs, &text.position, &text.content, style, None)
        ),
        Geometry::LinearDimension(dim) => {
            let stroke = paint(style, false);
            let parts = [
                line_tag("", &Line::new(dim.p1, dim.witness1), &stroke),
                line_tag("", &Line::new(dim.p2, dim.witness2), &stroke),
                line_tag("", &Line::new(dim.witness1, dim.witness2), &stroke),
                text_tag("", &dim.text_position(), &dim.display_text(), style, Some("middle")),
            ];
            dimension_group(&attrs, &parts)
        }
        Geometry::AngularDimension(dim) => {
            let parts = [
                format!("<path d=\"{}\" {}/>", arc_path(&dim.arc()), paint(style, false)),
                text_tag("", &dim.text_position(), &dim.display_text(), style, Some("middle")),
            ];
            dimension_group(&attrs, &parts)
        }
        Geometry::RadialDimension(dim) => {
            let parts = [
                line_tag("", &Line::new(dim.center, dim.point), &paint(style, false)),
                text_tag("", &dim.text_position(), &dim.display_text(), style, Some("middle")),
            ];
            dimension_group(&attrs, &parts)
        }
        Geometry::Block(_) => String::new(),
    }
}

fn dimension_group(attrs: &str, parts: &[String]) -> String {
    let mut out = format!("  <g {} class=\"dimension\">\n", attrs);
    for part in parts {
        out.push_str(&format!("    {}\n", part));
    }
    out.push_str("  </g>\n");
    out
}
