//! 封装 PostScript (EPS) 导出
//!
//! 只输出直线类图元：线段、矩形、多段线，以及线性/半径标注的线条。
//! 圆、圆弧、文字和标注文字不输出，需要完整内容时应选择 DXF 或 SVG。

use crate::options::{Canvas, ExportFormat, ExportOptions};
use crate::{drawable, fmt_num, Exporter};
use chrono::{DateTime, SecondsFormat, Utc};
use liftdraft_core::element::DrawingElement;
use liftdraft_core::geometry::{Geometry, Line};
use liftdraft_core::math::Point2;
use liftdraft_core::properties::Style;
use tracing::trace;

/// `%%Creator` 注释
pub const CREATOR: &str = "liftdraft";

/// PostScript 导出器
#[derive(Debug, Clone, Copy, Default)]
pub struct PostScriptExporter;

impl Exporter for PostScriptExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Eps
    }

    fn export(&self, elements: &[DrawingElement], options: &ExportOptions, canvas: Canvas) -> String {
        let elements = drawable(elements, options);
        let created = options.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        let mut ps = String::new();
        ps.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
        ps.push_str(&format!(
            "%%BoundingBox: 0 0 {} {}\n",
            bounding_extent(canvas.width),
            bounding_extent(canvas.height)
        ));
        ps.push_str(&format!("%%Title: {}\n", single_line(options.display_title())));
        ps.push_str(&format!("%%Creator: {}\n", CREATOR));
        ps.push_str(&format!(
            "%%CreationDate: {}\n",
            created.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        if options.include_metadata {
            if let Some(author) = &options.author {
                ps.push_str(&format!("%%For: {}\n", single_line(author)));
            }
        }
        ps.push_str("%%EndComments\n");

        // 编辑器坐标 y 向下，翻转后原始坐标可以直接写出
        ps.push_str("gsave\n");
        ps.push_str(&format!("0 {} translate\n", fmt_num(canvas.height)));
        ps.push_str("1 -1 scale\n");

        for element in &elements {
            write_element(&mut ps, element);
        }

        ps.push_str("grestore\n");
        ps.push_str("showpage\n");
        ps.push_str("%%EOF\n");
        ps
    }
}

/// 边界框只接受整数，向上取整
fn bounding_extent(value: f64) -> i64 {
    if value.is_finite() && value > 0.0 {
        value.ceil() as i64
    } else {
        0
    }
}

/// DSC 注释不能换行
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn set_style(ps: &mut String, style: &Style) {
    let [r, g, b] = style.stroke_color.to_unit_rgb();
    ps.push_str(&format!(
        "{} {} {} setrgbcolor\n",
        fmt_num(r),
        fmt_num(g),
        fmt_num(b)
    ));
    ps.push_str(&format!("{} setlinewidth\n", fmt_num(style.effective_stroke_width())));
    let dashes: Vec<String> = style.line_type.pattern().iter().map(|v| fmt_num(*v)).collect();
    ps.push_str(&format!("[{}] 0 setdash\n", dashes.join(" ")));
}

fn stroke_path(ps: &mut String, points: &[Point2], closed: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ps.push_str("newpath\n");
    ps.push_str(&format!("{} {} moveto\n", fmt_num(first.x), fmt_num(first.y)));
    for p in rest {
        ps.push_str(&format!("{} {} lineto\n", fmt_num(p.x), fmt_num(p.y)));
    }
    if closed {
        ps.push_str("closepath\n");
    }
    ps.push_str("stroke\n");
}

fn stroke_line(ps: &mut String, line: &Line) {
    stroke_path(ps, &[line.start, line.end], false);
}

fn write_element(ps: &mut String, element: &DrawingElement) {
    let style = &element.style;
    match &element.geometry {
        Geometry::Line(line) => {
            set_style(ps, style);
            stroke_line(ps, line);
        }
        Geometry::Rectangle(rect) => {
            let (origin, width, height) = rect.normalized();
            set_style(ps, style);
            ps.push_str("newpath\n");
            ps.push_str(&format!("{} {} moveto\n", fmt_num(origin.x), fmt_num(origin.y)));
            ps.push_str(&format!("{} 0 rlineto\n", fmt_num(width)));
            ps.push_str(&format!("0 {} rlineto\n", fmt_num(height)));
            ps.push_str(&format!("{} 0 rlineto\n", fmt_num(-width)));
            ps.push_str("closepath\n");
            ps.push_str("stroke\n");
        }
        Geometry::Polyline(polyline) => {
            set_style(ps, style);
            stroke_path(ps, &polyline.points, polyline.closed);
        }
        Geometry::LinearDimension(dim) => {
            set_style(ps, style);
            stroke_line(ps, &Line::new(dim.p1, dim.witness1));
            stroke_line(ps, &Line::new(dim.p2, dim.witness2));
            stroke_line(ps, &Line::new(dim.witness1, dim.witness2));
        }
        Geometry::RadialDimension(dim) => {
            set_style(ps, style);
            stroke_line(ps, &Line::new(dim.center, dim.point));
        }
        Geometry::Circle(_)
        | Geometry::Arc(_)
        | Geometry::Text(_)
        | Geometry::AngularDimension(_)
        | Geometry::Block(_) => {
            trace!(id = %element.id, kind = element.kind(), "not representable in EPS, omitted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use liftdraft_core::geometry::{Circle, Rectangle};
    use liftdraft_core::properties::Color;

    fn options() -> ExportOptions {
        ExportOptions::for_format(ExportFormat::Eps)
    }

    #[test]
    fn test_header_and_trailer() {
        let ps = PostScriptExporter.export(&[], &options(), Canvas::new(800.0, 600.4));
        let lines: Vec<&str> = ps.lines().collect();
        assert_eq!(lines[0], "%!PS-Adobe-3.0 EPSF-3.0");
        assert_eq!(lines[1], "%%BoundingBox: 0 0 800 601");
        assert!(ps.contains("%%Title: drawing\n"));
        assert!(ps.contains("%%Creator: liftdraft\n"));
        assert!(ps.contains("%%CreationDate: 1970-01-01T00:00:00Z\n"));
        assert_eq!(lines.last(), Some(&"%%EOF"));
        assert!(!ps.contains("moveto"));
    }

    #[test]
    fn test_creation_date_from_options() {
        let options = ExportOptions {
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap()),
            ..options()
        };
        let ps = PostScriptExporter.export(&[], &options, Canvas::default());
        assert!(ps.contains("%%CreationDate: 2024-05-17T08:30:00Z\n"));
    }

    #[test]
    fn test_rectangle_is_relative_chain() {
        let rect = DrawingElement::new(
            "r",
            Geometry::Rectangle(Rectangle::new(Point2::new(10.0, 5.0), Point2::new(30.0, 20.0))),
        )
        .with_style(Style::with_color(Color::RED).set_stroke_width(2.0));
        let ps = PostScriptExporter.export(&[rect], &options(), Canvas::default());
        assert!(ps.contains("1 0 0 setrgbcolor\n2 setlinewidth\n[] 0 setdash\n"));
        assert!(ps.contains(
            "newpath\n10 5 moveto\n20 0 rlineto\n0 15 rlineto\n-20 0 rlineto\nclosepath\nstroke\n"
        ));
    }

    #[test]
    fn test_circle_is_omitted() {
        let circle = DrawingElement::new(
            "c",
            Geometry::Circle(Circle::from_radius(Point2::new(5.0, 5.0), 3.0)),
        );
        let line = DrawingElement::new(
            "l",
            Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0))),
        );
        let ps = PostScriptExporter.export(&[circle, line], &options(), Canvas::default());
        assert_eq!(ps.matches("moveto").count(), 1);
        assert!(ps.contains("0 0 moveto\n100 0 lineto\nstroke\n"));
        assert!(!ps.contains("arc"));
    }
}
