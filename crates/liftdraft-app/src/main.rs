//! LiftDraft 命令行入口
//!
//! 读取编辑器导出的图元 JSON，执行导出、标注或修改操作。
//! 文件读写和系统时钟只在这里出现，内核与导出器保持纯函数。

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use liftdraft_core::config::KernelConfig;
use liftdraft_core::dimension::{
    create_angular_dimension, create_linear_dimension, create_radial_dimension,
};
use liftdraft_core::element::{convert_raw, DrawingElement, ElementId, RawElement};
use liftdraft_core::math::{BoundingBox2, Point2};
use liftdraft_core::modify::{
    align_elements, break_element_at_point, chamfer, extend_line_to_intersection_with, fillet,
    mirror_elements, offset_element, polar_array, rectangular_array, stretch_elements, Alignment,
    Outcome, PolarArray, RectangularArray,
};
use liftdraft_export::{export_json, Canvas, ExportFormat, ExportOptions};

#[derive(Parser)]
#[command(name = "liftdraft")]
#[command(about = "2D drafting kernel: dimensions, modifications and export", long_about = None)]
#[command(version)]
struct Cli {
    /// Kernel config file (TOML); defaults to $LIFTDRAFT_CONFIG or ./config/liftdraft.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize an element list to DXF, SVG or EPS
    Export {
        /// Element list (JSON array of editor records)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "svg")]
        format: ExportFormat,

        /// Canvas width
        #[arg(long, default_value = "800")]
        width: f64,

        /// Canvas height
        #[arg(long, default_value = "600")]
        height: f64,

        /// Export options (JSON); `format` on the command line wins
        #[arg(long)]
        options: Option<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a dimension element and print it as JSON
    Dimension {
        #[command(subcommand)]
        kind: DimensionCommand,
    },

    /// Apply a modification to an element list and print the result as JSON
    Transform {
        #[command(subcommand)]
        op: TransformCommand,
    },
}

#[derive(Subcommand)]
enum DimensionCommand {
    /// Distance between two points
    Linear {
        #[arg(long)]
        id: Option<String>,
        #[arg(long, value_parser = parse_point)]
        p1: Point2,
        #[arg(long, value_parser = parse_point)]
        p2: Point2,
        /// Perpendicular offset of the dimension line
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,
    },
    /// Angle at a vertex between two rays
    Angular {
        #[arg(long)]
        id: Option<String>,
        #[arg(long, value_parser = parse_point)]
        vertex: Point2,
        #[arg(long, value_parser = parse_point)]
        p1: Point2,
        #[arg(long, value_parser = parse_point)]
        p2: Point2,
        /// Radius of the dimension arc
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Radius from a center to a point on the circle
    Radial {
        #[arg(long)]
        id: Option<String>,
        #[arg(long, value_parser = parse_point)]
        center: Point2,
        #[arg(long, value_parser = parse_point)]
        point: Point2,
    },
}

/// 修改命令共用的输入输出参数
#[derive(Args)]
struct ListIo {
    /// Element list (JSON array of editor records)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum TransformCommand {
    /// Move every point inside the selection box
    Stretch {
        #[command(flatten)]
        io: ListIo,
        #[arg(long, value_parser = parse_point)]
        from: Point2,
        #[arg(long, value_parser = parse_point)]
        to: Point2,
        /// One corner of the selection box
        #[arg(long, value_parser = parse_point)]
        corner1: Point2,
        /// The opposite corner
        #[arg(long, value_parser = parse_point)]
        corner2: Point2,
    },
    /// Align all elements to a common edge or center line
    Align {
        #[command(flatten)]
        io: ListIo,
        /// left, right, top, bottom, center-h or center-v
        alignment: Alignment,
    },
    /// Reflect elements across an axis
    Mirror {
        #[command(flatten)]
        io: ListIo,
        #[arg(long, value_parser = parse_point)]
        axis_start: Point2,
        #[arg(long, value_parser = parse_point)]
        axis_end: Point2,
        /// Keep the originals and append mirrored copies
        #[arg(long)]
        keep_original: bool,
    },
    /// Append a parallel copy of one element
    Offset {
        #[command(flatten)]
        io: ListIo,
        #[arg(long)]
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        distance: f64,
    },
    /// Copy elements across a grid
    ArrayRect {
        #[command(flatten)]
        io: ListIo,
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        columns: usize,
        #[arg(long, allow_hyphen_values = true)]
        row_spacing: f64,
        #[arg(long, allow_hyphen_values = true)]
        column_spacing: f64,
    },
    /// Copy elements around a center point
    ArrayPolar {
        #[command(flatten)]
        io: ListIo,
        #[arg(long, value_parser = parse_point)]
        center: Point2,
        /// Total item count including the originals
        #[arg(long)]
        count: usize,
        /// Fill angle in degrees
        #[arg(long, default_value = "360", allow_hyphen_values = true)]
        fill_angle: f64,
        #[arg(long)]
        rotate_items: bool,
    },
    /// Split a line in two at a point
    Break {
        #[command(flatten)]
        io: ListIo,
        #[arg(long)]
        id: String,
        #[arg(long, value_parser = parse_point)]
        point: Point2,
        /// Pick tolerance; defaults to the configured snap tolerance
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Extend a line until it meets another line
    Extend {
        #[command(flatten)]
        io: ListIo,
        #[arg(long)]
        id: String,
        #[arg(long)]
        target: String,
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Round the corner between two lines
    Fillet {
        #[command(flatten)]
        io: ListIo,
        #[arg(long)]
        first: String,
        #[arg(long)]
        second: String,
        #[arg(long)]
        radius: f64,
    },
    /// Cut the corner between two lines
    Chamfer {
        #[command(flatten)]
        io: ListIo,
        #[arg(long)]
        first: String,
        #[arg(long)]
        second: String,
        #[arg(long)]
        distance1: f64,
        /// Defaults to distance1
        #[arg(long)]
        distance2: Option<f64>,
    },
}

/// 解析 `x,y` 形式的坐标
fn parse_point(s: &str) -> Result<Point2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x coordinate in '{s}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y coordinate in '{s}'"))?;
    Ok(Point2::new(x, y))
}

fn load_config(path: Option<&Path>) -> Result<KernelConfig> {
    match path {
        Some(path) => KernelConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => KernelConfig::discover().context("discovering config"),
    }
}

fn init_tracing(config: &KernelConfig) {
    // RUST_LOG 优先，其次是配置文件中的级别
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);
    debug!(units = %config.units.symbol(), "config loaded");

    match cli.command {
        Commands::Export {
            input,
            format,
            width,
            height,
            options,
            output,
        } => run_export(
            &input,
            format,
            Canvas::new(width, height),
            options.as_deref(),
            output.as_deref(),
        ),
        Commands::Dimension { kind } => run_dimension(&config, kind),
        Commands::Transform { op } => run_transform(&config, op),
    }
}

fn run_export(
    input: &Path,
    format: ExportFormat,
    canvas: Canvas,
    options_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("reading element list {}", input.display()))?;

    let mut options = match options_path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading export options {}", path.display()))?;
            serde_json::from_str::<ExportOptions>(&content)
                .with_context(|| format!("parsing export options {}", path.display()))?
        }
        None => ExportOptions::default(),
    };
    options.format = format;
    if options.created_at.is_none() {
        options.created_at = Some(Utc::now());
    }

    let payload = export_json(&json, &options, canvas)
        .with_context(|| format!("exporting {}", input.display()))?;
    write_output(output, &payload)?;
    info!(format = %format, bytes = payload.len(), "export written");
    Ok(())
}

fn run_dimension(config: &KernelConfig, kind: DimensionCommand) -> Result<()> {
    let defaults = config.dimension.scaled_to(config.units);
    let style = config.style.clone();
    let element_id = |id: Option<String>| id.map(ElementId::new).unwrap_or_else(ElementId::random);

    let element = match kind {
        DimensionCommand::Linear { id, p1, p2, offset } => create_linear_dimension(
            element_id(id),
            p1,
            p2,
            offset.unwrap_or(defaults.linear_offset),
            style,
        ),
        DimensionCommand::Angular {
            id,
            vertex,
            p1,
            p2,
            radius,
        } => create_angular_dimension(
            element_id(id),
            vertex,
            p1,
            p2,
            radius.unwrap_or(defaults.angular_radius),
            style,
        ),
        DimensionCommand::Radial { id, center, point } => {
            create_radial_dimension(element_id(id), center, point, style)
        }
    };

    info!(id = %element.id, label = ?element.geometry.label(), "dimension created");
    let json = serde_json::to_string_pretty(&RawElement::from(&element))?;
    println!("{json}");
    Ok(())
}

fn run_transform(config: &KernelConfig, op: TransformCommand) -> Result<()> {
    let tolerances = config.effective_tolerances();

    let (io, result) = match op {
        TransformCommand::Stretch {
            io,
            from,
            to,
            corner1,
            corner2,
        } => {
            let elements = read_elements(&io.input)?;
            let selection = BoundingBox2::from_corners(corner1, corner2);
            let result = report("stretch", stretch_elements(&elements, from, to, selection));
            (io, result)
        }
        TransformCommand::Align { io, alignment } => {
            let elements = read_elements(&io.input)?;
            (io, report("align", align_elements(&elements, alignment)))
        }
        TransformCommand::Mirror {
            io,
            axis_start,
            axis_end,
            keep_original,
        } => {
            let elements = read_elements(&io.input)?;
            let result = report(
                "mirror",
                mirror_elements(&elements, axis_start, axis_end, keep_original),
            );
            (io, result)
        }
        TransformCommand::Offset { io, id, distance } => {
            let mut elements = read_elements(&io.input)?;
            let index = find(&elements, &id)?;
            let outcome = offset_element(&elements[index], distance);
            let applied = outcome.is_applied();
            let copy = report("offset", outcome);
            if applied {
                elements.push(copy);
            }
            (io, elements)
        }
        TransformCommand::ArrayRect {
            io,
            rows,
            columns,
            row_spacing,
            column_spacing,
        } => {
            let elements = read_elements(&io.input)?;
            let params = RectangularArray {
                rows,
                columns,
                row_spacing,
                column_spacing,
            };
            (io, report("rectangular array", rectangular_array(&elements, params)))
        }
        TransformCommand::ArrayPolar {
            io,
            center,
            count,
            fill_angle,
            rotate_items,
        } => {
            let elements = read_elements(&io.input)?;
            let params = PolarArray {
                center,
                count,
                fill_angle: (fill_angle / 360.0) * TAU,
                rotate_items,
            };
            (io, report("polar array", polar_array(&elements, params)))
        }
        TransformCommand::Break {
            io,
            id,
            point,
            tolerance,
        } => {
            let mut elements = read_elements(&io.input)?;
            let index = find(&elements, &id)?;
            let tolerance = tolerance.unwrap_or(tolerances.snap);
            let pieces = report(
                "break",
                break_element_at_point(&elements[index], point, tolerance),
            );
            elements.splice(index..=index, pieces);
            (io, elements)
        }
        TransformCommand::Extend {
            io,
            id,
            target,
            tolerance,
        } => {
            let mut elements = read_elements(&io.input)?;
            let index = find(&elements, &id)?;
            let target = &elements[find(&elements, &target)?];
            let extended = report(
                "extend",
                extend_line_to_intersection_with(
                    &elements[index],
                    target,
                    tolerance.unwrap_or(tolerances.snap),
                    tolerances.intersection,
                ),
            );
            elements[index] = extended;
            (io, elements)
        }
        TransformCommand::Fillet {
            io,
            first,
            second,
            radius,
        } => {
            let mut elements = read_elements(&io.input)?;
            let (a, b) = (find(&elements, &first)?, find(&elements, &second)?);
            let result = report("fillet", fillet(&elements[a], &elements[b], radius));
            elements[a] = result.first;
            elements[b] = result.second;
            elements.extend(result.arc);
            (io, elements)
        }
        TransformCommand::Chamfer {
            io,
            first,
            second,
            distance1,
            distance2,
        } => {
            let mut elements = read_elements(&io.input)?;
            let (a, b) = (find(&elements, &first)?, find(&elements, &second)?);
            let result = report(
                "chamfer",
                chamfer(
                    &elements[a],
                    &elements[b],
                    distance1,
                    distance2.unwrap_or(distance1),
                ),
            );
            elements[a] = result.first;
            elements[b] = result.second;
            elements.extend(result.line);
            (io, elements)
        }
    };

    let records: Vec<RawElement> = result.iter().map(RawElement::from).collect();
    let json = serde_json::to_string_pretty(&records)?;
    write_output(io.output.as_deref(), &json)
}

/// 记录操作是否生效并取出结果
fn report<T>(operation: &str, outcome: Outcome<T>) -> T {
    if outcome.is_applied() {
        info!(operation, "applied");
    } else {
        warn!(operation, "input left unchanged");
    }
    outcome.into_inner()
}

fn read_elements(path: &Path) -> Result<Vec<DrawingElement>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading element list {}", path.display()))?;
    let records: Vec<RawElement> = serde_json::from_str(&json)
        .with_context(|| format!("parsing element list {}", path.display()))?;
    let (elements, errors) = convert_raw(&records);
    for err in &errors {
        warn!("skipping record: {}", err);
    }
    Ok(elements)
}

fn find(elements: &[DrawingElement], id: &str) -> Result<usize> {
    match elements.iter().position(|e| e.id.as_str() == id) {
        Some(index) => Ok(index),
        None => bail!("no element with id '{id}'"),
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
