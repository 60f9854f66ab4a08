//! LiftDraft 二维绘图几何内核
//!
//! 提供图元模型、标注构造和修改操作，供编辑器与导出器调用。
//!
//! # 架构设计
//!
//! - `DrawingElement`: 图元（ID + 几何 + 样式 + 图层）
//! - `Geometry`: 闭合的几何和类型，点是唯一的数据来源
//! - `modify`: 纯函数修改操作，结果用 `Outcome` 区分是否生效
//!
//! 内核不持有状态、不做 I/O，默认值与容差通过 [`config::KernelConfig`] 传入。
//!
//! # 示例
//!
//! ```rust
//! use liftdraft_core::prelude::*;
//!
//! let dim = create_linear_dimension(
//!     "d1",
//!     Point2::origin(),
//!     Point2::new(100.0, 0.0),
//!     10.0,
//!     Style::default(),
//! );
//! assert_eq!(dim.geometry.label().as_deref(), Some("100.00"));
//! ```

pub mod config;
pub mod dimension;
pub mod element;
pub mod geometry;
pub mod math;
pub mod modify;
pub mod properties;
pub mod transform;
pub mod units;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::config::KernelConfig;
    pub use crate::dimension::{
        create_angular_dimension, create_linear_dimension, create_radial_dimension,
    };
    pub use crate::element::{DrawingElement, ElementId, RawElement};
    pub use crate::geometry::{
        AngularDimension, Arc, Block, Circle, Geometry, LinearDimension, Line, Polyline,
        RadialDimension, Rectangle, Text,
    };
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::modify::Outcome;
    pub use crate::properties::{Color, LineType, Style};
    pub use crate::transform::Transform2D;
    pub use crate::units::{Tolerances, Unit};
}
