//! 内核配置
//!
//! 默认颜色、标注偏移和数值容差都通过配置传入入口函数，而不是写死在模块里。
//! 配置文件为 TOML，缺失的字段取默认值。

use crate::properties::Style;
use crate::units::{Tolerances, Unit};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件所在的环境变量
pub const CONFIG_ENV: &str = "LIFTDRAFT_CONFIG";

/// 内核配置的根结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// 文档单位
    pub units: Unit,
    /// 以毫米为基准的容差，使用前按 `units` 换算
    pub tolerances: Tolerances,
    /// 新建图元的默认样式
    pub style: Style,
    pub dimension: DimensionDefaults,
    pub logging: LoggingConfig,
}

impl KernelConfig {
    /// 从显式路径加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `LIFTDRAFT_CONFIG`，
    /// 否则寻找 `./config/liftdraft.toml`，都不存在时返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("liftdraft.toml"))
            .map_err(|source| ConfigError::Io {
                path: PathBuf::from("."),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// 换算到文档单位后的容差
    pub fn effective_tolerances(&self) -> Tolerances {
        self.tolerances.scaled_to(self.units)
    }
}

/// 标注默认值（毫米）
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DimensionDefaults {
    /// 线性标注尺寸线的默认偏移
    pub linear_offset: f64,
    /// 角度标注弧的默认半径
    pub angular_radius: f64,
}

impl Default for DimensionDefaults {
    fn default() -> Self {
        Self {
            linear_offset: 10.0,
            angular_radius: 20.0,
        }
    }
}

impl DimensionDefaults {
    /// 按文档单位换算
    pub fn scaled_to(&self, unit: Unit) -> Self {
        let factor = unit.to_mm_factor();
        Self {
            linear_offset: self.linear_offset / factor,
            angular_radius: self.angular_radius / factor,
        }
    }
}

/// 日志配置，只由命令行程序使用
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Color;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = KernelConfig::default();
        assert_eq!(config.units, Unit::Millimeter);
        assert_eq!(config.effective_tolerances(), Tolerances::default());
        assert_eq!(config.dimension.linear_offset, 10.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
units = "m"

[style]
strokeColor = "#ff0000"
strokeWidth = 0.5

[tolerances]
snap = 2.0
"##
        )
        .unwrap();

        let config = KernelConfig::from_file(file.path()).unwrap();
        assert_eq!(config.units, Unit::Meter);
        assert_eq!(config.style.stroke_color, Color::RED);
        assert_eq!(config.tolerances.snap, 2.0);
        assert_eq!(config.tolerances.intersection, 1e-4);
        assert!((config.effective_tolerances().snap - 2e-3).abs() < 1e-15);
        assert!((config.dimension.scaled_to(config.units).linear_offset - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_missing_file() {
        let err = KernelConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "units = 42").unwrap();
        let err = KernelConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
