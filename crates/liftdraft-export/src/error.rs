//! 导出错误定义

use crate::options::ExportFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("unsupported export format: {0} (rendered by the raster pipeline)")]
    UnsupportedFormat(ExportFormat),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
