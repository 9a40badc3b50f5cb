use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rampkit_core::units::{
    DEFAULT_SNAP_INCREMENT_MM, SNAP_INCREMENT_OPTIONS_MM, is_supported_increment,
};
use serde::Deserialize;
use thiserror::Error;

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub dimensions: DimensionConfig,
}

impl AppConfig {
    /// 从显式路径加载并校验配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 自动发现配置文件：优先读取环境变量 `RAMPKIT_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("RAMPKIT_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// 网格步长必须是受支持的增量，阈值与偏移必须为正。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let editor = &self.editor;
        if !is_supported_increment(editor.grid_step_mm) {
            return Err(ConfigError::Invalid(format!(
                "editor.grid_step_mm 必须是 {SNAP_INCREMENT_OPTIONS_MM:?} 之一，当前为 {}",
                editor.grid_step_mm
            )));
        }
        let positive = [
            ("editor.snap_threshold_mm", editor.snap_threshold_mm),
            ("editor.world_half_extent_mm", editor.world_half_extent_mm),
            ("dimensions.min_offset_mm", self.dimensions.min_offset_mm),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} 必须为正数，当前为 {value}"
                )));
            }
        }
        Ok(())
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 编辑器吸附参数。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub snap_enabled: bool,
    pub grid_step_mm: f64,
    pub snap_threshold_mm: f64,
    pub world_half_extent_mm: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            grid_step_mm: DEFAULT_SNAP_INCREMENT_MM,
            snap_threshold_mm: 10.0,
            world_half_extent_mm: 12_500.0,
        }
    }
}

/// 标注布局参数。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DimensionConfig {
    pub default_offset_mm: f64,
    pub min_offset_mm: f64,
    pub tick_length_mm: f64,
    pub leader_length_mm: f64,
    pub leader_tail_mm: f64,
    pub leader_stack_gap_mm: f64,
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            default_offset_mm: 400.0,
            min_offset_mm: 200.0,
            tick_length_mm: 60.0,
            leader_length_mm: 200.0,
            leader_tail_mm: 250.0,
            leader_stack_gap_mm: 120.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("配置无效: {0}")]
    Invalid(String),
}
