use std::path::PathBuf;

use rampkit_engine::errors::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("读取场景文件 {path:?} 失败: {source}")]
    SceneRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析场景文件 {path:?} 失败: {source}")]
    SceneParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
}
