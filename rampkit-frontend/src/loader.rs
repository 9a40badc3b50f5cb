use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rampkit_config::AppConfig;
use rampkit_core::model::Object2D;
use rampkit_engine::dimensions::DimensionSettings;
use rampkit_engine::scene::{DemoObjects, Scene, SceneSettings};
use rampkit_engine::snap::SnapSettings;
use tracing::{info, warn};

use crate::errors::FrontendError;

/// 场景来源，便于前端呈现加载信息。
#[derive(Debug, Clone)]
pub enum SceneSource {
    Json(PathBuf),
    Demo,
}

/// 统一封装加载后的场景与元信息。
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: Scene,
    pub source: SceneSource,
    pub demo_objects: Option<DemoObjects>,
}

/// 将配置换算为引擎使用的吸附与标注参数。
pub fn settings_from_config(config: &AppConfig) -> SceneSettings {
    let editor = &config.editor;
    let dims = &config.dimensions;
    SceneSettings {
        snap: SnapSettings {
            enabled: editor.snap_enabled,
            grid_step_mm: editor.grid_step_mm,
            threshold_mm: editor.snap_threshold_mm,
            world_half_extent_mm: editor.world_half_extent_mm,
            ..SnapSettings::default()
        },
        dimensions: DimensionSettings {
            default_offset_mm: dims.default_offset_mm,
            min_offset_mm: dims.min_offset_mm,
            tick_length_mm: dims.tick_length_mm,
            leader_length_mm: dims.leader_length_mm,
            leader_tail_mm: dims.leader_tail_mm,
            leader_stack_gap_mm: dims.leader_stack_gap_mm,
        },
    }
}

/// 读取 JSON 对象数组构建场景。
pub fn load_scene_file(path: &Path, settings: SceneSettings) -> Result<Scene, FrontendError> {
    let content = fs::read_to_string(path).map_err(|source| FrontendError::SceneRead {
        path: path.to_path_buf(),
        source,
    })?;
    let objects: Vec<Object2D> =
        serde_json::from_str(&content).map_err(|source| FrontendError::SceneParse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut scene = Scene::with_settings(settings);
    scene.load_objects(objects)?;
    Ok(scene)
}

/// 指定路径加载成功则使用文件场景，否则回退到内置示例。
pub fn load_scene_or_demo(path: Option<&Path>, config: &AppConfig) -> LoadedScene {
    let settings = settings_from_config(config);
    if let Some(path) = path {
        match load_scene_file(path, settings) {
            Ok(scene) => {
                info!(path = %path.display(), count = scene.objects().len(), "从 JSON 加载场景成功");
                return LoadedScene {
                    scene,
                    source: SceneSource::Json(path.to_path_buf()),
                    demo_objects: None,
                };
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载场景失败，回退到内置示例");
            }
        }
    }

    let mut scene = Scene::with_settings(settings);
    let demo_objects = scene.populate_demo();
    LoadedScene {
        scene,
        source: SceneSource::Demo,
        demo_objects: Some(demo_objects),
    }
}

/// 从环境变量 `RAMPKIT_SCENE_JSON` 指定的路径加载场景，
/// 若失败则回退到内置示例。
pub fn load_scene_from_env_or_demo(config: &AppConfig) -> LoadedScene {
    let path = env::var_os("RAMPKIT_SCENE_JSON").map(PathBuf::from);
    load_scene_or_demo(path.as_deref(), config)
}
