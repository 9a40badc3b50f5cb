use std::path::PathBuf;

use rampkit_config::{AppConfig, ConfigError};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut config_override: Option<PathBuf> = None;
    let mut disable_snap = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-snap" => disable_snap = true,
            "--config" => {
                let Some(path) = args.next() else {
                    eprintln!("`--config` 需要提供配置文件路径");
                    std::process::exit(1);
                };
                config_override = Some(PathBuf::from(path));
            }
            other => {
                eprintln!("未知参数：{other}");
                std::process::exit(1);
            }
        }
    }

    let (mut config, fallback) = load_configuration(config_override);
    if disable_snap {
        config.editor.snap_enabled = false;
    }
    init_logging(&config);
    if let Some(fallback) = &fallback {
        log_config_fallback(fallback);
    }
    info!(snap = config.editor.snap_enabled, "启动坡道布局 CLI");

    if let Err(err) = rampkit_frontend::run_cli_demo(&config) {
        error!(error = %err, "执行 CLI 演示失败");
        std::process::exit(1);
    }
}

/// 配置加载失败时保留的错误，待日志初始化后再输出。
#[derive(Debug)]
struct ConfigFallback {
    explicit: bool,
    error: ConfigError,
}

fn load_configuration(override_path: Option<PathBuf>) -> (AppConfig, Option<ConfigFallback>) {
    let (explicit, loaded) = match override_path {
        Some(path) => (true, AppConfig::from_file(&path)),
        None => (false, AppConfig::discover()),
    };
    match loaded {
        Ok(cfg) => (cfg, None),
        Err(error) => (AppConfig::default(), Some(ConfigFallback { explicit, error })),
    }
}

fn log_config_fallback(fallback: &ConfigFallback) {
    let message = if fallback.explicit {
        "加载指定配置失败，使用默认配置"
    } else {
        "加载默认配置失败，使用内建默认值"
    };
    let err = &fallback.error;
    match err {
        ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
            warn!(path = %path.display(), error = %err, "{message}");
        }
        ConfigError::Context { .. } | ConfigError::Invalid(_) => {
            warn!(error = %err, "{message}");
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
