use std::collections::HashMap;

use crate::scene::Scene;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

pub struct CommandContext<'a> {
    pub scene: &'a mut Scene,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(RotateSelectedCommand);
        bus.register(DeleteSelectedCommand);
        bus.register(ToggleSnapCommand);
        bus.register(ClearSelectionCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    pub fn available_commands(&self) -> impl Iterator<Item = &&'static str> {
        self.handlers.keys()
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

/// 参数为旋转增量（度），默认 90。
struct RotateSelectedCommand;

impl CommandHandler for RotateSelectedCommand {
    fn name(&self) -> &'static str {
        "rotate_selected"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let delta = match request.args.first() {
            None => 90.0,
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) => value,
                Err(_) => return CommandResponse::err(format!("无效的角度参数: {raw}")),
            },
        };
        let Some(id) = context.scene.selected().cloned() else {
            return CommandResponse::err("当前没有选中对象");
        };
        match context.scene.rotate_by(&id, delta) {
            Ok(_) => {
                let rotation = context
                    .scene
                    .object(&id)
                    .map_or(0.0, |object| object.rotation_deg());
                CommandResponse::ok(format!("{id} 已旋转到 {rotation}°"))
            }
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct DeleteSelectedCommand;

impl CommandHandler for DeleteSelectedCommand {
    fn name(&self) -> &'static str {
        "delete_selected"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let Some(id) = context.scene.selected().cloned() else {
            return CommandResponse::err("当前没有选中对象");
        };
        match context.scene.remove(&id) {
            Ok(_) => CommandResponse::ok(format!("{id} 已删除")),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct ToggleSnapCommand;

impl CommandHandler for ToggleSnapCommand {
    fn name(&self) -> &'static str {
        "toggle_snap"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let enabled = !context.scene.snap_enabled();
        context.scene.set_snap_enabled(enabled);
        if enabled {
            CommandResponse::ok("吸附已开启")
        } else {
            CommandResponse::ok("吸附已关闭")
        }
    }
}

struct ClearSelectionCommand;

impl CommandHandler for ClearSelectionCommand {
    fn name(&self) -> &'static str {
        "clear_selection"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.clear_selection();
        CommandResponse::ok("选中已清空")
    }
}
