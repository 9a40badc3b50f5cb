use rampkit_config::AppConfig;
use rampkit_core::geometry::{Point2, Vector2};
use rampkit_core::model::{Object2D, ObjectId, ObjectKind};
use rampkit_engine::command::{CommandBus, CommandContext, CommandRequest};
use rampkit_engine::dimensions::DimensionSegment;
use rampkit_engine::scene::Scene;
use rampkit_engine::snap::{AxisSnap, SnapResult, SnapSource};
use tracing::{info, warn};

use crate::errors::FrontendError;
use crate::loader::{SceneSource, load_scene_from_env_or_demo};

/// 简易 CLI 演示：加载场景（或内置示例），模拟一次拖拽吸附，执行几条命令并打印全部标注。
pub fn run_demo(config: &AppConfig) -> Result<(), FrontendError> {
    let loaded = load_scene_from_env_or_demo(config);
    let mut scene = loaded.scene;

    println!("坡道布局 CLI 演示");
    match &loaded.source {
        SceneSource::Json(path) => println!("已从 JSON 加载场景：{}", path.display()),
        SceneSource::Demo => {
            if let Some(ids) = &loaded.demo_objects {
                println!("已构建内置示例对象：");
                println!("  - 平台 ID = {}", ids.landing);
                println!("  - 坡道 ID = {}", ids.ramp);
            }
        }
    }
    println!(
        "吸附: {}",
        if scene.snap_enabled() { "开启" } else { "关闭" }
    );

    print_objects(&scene);

    let target = loaded
        .demo_objects
        .as_ref()
        .map(|ids| ids.ramp.clone())
        .or_else(|| drag_target(&scene));
    if let Some(id) = target {
        let proposed = scene
            .object(&id)
            .map(|object| object.center().translate(Vector2::new(7.0, -4.0)))
            .unwrap_or(Point2::ORIGIN);
        let result = scene.drag_to(&id, proposed)?;
        info!(id = %id, x = result.center.x(), y = result.center.y(), "CLI 拖拽完成");
        print_snap(&id, proposed, &result);
        scene.select(&id)?;
    } else {
        println!("场景中没有可拖拽的对象。");
    }

    let command_bus = CommandBus::new();
    let mut commands: Vec<&str> = command_bus.available_commands().copied().collect();
    commands.sort_unstable();
    println!("支持的命令: {}", commands.join(", "));

    let mut context = CommandContext { scene: &mut scene };
    let rotate = CommandRequest::new("rotate_selected").with_arg("90");
    for request in [rotate, CommandRequest::new("clear_selection")] {
        if let Err(err) = dispatch_cli_command(&command_bus, &request, &mut context) {
            warn!("CLI 命令执行失败: {err}");
        }
    }

    if let Some(bounds) = scene.bounds() {
        println!(
            "场景范围: {} -> {}",
            format_point(bounds.min()),
            format_point(bounds.max())
        );
    }

    let segments = scene.dimensions();
    info!(count = segments.len(), "CLI 演示标注统计");
    println!("当前标注（共 {} 条）：", segments.len());
    for segment in &segments {
        println!("  - {}", describe_segment(segment));
    }
    Ok(())
}

/// 第一个未锁定的坡道，否则第一个未锁定的对象。
fn drag_target(scene: &Scene) -> Option<ObjectId> {
    let unlocked = || scene.objects().iter().filter(|object| !object.is_locked());
    unlocked()
        .find(|object| object.kind() == ObjectKind::Ramp)
        .or_else(|| unlocked().next())
        .map(|object| object.id().clone())
}

fn print_objects(scene: &Scene) {
    println!("当前场景对象：");
    for object in scene.objects() {
        println!("  - {}", describe_object(object));
    }
}

fn describe_object(object: &Object2D) -> String {
    let base = object.base();
    let kind = match object.kind() {
        ObjectKind::Ramp => "坡道",
        ObjectKind::Landing => "平台",
    };
    let mut text = format!(
        "{kind} #{}, 中心={}, 平面={}x{}, 高={}, 标高={}, 旋转={}°",
        base.id,
        format_point(object.center()),
        object.plan_length_mm(),
        base.width_mm,
        base.height_mm,
        base.elevation_mm,
        base.rotation_deg
    );
    if let Some(ramp) = object.as_ramp() {
        if ramp.has_left_wing {
            text.push_str(&format!(", 左翼={}", ramp.left_wing_size_mm));
        }
        if ramp.has_right_wing {
            text.push_str(&format!(", 右翼={}", ramp.right_wing_size_mm));
        }
    }
    if base.locked {
        text.push_str(", 已锁定");
    }
    text
}

fn print_snap(id: &ObjectId, proposed: Point2, result: &SnapResult) {
    println!(
        "拖拽 {id}: 候选中心={} -> 吸附中心={}",
        format_point(proposed),
        format_point(result.center)
    );
    println!("  x 轴: {}", describe_axis(&result.guides.x));
    println!("  y 轴: {}", describe_axis(&result.guides.y));
    if let Some(point) = result.guides.point {
        println!("  兴趣点标记: {}", format_point(point));
    }
}

fn describe_axis(axis: &AxisSnap) -> String {
    let value = axis
        .value
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "<无>".to_string());
    match axis.source {
        SnapSource::None => "未吸附".to_string(),
        SnapSource::Face => format!("对齐对象边线 {value}"),
        SnapSource::Poi => format!("对齐兴趣点 {value}"),
        SnapSource::Grid => format!("网格 {value}"),
    }
}

fn describe_segment(segment: &DimensionSegment) -> String {
    match segment {
        DimensionSegment::Plan(plan) => format!(
            "{} {} \"{}\" [{:?}/{:?}] {} -> {}, 偏移={}",
            plan.object_id,
            plan.measurement_key,
            plan.label,
            plan.variant,
            plan.orientation,
            format_point(plan.start),
            format_point(plan.end),
            plan.offset_mm
        ),
        DimensionSegment::Leader(leader) => {
            let points: Vec<String> = leader.points.iter().map(|p| format_point(*p)).collect();
            format!(
                "{} {} \"{}\" [{:?}] 引线 {}, 文字位置={}",
                leader.object_id,
                leader.measurement_key,
                leader.label,
                leader.variant,
                points.join(" -> "),
                format_point(leader.text_anchor)
            )
        }
    }
}

fn dispatch_cli_command(
    bus: &CommandBus,
    request: &CommandRequest,
    context: &mut CommandContext<'_>,
) -> Result<(), String> {
    let response = bus.dispatch(request, context);
    if response.success {
        if let Some(message) = response.message {
            println!("[命令] {message}");
        }
        Ok(())
    } else {
        Err(response.message.unwrap_or_else(|| "未知错误".to_string()))
    }
}

fn format_point(point: Point2) -> String {
    format!("({:.2}, {:.2})", point.x(), point.y())
}
