//! 尺寸标注生成。
//!
//! 每个对象独立计算：先生成平面边线标注（L1、L2、W1、W2），再生成坡道翼板标注（WL、WR），
//! 最后生成高度/标高引线（H、E）。边线标注沿未旋转的局部包围盒绘制，翼板与引线跟随对象旋转。

use rampkit_core::geometry::{Point2, Vector2, top_left_from_center};
use rampkit_core::model::{
    AnchorOrientation, MeasurementKey, Object2D, ObjectId, RampObject, WingSide,
    DEFAULT_MEASUREMENT_OFFSET_MM,
};
use rampkit_core::units::round_half_up;
use serde::Serialize;

pub const DIMENSION_STROKE_WIDTH_MM: f64 = 10.0;
pub const DIMENSION_TICK_LENGTH_MM: f64 = 60.0;
pub const DIMENSION_TEXT_SIZE_MM: f64 = 120.0;
pub const DIMENSION_TEXT_GAP_MM: f64 = 60.0;
pub const DIMENSION_HIT_STROKE_MM: f64 = 40.0;

/// 标注偏移下限。
pub const MIN_DIMENSION_OFFSET_MM: f64 = 200.0;

const HEIGHT_LEADER_LENGTH_MM: f64 = 200.0;
const HEIGHT_TAIL_LENGTH_MM: f64 = 250.0;
const LEADER_STACK_GAP_MM: f64 = 120.0;

/// 标注布局参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionSettings {
    /// 未设置锚点覆盖时使用的偏移。
    pub default_offset_mm: f64,
    pub min_offset_mm: f64,
    pub tick_length_mm: f64,
    /// 引线斜向段长度。
    pub leader_length_mm: f64,
    /// 引线水平尾段长度。
    pub leader_tail_mm: f64,
    /// 标高文字相对高度文字的堆叠间距。
    pub leader_stack_gap_mm: f64,
}

impl Default for DimensionSettings {
    fn default() -> Self {
        Self {
            default_offset_mm: DEFAULT_MEASUREMENT_OFFSET_MM,
            min_offset_mm: MIN_DIMENSION_OFFSET_MM,
            tick_length_mm: DIMENSION_TICK_LENGTH_MM,
            leader_length_mm: HEIGHT_LEADER_LENGTH_MM,
            leader_tail_mm: HEIGHT_TAIL_LENGTH_MM,
            leader_stack_gap_mm: LEADER_STACK_GAP_MM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionVariant {
    Length,
    Width,
    Wing,
    Height,
    Elevation,
}

/// 带两端刻度的直线标注。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSegment {
    pub measurement_key: MeasurementKey,
    pub object_id: ObjectId,
    pub start: Point2,
    pub end: Point2,
    pub orientation: DimensionOrientation,
    pub label: String,
    pub variant: DimensionVariant,
    pub tick_length_mm: f64,
    /// 标注相对对象的外法线，供文字偏移使用。
    pub outward_normal: Vector2,
    pub offset_mm: f64,
}

/// 折线引线：锚点 → 斜向短段 → 水平尾段。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderSegment {
    pub measurement_key: MeasurementKey,
    pub object_id: ObjectId,
    pub points: Vec<Point2>,
    pub text_anchor: Point2,
    pub label: String,
    pub variant: DimensionVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DimensionSegment {
    Plan(PlanSegment),
    Leader(LeaderSegment),
}

impl DimensionSegment {
    pub fn object_id(&self) -> &ObjectId {
        match self {
            DimensionSegment::Plan(plan) => &plan.object_id,
            DimensionSegment::Leader(leader) => &leader.object_id,
        }
    }

    pub fn measurement_key(&self) -> MeasurementKey {
        match self {
            DimensionSegment::Plan(plan) => plan.measurement_key,
            DimensionSegment::Leader(leader) => leader.measurement_key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DimensionSegment::Plan(plan) => &plan.label,
            DimensionSegment::Leader(leader) => &leader.label,
        }
    }

    pub fn variant(&self) -> DimensionVariant {
        match self {
            DimensionSegment::Plan(plan) => plan.variant,
            DimensionSegment::Leader(leader) => leader.variant,
        }
    }
}

fn format_mm(value_mm: f64) -> String {
    format!("{}mm", round_half_up(value_mm) as i64)
}

/// 对象长度轴在屏幕上是否竖直：旋转角（回绕后）对 180 取模等于 90。
pub fn is_length_vertical(rotation_deg: f64) -> bool {
    rotation_deg.rem_euclid(360.0) % 180.0 == 90.0
}

fn resolve_orientation(object: &Object2D, key: MeasurementKey) -> AnchorOrientation {
    object
        .measurement_anchor(key)
        .map_or(AnchorOrientation::Auto, |anchor| anchor.orientation)
}

/// 显式偏移覆盖优先，其次锚点偏移，再次默认值；结果不低于下限。
fn resolve_offset(object: &Object2D, key: MeasurementKey, settings: &DimensionSettings) -> f64 {
    let chosen = object.dimension_offset_mm(key).unwrap_or_else(|| {
        object
            .measurement_anchor(key)
            .map_or(settings.default_offset_mm, |anchor| anchor.offset_mm)
    });
    chosen.max(settings.min_offset_mm)
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// 未旋转包围盒的四条边。
#[derive(Debug, Clone, Copy)]
struct PlanBox {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl PlanBox {
    fn of(object: &Object2D) -> Self {
        let footprint = object.footprint();
        let top_left = top_left_from_center(object.center(), footprint);
        Self {
            left: top_left.x(),
            right: top_left.x() + footprint.width_mm,
            top: top_left.y(),
            bottom: top_left.y() + footprint.height_mm,
        }
    }

    /// 边的起止点、外向偏移单位向量与被测长度。
    fn edge(&self, edge: Edge) -> (Point2, Point2, Vector2, f64) {
        match edge {
            Edge::Top => (
                Point2::new(self.left, self.top),
                Point2::new(self.right, self.top),
                Vector2::new(0.0, -1.0),
                self.right - self.left,
            ),
            Edge::Bottom => (
                Point2::new(self.left, self.bottom),
                Point2::new(self.right, self.bottom),
                Vector2::new(0.0, 1.0),
                self.right - self.left,
            ),
            Edge::Left => (
                Point2::new(self.left, self.top),
                Point2::new(self.left, self.bottom),
                Vector2::new(-1.0, 0.0),
                self.bottom - self.top,
            ),
            Edge::Right => (
                Point2::new(self.right, self.top),
                Point2::new(self.right, self.bottom),
                Vector2::new(1.0, 0.0),
                self.bottom - self.top,
            ),
        }
    }
}

fn edge_segment(
    object: &Object2D,
    plan_box: &PlanBox,
    key: MeasurementKey,
    length_vertical: bool,
    settings: &DimensionSettings,
) -> Option<PlanSegment> {
    // L 键默认沿长度轴，W 键默认垂直于长度轴；1 号贴近上/左边，2 号贴近下/右边。
    let (variant, auto_vertical, near) = match key {
        MeasurementKey::L1 => (DimensionVariant::Length, length_vertical, true),
        MeasurementKey::L2 => (DimensionVariant::Length, length_vertical, false),
        MeasurementKey::W1 => (DimensionVariant::Width, !length_vertical, true),
        MeasurementKey::W2 => (DimensionVariant::Width, !length_vertical, false),
        _ => return None,
    };
    if !object.measurements().is_enabled(key) {
        return None;
    }

    let orientation = match resolve_orientation(object, key) {
        AnchorOrientation::Auto if auto_vertical => DimensionOrientation::Vertical,
        AnchorOrientation::Auto => DimensionOrientation::Horizontal,
        AnchorOrientation::Horizontal => DimensionOrientation::Horizontal,
        AnchorOrientation::Vertical => DimensionOrientation::Vertical,
    };
    let edge = match (orientation, near) {
        (DimensionOrientation::Horizontal, true) => Edge::Top,
        (DimensionOrientation::Horizontal, false) => Edge::Bottom,
        (DimensionOrientation::Vertical, true) => Edge::Left,
        (DimensionOrientation::Vertical, false) => Edge::Right,
    };

    let offset_mm = resolve_offset(object, key, settings);
    let (start, end, normal, measured) = plan_box.edge(edge);
    let offset = normal.scale(offset_mm);

    Some(PlanSegment {
        measurement_key: key,
        object_id: object.id().clone(),
        start: start.translate(offset),
        end: end.translate(offset),
        orientation,
        label: format_mm(measured),
        variant,
        tick_length_mm: settings.tick_length_mm,
        outward_normal: offset.normalize_or_zero(),
        offset_mm,
    })
}

fn wing_segment(
    object: &Object2D,
    ramp: &RampObject,
    side: WingSide,
    settings: &DimensionSettings,
) -> Option<PlanSegment> {
    let key = side.measurement_key();
    let wing_size = ramp.wing_size_mm(side);
    if !ramp.has_wing(side) || wing_size <= 0.0 || !object.measurements().is_enabled(key) {
        return None;
    }

    let rotation = object.rotation_deg();
    let orientation = if is_length_vertical(rotation) {
        DimensionOrientation::Horizontal
    } else {
        DimensionOrientation::Vertical
    };
    let offset_mm = resolve_offset(object, key, settings);

    let half_run = ramp.run_mm / 2.0;
    let half_width = ramp.base.width_mm / 2.0;
    let direction = side.direction();
    let local_base = Point2::new(half_run, direction * half_width);
    let local_tip = Point2::new(half_run, direction * (half_width + wing_size));

    let length_direction = Vector2::new(1.0, 0.0).rotated(rotation);
    let offset = length_direction.scale(offset_mm);
    let to_world = |local: Point2| {
        local
            .rotated(rotation)
            .translate(Vector2::from(object.center().as_vec2()))
            .translate(offset)
    };
    let base = to_world(local_base);
    let tip = to_world(local_tip);

    let end = match orientation {
        DimensionOrientation::Horizontal => Point2::new(tip.x(), base.y()),
        DimensionOrientation::Vertical => Point2::new(base.x(), tip.y()),
    };

    Some(PlanSegment {
        measurement_key: key,
        object_id: object.id().clone(),
        start: base,
        end,
        orientation,
        label: format_mm(wing_size),
        variant: DimensionVariant::Wing,
        tick_length_mm: settings.tick_length_mm,
        outward_normal: length_direction.normalize_or_zero(),
        offset_mm,
    })
}

fn leader_segments(object: &Object2D, settings: &DimensionSettings) -> Vec<LeaderSegment> {
    let base = object.base();
    let show_height = base.measurements.h;
    let show_elevation = base.measurements.e && base.elevation_mm > 0.0;
    if !show_height && !show_elevation {
        return Vec::new();
    }

    let anchor = Point2::new(object.plan_length_mm() / 2.0, -base.width_mm / 2.0);
    let stub = Vector2::new(1.0, -1.0)
        .normalize_or_zero()
        .scale(settings.leader_length_mm);
    let elbow = anchor.translate(stub);
    let tail = elbow.translate(Vector2::new(settings.leader_tail_mm, 0.0));

    let rotation = object.rotation_deg();
    let center = Vector2::from(object.center().as_vec2());
    let to_world = |local: Point2| local.rotated(rotation).translate(center);

    let tail_world = to_world(tail);
    let points = vec![to_world(anchor), to_world(elbow), tail_world];
    let mut segments = Vec::with_capacity(2);

    if show_height {
        segments.push(LeaderSegment {
            measurement_key: MeasurementKey::H,
            object_id: base.id.clone(),
            points: points.clone(),
            text_anchor: tail_world,
            label: format_mm(base.height_mm),
            variant: DimensionVariant::Height,
        });
    }
    if show_elevation {
        let stacked = tail.translate(Vector2::new(0.0, -settings.leader_stack_gap_mm));
        segments.push(LeaderSegment {
            measurement_key: MeasurementKey::E,
            object_id: base.id.clone(),
            points,
            text_anchor: to_world(stacked),
            label: format_mm(base.elevation_mm),
            variant: DimensionVariant::Elevation,
        });
    }
    segments
}

/// 生成单个对象的全部标注，顺序固定：L1、L2、W1、W2、WL、WR、H、E。
pub fn generate_for_object(object: &Object2D, settings: &DimensionSettings) -> Vec<DimensionSegment> {
    let plan_box = PlanBox::of(object);
    let length_vertical = is_length_vertical(object.rotation_deg());

    let edges = [
        MeasurementKey::L1,
        MeasurementKey::L2,
        MeasurementKey::W1,
        MeasurementKey::W2,
    ]
    .into_iter()
    .filter_map(|key| edge_segment(object, &plan_box, key, length_vertical, settings));

    let wings = object.as_ramp().into_iter().flat_map(|ramp| {
        [WingSide::Left, WingSide::Right]
            .into_iter()
            .filter_map(move |side| wing_segment(object, ramp, side, settings))
    });

    edges
        .chain(wings)
        .map(DimensionSegment::Plan)
        .chain(
            leader_segments(object, settings)
                .into_iter()
                .map(DimensionSegment::Leader),
        )
        .collect()
}

/// 按对象列表顺序拼接各对象的标注。
pub fn generate(objects: &[Object2D], settings: &DimensionSettings) -> Vec<DimensionSegment> {
    objects
        .iter()
        .flat_map(|object| generate_for_object(object, settings))
        .collect()
}
