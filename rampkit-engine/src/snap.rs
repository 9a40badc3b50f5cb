//! 拖拽吸附解析。
//!
//! 优先级（x、y 两轴各自独立）：
//! 1. 对象面/中心线对齐；
//! 2. 兴趣点（四角、四边中点、中心）对齐，命中时给出点标记；
//! 3. 网格：将包围盒左上角吸附到网格步长的整数倍。
//!
//! 吸附完成后中心点限制在世界范围内。关闭吸附时只做范围限制。

use rampkit_core::geometry::{
    BoundingBoxMm, Point2, center_from_top_left, top_left_from_center,
};
use rampkit_core::model::Object2D;
use rampkit_core::units::{GRID_STEP_MM, snap_mm};
use serde::Serialize;
use tracing::debug;

pub const ALIGN_THRESHOLD_MM: f64 = 10.0;
pub const WORLD_HALF_EXTENT_MM: f64 = 12_500.0;

/// 吸附参数，由前端从配置换算后传入。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    /// 全局吸附开关。
    pub enabled: bool,
    pub grid_step_mm: f64,
    pub threshold_mm: f64,
    pub world_half_extent_mm: f64,
    /// 是否参与对象面/中心线对齐。
    pub face_snap: bool,
    /// 是否参与兴趣点对齐。
    pub poi_snap: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            grid_step_mm: GRID_STEP_MM,
            threshold_mm: ALIGN_THRESHOLD_MM,
            world_half_extent_mm: WORLD_HALF_EXTENT_MM,
            face_snap: true,
            poi_snap: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapSource {
    None,
    Face,
    Poi,
    Grid,
}

/// 单轴吸附结果：来源及命中的坐标值（参考线或网格坐标）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisSnap {
    pub source: SnapSource,
    pub value: Option<f64>,
}

impl AxisSnap {
    pub const NONE: AxisSnap = AxisSnap {
        source: SnapSource::None,
        value: None,
    };

    #[inline]
    fn with(source: SnapSource, value: f64) -> Self {
        Self {
            source,
            value: Some(value),
        }
    }
}

/// 渲染对齐辅助线所需的信息。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapGuides {
    pub x: AxisSnap,
    pub y: AxisSnap,
    /// 兴趣点命中时的目标点标记。
    pub point: Option<Point2>,
}

impl SnapGuides {
    pub const NONE: SnapGuides = SnapGuides {
        x: AxisSnap::NONE,
        y: AxisSnap::NONE,
        point: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapResult {
    pub center: Point2,
    pub guides: SnapGuides,
}

/// 单轴候选：位移量与被对齐的目标。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<T> {
    pub delta: f64,
    pub target: T,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDeltas<T> {
    pub dx: Option<Candidate<T>>,
    pub dy: Option<Candidate<T>>,
}

impl<T> Default for AxisDeltas<T> {
    fn default() -> Self {
        Self { dx: None, dy: None }
    }
}

/// 只在严格更近时替换，保证相同距离下保留先扫描到的候选。
fn consider<T>(best: &mut Option<Candidate<T>>, delta: f64, target: T, threshold_mm: f64) {
    if delta.abs() > threshold_mm {
        return;
    }
    if best.as_ref().is_none_or(|current| delta.abs() < current.delta.abs()) {
        *best = Some(Candidate { delta, target });
    }
}

fn other_boxes(moving: &Object2D, objects: &[Object2D]) -> Vec<BoundingBoxMm> {
    objects
        .iter()
        .filter(|other| other.id() != moving.id())
        .map(|other| other.bounding_box(None))
        .collect()
}

/// 面/中心线对齐：移动对象在候选位置的三条代表线与其他对象的代表线逐一比较。
pub fn find_alignment_deltas(
    moving: &Object2D,
    candidate: Point2,
    objects: &[Object2D],
    threshold_mm: f64,
) -> AxisDeltas<f64> {
    let moving_box = moving.bounding_box(Some(candidate));
    let others = other_boxes(moving, objects);
    let mut deltas = AxisDeltas::default();

    for line in moving_box.lines_x() {
        for other in &others {
            for target in other.lines_x() {
                consider(&mut deltas.dx, target - line, target, threshold_mm);
            }
        }
    }
    for line in moving_box.lines_y() {
        for other in &others {
            for target in other.lines_y() {
                consider(&mut deltas.dy, target - line, target, threshold_mm);
            }
        }
    }
    deltas
}

/// 兴趣点对齐：九点对九点，按轴分别取最近候选，目标为命中的兴趣点。
pub fn find_poi_deltas(
    moving: &Object2D,
    candidate: Point2,
    objects: &[Object2D],
    threshold_mm: f64,
) -> AxisDeltas<Point2> {
    let moving_box = moving.bounding_box(Some(candidate));
    let others = other_boxes(moving, objects);
    let mut deltas = AxisDeltas::default();

    for own in moving_box.points_of_interest() {
        for other in &others {
            for target in other.points_of_interest() {
                let (from, to) = (own.point, target.point);
                consider(&mut deltas.dx, to.x() - from.x(), to, threshold_mm);
                consider(&mut deltas.dy, to.y() - from.y(), to, threshold_mm);
            }
        }
    }
    deltas
}

fn clamp_to_world(point: Point2, half_extent_mm: f64) -> Point2 {
    let half = half_extent_mm.abs();
    Point2::new(point.x().clamp(-half, half), point.y().clamp(-half, half))
}

/// 为拖拽中的对象求解吸附后的中心点。`objects` 可以包含移动对象本身，会按 id 跳过。
pub fn resolve_snap(
    moving: &Object2D,
    proposed: Point2,
    objects: &[Object2D],
    settings: &SnapSettings,
) -> SnapResult {
    if !settings.enabled {
        return SnapResult {
            center: clamp_to_world(proposed, settings.world_half_extent_mm),
            guides: SnapGuides::NONE,
        };
    }

    let faces = if settings.face_snap {
        find_alignment_deltas(moving, proposed, objects, settings.threshold_mm)
    } else {
        AxisDeltas::default()
    };
    let pois = if settings.poi_snap {
        find_poi_deltas(moving, proposed, objects, settings.threshold_mm)
    } else {
        AxisDeltas::default()
    };

    let footprint = moving.bounding_box(Some(proposed)).footprint();
    let grid_valid = settings.grid_step_mm > 0.0 && settings.grid_step_mm.is_finite();
    let grid_center = if grid_valid {
        let top_left = top_left_from_center(proposed, footprint);
        let snapped = Point2::new(
            snap_mm(top_left.x(), settings.grid_step_mm),
            snap_mm(top_left.y(), settings.grid_step_mm),
        );
        Some((snapped, center_from_top_left(snapped, footprint)))
    } else {
        None
    };

    let (x, axis_x, marker_x) = match (faces.dx, pois.dx) {
        (Some(face), _) => (
            proposed.x() + face.delta,
            AxisSnap::with(SnapSource::Face, face.target),
            None,
        ),
        (None, Some(poi)) => (
            proposed.x() + poi.delta,
            AxisSnap::with(SnapSource::Poi, poi.target.x()),
            Some(poi.target),
        ),
        (None, None) => match grid_center {
            Some((top_left, center)) => (
                center.x(),
                AxisSnap::with(SnapSource::Grid, top_left.x()),
                None,
            ),
            None => (proposed.x(), AxisSnap::NONE, None),
        },
    };
    let (y, axis_y, marker_y) = match (faces.dy, pois.dy) {
        (Some(face), _) => (
            proposed.y() + face.delta,
            AxisSnap::with(SnapSource::Face, face.target),
            None,
        ),
        (None, Some(poi)) => (
            proposed.y() + poi.delta,
            AxisSnap::with(SnapSource::Poi, poi.target.y()),
            Some(poi.target),
        ),
        (None, None) => match grid_center {
            Some((top_left, center)) => (
                center.y(),
                AxisSnap::with(SnapSource::Grid, top_left.y()),
                None,
            ),
            None => (proposed.y(), AxisSnap::NONE, None),
        },
    };

    let point = match (marker_x, marker_y) {
        (Some(px), Some(py)) => Some(Point2::new(px.x(), py.y())),
        (Some(single), None) | (None, Some(single)) => Some(single),
        (None, None) => None,
    };

    let center = clamp_to_world(Point2::new(x, y), settings.world_half_extent_mm);
    debug!(
        id = %moving.id(),
        x = center.x(),
        y = center.y(),
        source_x = ?axis_x.source,
        source_y = ?axis_y.source,
        "吸附完成"
    );

    SnapResult {
        center,
        guides: SnapGuides {
            x: axis_x,
            y: axis_y,
            point,
        },
    }
}
