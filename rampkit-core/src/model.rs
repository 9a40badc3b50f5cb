//! 坡道 / 平台对象模型：工厂、归一化与补丁合并。

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBoxMm, Footprint, Point2};
use crate::units::round_half_up;

pub const DEFAULT_RAMP_RUN_MM: f64 = 1800.0;
pub const DEFAULT_RAMP_WIDTH_MM: f64 = 1000.0;
pub const DEFAULT_RAMP_HEIGHT_MM: f64 = 300.0;
pub const DEFAULT_LANDING_LENGTH_MM: f64 = 1200.0;
pub const DEFAULT_LANDING_WIDTH_MM: f64 = 1200.0;
pub const DEFAULT_LANDING_HEIGHT_MM: f64 = 300.0;

/// 标注线与对象边缘的默认距离。
pub const DEFAULT_MEASUREMENT_OFFSET_MM: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeasurementKey {
    L1,
    L2,
    W1,
    W2,
    H,
    E,
    WL,
    WR,
}

impl MeasurementKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementKey::L1 => "L1",
            MeasurementKey::L2 => "L2",
            MeasurementKey::W1 => "W1",
            MeasurementKey::W2 => "W2",
            MeasurementKey::H => "H",
            MeasurementKey::E => "E",
            MeasurementKey::WL => "WL",
            MeasurementKey::WR => "WR",
        }
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 每个标注键的开关。翼板键（WL/WR）只对坡道生效；缺省的键取默认开关。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    #[serde(rename = "L1")]
    pub l1: bool,
    #[serde(rename = "L2")]
    pub l2: bool,
    #[serde(rename = "W1")]
    pub w1: bool,
    #[serde(rename = "W2")]
    pub w2: bool,
    #[serde(rename = "H")]
    pub h: bool,
    #[serde(rename = "E")]
    pub e: bool,
    #[serde(rename = "WL")]
    pub wl: bool,
    #[serde(rename = "WR")]
    pub wr: bool,
}

impl Measurements {
    /// 全部关闭。
    pub fn none() -> Self {
        Self {
            l1: false,
            l2: false,
            w1: false,
            w2: false,
            h: false,
            e: false,
            wl: false,
            wr: false,
        }
    }

    pub fn is_enabled(&self, key: MeasurementKey) -> bool {
        match key {
            MeasurementKey::L1 => self.l1,
            MeasurementKey::L2 => self.l2,
            MeasurementKey::W1 => self.w1,
            MeasurementKey::W2 => self.w2,
            MeasurementKey::H => self.h,
            MeasurementKey::E => self.e,
            MeasurementKey::WL => self.wl,
            MeasurementKey::WR => self.wr,
        }
    }

    pub fn set(&mut self, key: MeasurementKey, enabled: bool) {
        let slot = match key {
            MeasurementKey::L1 => &mut self.l1,
            MeasurementKey::L2 => &mut self.l2,
            MeasurementKey::W1 => &mut self.w1,
            MeasurementKey::W2 => &mut self.w2,
            MeasurementKey::H => &mut self.h,
            MeasurementKey::E => &mut self.e,
            MeasurementKey::WL => &mut self.wl,
            MeasurementKey::WR => &mut self.wr,
        };
        *slot = enabled;
    }

}

impl Default for Measurements {
    fn default() -> Self {
        Self {
            l1: true,
            l2: false,
            w1: true,
            w2: false,
            h: true,
            e: true,
            wl: true,
            wr: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorOrientation {
    #[default]
    Auto,
    Horizontal,
    Vertical,
}

/// 单个标注键的锚点覆盖：偏移距离与朝向。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementAnchor {
    pub offset_mm: f64,
    #[serde(default)]
    pub orientation: AnchorOrientation,
}

impl Default for MeasurementAnchor {
    fn default() -> Self {
        Self {
            offset_mm: DEFAULT_MEASUREMENT_OFFSET_MM,
            orientation: AnchorOrientation::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Ramp,
    Landing,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Ramp => "ramp",
            ObjectKind::Landing => "landing",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    #[inline]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 坡道与平台共享的字段。所有长度单位为毫米，中心点为世界坐标。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectBase {
    pub id: ObjectId,
    pub x_mm: f64,
    pub y_mm: f64,
    pub length_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    #[serde(default)]
    pub elevation_mm: f64,
    #[serde(default)]
    pub rotation_deg: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub measurement_anchors: BTreeMap<MeasurementKey, MeasurementAnchor>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimension_offsets_mm: BTreeMap<MeasurementKey, f64>,
}

impl ObjectBase {
    fn at(id: ObjectId, at: Point2, length_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self {
            id,
            x_mm: at.x(),
            y_mm: at.y(),
            length_mm,
            width_mm,
            height_mm,
            elevation_mm: 0.0,
            rotation_deg: 0.0,
            locked: false,
            measurements: Measurements::default(),
            measurement_anchors: BTreeMap::new(),
            dimension_offsets_mm: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        Point2::new(self.x_mm, self.y_mm)
    }

    fn normalize(&mut self) {
        self.x_mm = round_mm(self.x_mm);
        self.y_mm = round_mm(self.y_mm);
        self.length_mm = clamp_int(self.length_mm, 0.0, None);
        self.width_mm = clamp_int(self.width_mm, 0.0, None);
        self.height_mm = clamp_int(self.height_mm, 0.0, None);
        self.elevation_mm = clamp_int(self.elevation_mm, 0.0, None);
        self.rotation_deg = normalize_deg(self.rotation_deg);
        // 与默认值相同的锚点等价于未设置
        self.measurement_anchors
            .retain(|_, anchor| *anchor != MeasurementAnchor::default());
    }

    fn apply_patch(&mut self, patch: &ObjectPatch) {
        let fields = [
            (&mut self.x_mm, patch.x_mm),
            (&mut self.y_mm, patch.y_mm),
            (&mut self.length_mm, patch.length_mm),
            (&mut self.width_mm, patch.width_mm),
            (&mut self.height_mm, patch.height_mm),
            (&mut self.elevation_mm, patch.elevation_mm),
            (&mut self.rotation_deg, patch.rotation_deg),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        for (key, enabled) in &patch.measurements {
            self.measurements.set(*key, *enabled);
        }
        for (key, anchor_patch) in &patch.measurement_anchors {
            let anchor = self.measurement_anchors.entry(*key).or_default();
            if let Some(offset) = anchor_patch.offset_mm {
                anchor.offset_mm = offset;
            }
            if let Some(orientation) = anchor_patch.orientation {
                anchor.orientation = orientation;
            }
        }
        for (key, offset) in &patch.dimension_offsets_mm {
            self.dimension_offsets_mm.insert(*key, *offset);
        }
    }
}

/// 坡道：`run_mm` 为沿坡向的水平投影长度，决定平面图宽度。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RampObject {
    #[serde(flatten)]
    pub base: ObjectBase,
    pub run_mm: f64,
    #[serde(default = "RampObject::default_show_arrow")]
    pub show_arrow: bool,
    #[serde(default)]
    pub has_left_wing: bool,
    #[serde(default)]
    pub left_wing_size_mm: f64,
    #[serde(default)]
    pub has_right_wing: bool,
    #[serde(default)]
    pub right_wing_size_mm: f64,
}

impl RampObject {
    fn default_show_arrow() -> bool {
        true
    }

    /// 指定侧翼板尺寸；翼板未启用时为 0。
    pub fn wing_size_mm(&self, side: WingSide) -> f64 {
        match side {
            WingSide::Left if self.has_left_wing => self.left_wing_size_mm,
            WingSide::Right if self.has_right_wing => self.right_wing_size_mm,
            _ => 0.0,
        }
    }

    pub fn has_wing(&self, side: WingSide) -> bool {
        match side {
            WingSide::Left => self.has_left_wing,
            WingSide::Right => self.has_right_wing,
        }
    }

    fn normalize(&mut self) {
        self.base.normalize();
        self.run_mm = clamp_int(self.run_mm, 0.0, None);
        self.left_wing_size_mm = if self.has_left_wing {
            clamp_int(self.left_wing_size_mm, 0.0, None)
        } else {
            0.0
        };
        self.right_wing_size_mm = if self.has_right_wing {
            clamp_int(self.right_wing_size_mm, 0.0, None)
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingObject {
    #[serde(flatten)]
    pub base: ObjectBase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WingSide {
    Left,
    Right,
}

impl WingSide {
    pub fn measurement_key(self) -> MeasurementKey {
        match self {
            WingSide::Left => MeasurementKey::WL,
            WingSide::Right => MeasurementKey::WR,
        }
    }

    /// 局部 y 轴方向：左翼朝 -y，右翼朝 +y。
    pub fn direction(self) -> f64 {
        match self {
            WingSide::Left => -1.0,
            WingSide::Right => 1.0,
        }
    }
}

/// 平面对象，按 `kind` 字段区分坡道与平台。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Object2D {
    Ramp(RampObject),
    Landing(LandingObject),
}

impl Object2D {
    /// 在指定放置点创建默认尺寸的坡道。
    pub fn ramp(id: impl Into<ObjectId>, at: Point2) -> Self {
        let base = ObjectBase::at(
            id.into(),
            at,
            DEFAULT_RAMP_RUN_MM,
            DEFAULT_RAMP_WIDTH_MM,
            DEFAULT_RAMP_HEIGHT_MM,
        );
        Object2D::Ramp(RampObject {
            base,
            run_mm: DEFAULT_RAMP_RUN_MM,
            show_arrow: true,
            has_left_wing: false,
            left_wing_size_mm: 0.0,
            has_right_wing: false,
            right_wing_size_mm: 0.0,
        })
        .normalized()
    }

    /// 在指定放置点创建默认尺寸的平台。
    pub fn landing(id: impl Into<ObjectId>, at: Point2) -> Self {
        let base = ObjectBase::at(
            id.into(),
            at,
            DEFAULT_LANDING_LENGTH_MM,
            DEFAULT_LANDING_WIDTH_MM,
            DEFAULT_LANDING_HEIGHT_MM,
        );
        Object2D::Landing(LandingObject { base }).normalized()
    }

    pub fn new(kind: ObjectKind, id: impl Into<ObjectId>, at: Point2) -> Self {
        match kind {
            ObjectKind::Ramp => Self::ramp(id, at),
            ObjectKind::Landing => Self::landing(id, at),
        }
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object2D::Ramp(_) => ObjectKind::Ramp,
            Object2D::Landing(_) => ObjectKind::Landing,
        }
    }

    #[inline]
    pub fn base(&self) -> &ObjectBase {
        match self {
            Object2D::Ramp(ramp) => &ramp.base,
            Object2D::Landing(landing) => &landing.base,
        }
    }

    #[inline]
    pub fn base_mut(&mut self) -> &mut ObjectBase {
        match self {
            Object2D::Ramp(ramp) => &mut ramp.base,
            Object2D::Landing(landing) => &mut landing.base,
        }
    }

    #[inline]
    pub fn as_ramp(&self) -> Option<&RampObject> {
        match self {
            Object2D::Ramp(ramp) => Some(ramp),
            Object2D::Landing(_) => None,
        }
    }

    #[inline]
    pub fn id(&self) -> &ObjectId {
        &self.base().id
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.base().center()
    }

    #[inline]
    pub fn rotation_deg(&self) -> f64 {
        self.base().rotation_deg
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.base().locked
    }

    #[inline]
    pub fn measurements(&self) -> &Measurements {
        &self.base().measurements
    }

    pub fn measurement_anchor(&self, key: MeasurementKey) -> Option<&MeasurementAnchor> {
        self.base().measurement_anchors.get(&key)
    }

    pub fn dimension_offset_mm(&self, key: MeasurementKey) -> Option<f64> {
        self.base().dimension_offsets_mm.get(&key).copied()
    }

    /// 沿局部长度轴的平面尺寸：坡道取 `run_mm`，平台取 `length_mm`。
    #[inline]
    pub fn plan_length_mm(&self) -> f64 {
        match self {
            Object2D::Ramp(ramp) => ramp.run_mm,
            Object2D::Landing(landing) => landing.base.length_mm,
        }
    }

    /// 未旋转的局部外形，是包围盒与吸附计算的基础。
    #[inline]
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.plan_length_mm(), self.base().width_mm)
    }

    /// 旋转后的屏幕轴对齐包围盒；`center_override` 用于拖拽中的候选位置。
    pub fn bounding_box(&self, center_override: Option<Point2>) -> BoundingBoxMm {
        let center = center_override.unwrap_or_else(|| self.center());
        BoundingBoxMm::rotated(center, self.footprint(), self.rotation_deg())
    }

    /// 返回归一化后的副本：取整、截断负值、角度回绕到 [0, 360)。
    pub fn normalized(mut self) -> Self {
        match &mut self {
            Object2D::Ramp(ramp) => ramp.normalize(),
            Object2D::Landing(landing) => landing.base.normalize(),
        }
        self
    }

    /// 合并补丁并归一化。`kind` 不可修改，平台忽略坡道专属字段。
    pub fn apply_patch(&self, patch: &ObjectPatch) -> Self {
        let mut next = self.clone();
        next.base_mut().apply_patch(patch);
        if let Object2D::Ramp(ramp) = &mut next {
            let fields = [
                (&mut ramp.run_mm, patch.run_mm),
                (&mut ramp.left_wing_size_mm, patch.left_wing_size_mm),
                (&mut ramp.right_wing_size_mm, patch.right_wing_size_mm),
            ];
            for (slot, value) in fields {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            if let Some(show_arrow) = patch.show_arrow {
                ramp.show_arrow = show_arrow;
            }
            if let Some(has_left_wing) = patch.has_left_wing {
                ramp.has_left_wing = has_left_wing;
            }
            if let Some(has_right_wing) = patch.has_right_wing {
                ramp.has_right_wing = has_right_wing;
            }
        }
        next.normalized()
    }
}

/// 锚点补丁，未提供的字段保持原值。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnchorPatch {
    pub offset_mm: Option<f64>,
    pub orientation: Option<AnchorOrientation>,
}

/// 对象补丁：所有字段可选。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub x_mm: Option<f64>,
    pub y_mm: Option<f64>,
    pub length_mm: Option<f64>,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub elevation_mm: Option<f64>,
    pub rotation_deg: Option<f64>,
    pub locked: Option<bool>,
    pub run_mm: Option<f64>,
    pub show_arrow: Option<bool>,
    pub has_left_wing: Option<bool>,
    pub left_wing_size_mm: Option<f64>,
    pub has_right_wing: Option<bool>,
    pub right_wing_size_mm: Option<f64>,
    pub measurements: BTreeMap<MeasurementKey, bool>,
    pub measurement_anchors: BTreeMap<MeasurementKey, AnchorPatch>,
    pub dimension_offsets_mm: BTreeMap<MeasurementKey, f64>,
}

impl ObjectPatch {
    pub fn center(center: Point2) -> Self {
        Self {
            x_mm: Some(center.x()),
            y_mm: Some(center.y()),
            ..Self::default()
        }
    }

    pub fn rotation(rotation_deg: f64) -> Self {
        Self {
            rotation_deg: Some(rotation_deg),
            ..Self::default()
        }
    }

    pub fn with_measurement(mut self, key: MeasurementKey, enabled: bool) -> Self {
        self.measurements.insert(key, enabled);
        self
    }

    pub fn with_anchor(mut self, key: MeasurementKey, anchor: AnchorPatch) -> Self {
        self.measurement_anchors.insert(key, anchor);
        self
    }

    pub fn with_dimension_offset(mut self, key: MeasurementKey, offset_mm: f64) -> Self {
        self.dimension_offsets_mm.insert(key, offset_mm);
        self
    }
}

#[inline]
pub fn round_mm(mm: f64) -> f64 {
    round_half_up(mm)
}

/// 取整后限制在 `[min, max]`；非有限值退化为 `min`。
pub fn clamp_int(value: f64, min: f64, max: Option<f64>) -> f64 {
    let rounded = round_half_up(value);
    let upper = max.map_or(rounded, |max| rounded.min(max));
    let clamped = upper.max(min);
    if clamped.is_finite() { clamped } else { min }
}

/// 取整并回绕到 [0, 360)。
pub fn normalize_deg(deg: f64) -> f64 {
    let rounded = round_half_up(deg);
    if !rounded.is_finite() {
        return 0.0;
    }
    rounded.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_assign_defaults() {
        let ramp = Object2D::ramp("ramp-1", Point2::new(10.4, -20.6));
        assert_eq!(ramp.kind(), ObjectKind::Ramp);
        assert_eq!(ramp.center(), Point2::new(10.0, -21.0));
        let data = ramp.as_ramp().expect("ramp variant");
        assert_eq!(data.run_mm, 1800.0);
        assert_eq!(data.base.width_mm, 1000.0);
        assert_eq!(data.base.height_mm, 300.0);
        assert!(data.show_arrow);
        assert_eq!(data.wing_size_mm(WingSide::Left), 0.0);

        let landing = Object2D::landing("landing-1", Point2::ORIGIN);
        assert_eq!(landing.footprint(), Footprint::new(1200.0, 1200.0));
        assert!(landing.as_ramp().is_none());
    }

    #[test]
    fn normalization_rounds_clamps_and_wraps() {
        let mut object = Object2D::landing("a", Point2::ORIGIN);
        {
            let base = object.base_mut();
            base.length_mm = -12.0;
            base.width_mm = 999.5;
            base.elevation_mm = f64::NAN;
            base.rotation_deg = -90.2;
        }
        let normalized = object.normalized();
        let base = normalized.base();
        assert_eq!(base.length_mm, 0.0);
        assert_eq!(base.width_mm, 1000.0);
        assert_eq!(base.elevation_mm, 0.0);
        assert_eq!(base.rotation_deg, 270.0);
        assert_eq!(normalize_deg(720.0), 0.0);
        assert_eq!(normalize_deg(359.6), 0.0);
    }

    #[test]
    fn wing_sizes_are_zeroed_without_flag() {
        let ramp = Object2D::ramp("r", Point2::ORIGIN);
        let patch = ObjectPatch {
            left_wing_size_mm: Some(300.0),
            has_right_wing: Some(true),
            right_wing_size_mm: Some(250.4),
            ..ObjectPatch::default()
        };
        let patched = ramp.apply_patch(&patch);
        let data = patched.as_ramp().expect("ramp variant");
        assert_eq!(data.left_wing_size_mm, 0.0);
        assert_eq!(data.right_wing_size_mm, 250.0);
        assert_eq!(data.wing_size_mm(WingSide::Right), 250.0);
    }

    #[test]
    fn landing_ignores_ramp_only_fields() {
        let landing = Object2D::landing("l", Point2::ORIGIN);
        let patch = ObjectPatch {
            run_mm: Some(5000.0),
            has_left_wing: Some(true),
            ..ObjectPatch::default()
        };
        assert_eq!(landing.apply_patch(&patch), landing);
    }

    #[test]
    fn identical_patch_produces_equal_object() {
        let ramp = Object2D::ramp("r", Point2::new(100.0, 200.0));
        let patch = ObjectPatch::center(Point2::new(100.3, 199.8));
        assert_eq!(ramp.apply_patch(&patch), ramp);

        let moved = ramp.apply_patch(&ObjectPatch::center(Point2::new(150.0, 200.0)));
        assert_ne!(moved, ramp);
        assert_eq!(moved.center(), Point2::new(150.0, 200.0));
    }

    #[test]
    fn anchor_patch_merges_into_defaults() {
        let ramp = Object2D::ramp("r", Point2::ORIGIN);
        let patch = ObjectPatch::default()
            .with_anchor(
                MeasurementKey::L1,
                AnchorPatch {
                    offset_mm: None,
                    orientation: Some(AnchorOrientation::Vertical),
                },
            )
            .with_dimension_offset(MeasurementKey::W1, 650.0)
            .with_measurement(MeasurementKey::L2, true);
        let patched = ramp.apply_patch(&patch);
        let anchor = patched
            .measurement_anchor(MeasurementKey::L1)
            .expect("anchor was inserted");
        assert_eq!(anchor.offset_mm, DEFAULT_MEASUREMENT_OFFSET_MM);
        assert_eq!(anchor.orientation, AnchorOrientation::Vertical);
        assert_eq!(patched.dimension_offset_mm(MeasurementKey::W1), Some(650.0));
        assert!(patched.measurements().is_enabled(MeasurementKey::L2));
    }

    #[test]
    fn bounding_box_uses_run_for_ramps() {
        let mut ramp = Object2D::ramp("r", Point2::ORIGIN);
        ramp.base_mut().length_mm = 5000.0;
        let bbox = ramp.bounding_box(None);
        assert_eq!(bbox.width(), 1800.0);
        assert_eq!(bbox.height(), 1000.0);

        let moved = ramp.bounding_box(Some(Point2::new(900.0, 0.0)));
        assert_eq!(moved.left, 0.0);
        assert_eq!(moved.center_x, 900.0);
    }

    #[test]
    fn json_uses_tagged_camel_case_layout() {
        let ramp = Object2D::ramp("ramp-7", Point2::new(5.0, 6.0));
        let value = serde_json::to_value(&ramp).expect("serialize");
        assert_eq!(value["kind"], "ramp");
        assert_eq!(value["id"], "ramp-7");
        assert_eq!(value["xMm"], 5.0);
        assert_eq!(value["runMm"], 1800.0);
        assert_eq!(value["measurements"]["L1"], true);

        let json = r#"{
            "kind": "landing",
            "id": "l-1",
            "xMm": 0,
            "yMm": 0,
            "lengthMm": 1500,
            "widthMm": 900,
            "heightMm": 0,
            "measurementAnchors": { "W2": { "offsetMm": 250, "orientation": "horizontal" } }
        }"#;
        let parsed: Object2D = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.kind(), ObjectKind::Landing);
        assert_eq!(parsed.footprint(), Footprint::new(1500.0, 900.0));
        let anchor = parsed
            .measurement_anchor(MeasurementKey::W2)
            .expect("anchor present");
        assert_eq!(anchor.orientation, AnchorOrientation::Horizontal);
        assert!(parsed.measurements().is_enabled(MeasurementKey::L1));
    }

    #[test]
    fn default_anchor_patch_is_not_a_change() {
        let landing = Object2D::landing("l", Point2::ORIGIN);
        let patch = ObjectPatch::default().with_anchor(
            MeasurementKey::L1,
            AnchorPatch {
                offset_mm: Some(DEFAULT_MEASUREMENT_OFFSET_MM),
                orientation: Some(AnchorOrientation::Auto),
            },
        );
        let patched = landing.apply_patch(&patch);
        assert_eq!(patched, landing);
        assert!(patched.measurement_anchor(MeasurementKey::L1).is_none());

        // 把已有锚点改回默认值同样移除该条目
        let custom = landing.apply_patch(&ObjectPatch::default().with_anchor(
            MeasurementKey::W1,
            AnchorPatch {
                offset_mm: Some(650.0),
                orientation: None,
            },
        ));
        assert!(custom.measurement_anchor(MeasurementKey::W1).is_some());
        let reverted = custom.apply_patch(&ObjectPatch::default().with_anchor(
            MeasurementKey::W1,
            AnchorPatch {
                offset_mm: Some(DEFAULT_MEASUREMENT_OFFSET_MM),
                orientation: None,
            },
        ));
        assert_eq!(reverted, landing);
    }

    #[test]
    fn partial_measurements_fill_missing_keys_from_defaults() {
        let partial: Measurements = serde_json::from_str(r#"{"L2": true, "H": false}"#)
            .expect("deserialize measurements");
        assert_eq!(
            partial,
            Measurements {
                l2: true,
                h: false,
                ..Measurements::default()
            }
        );

        let empty: Measurements = serde_json::from_str("{}").expect("deserialize measurements");
        assert_eq!(empty, Measurements::default());
    }
}
