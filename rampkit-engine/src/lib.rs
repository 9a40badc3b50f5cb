pub mod command;
pub mod dimensions;
pub mod snap;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("object with id {0} not found")]
        ObjectNotFound(String),
        #[error("object {0} is locked")]
        ObjectLocked(String),
        #[error("object id {0} already exists")]
        DuplicateId(String),
        #[error("invalid argument: {0}")]
        InvalidArgument(String),
    }
}

pub mod scene {
    use rampkit_core::geometry::{Bounds2D, Point2};
    use rampkit_core::model::{Object2D, ObjectId, ObjectKind, ObjectPatch};
    use tracing::debug;

    use crate::dimensions::{self, DimensionSegment, DimensionSettings};
    use crate::errors::EngineError;
    use crate::snap::{self, SnapResult, SnapSettings};

    /// 场景级设置：吸附与标注布局。
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct SceneSettings {
        pub snap: SnapSettings,
        pub dimensions: DimensionSettings,
    }

    /// 引擎层维护有序对象列表与单选状态，所有修改都经过补丁归一化。
    #[derive(Debug)]
    pub struct Scene {
        objects: Vec<Object2D>,
        selected: Option<ObjectId>,
        settings: SceneSettings,
        next_serial: u64,
    }

    #[derive(Debug, Clone)]
    pub struct DemoObjects {
        pub landing: ObjectId,
        pub ramp: ObjectId,
    }

    impl Scene {
        pub fn new() -> Self {
            Self::with_settings(SceneSettings::default())
        }

        pub fn with_settings(settings: SceneSettings) -> Self {
            Self {
                objects: Vec::new(),
                selected: None,
                settings,
                next_serial: 1,
            }
        }

        /// 替换全部对象并清空选中状态。对象会被归一化，重复 id 返回错误且场景保持为空。
        pub fn load_objects(
            &mut self,
            objects: impl IntoIterator<Item = Object2D>,
        ) -> Result<(), EngineError> {
            self.objects.clear();
            self.selected = None;
            for object in objects {
                if let Err(err) = self.insert(object) {
                    self.objects.clear();
                    return Err(err);
                }
            }
            debug!(count = self.objects.len(), "已载入场景对象");
            Ok(())
        }

        #[inline]
        pub fn settings(&self) -> &SceneSettings {
            &self.settings
        }

        #[inline]
        pub fn objects(&self) -> &[Object2D] {
            &self.objects
        }

        pub fn object(&self, id: &ObjectId) -> Option<&Object2D> {
            self.objects.iter().find(|object| object.id() == id)
        }

        fn index_of(&self, id: &ObjectId) -> Result<usize, EngineError> {
            self.objects
                .iter()
                .position(|object| object.id() == id)
                .ok_or_else(|| EngineError::ObjectNotFound(id.to_string()))
        }

        /// 生成 `{kind}-{n}` 形式的新 id，跳过已被占用的编号。
        fn next_id(&mut self, kind: ObjectKind) -> ObjectId {
            loop {
                let candidate = ObjectId::new(format!("{kind}-{}", self.next_serial));
                self.next_serial += 1;
                if self.object(&candidate).is_none() {
                    return candidate;
                }
            }
        }

        /// 在放置点创建对象：先按现有对象吸附，再插入并选中。
        pub fn place(&mut self, kind: ObjectKind, at: Point2) -> ObjectId {
            let id = self.next_id(kind);
            let object = Object2D::new(kind, id.clone(), at);
            let snapped = snap::resolve_snap(&object, at, &self.objects, &self.settings.snap);
            let object = object.apply_patch(&ObjectPatch::center(snapped.center));
            debug!(
                id = %id,
                x = object.center().x(),
                y = object.center().y(),
                "已放置对象"
            );
            self.objects.push(object);
            self.selected = Some(id.clone());
            id
        }

        /// 追加一个外部构造的对象（归一化后）。
        pub fn insert(&mut self, object: Object2D) -> Result<(), EngineError> {
            if self.object(object.id()).is_some() {
                return Err(EngineError::DuplicateId(object.id().to_string()));
            }
            self.objects.push(object.normalized());
            Ok(())
        }

        /// 应用补丁，只有归一化后确有变化时才替换；返回是否发生变化。
        pub fn update(&mut self, id: &ObjectId, patch: &ObjectPatch) -> Result<bool, EngineError> {
            let index = self.index_of(id)?;
            let next = self.objects[index].apply_patch(patch);
            if next == self.objects[index] {
                return Ok(false);
            }
            debug!(id = %id, "对象已更新");
            self.objects[index] = next;
            Ok(true)
        }

        /// 只求解吸附，不修改场景。锁定对象不可拖拽。
        pub fn resolve_drag(&self, id: &ObjectId, proposed: Point2) -> Result<SnapResult, EngineError> {
            let object = &self.objects[self.index_of(id)?];
            if object.is_locked() {
                return Err(EngineError::ObjectLocked(id.to_string()));
            }
            Ok(snap::resolve_snap(
                object,
                proposed,
                &self.objects,
                &self.settings.snap,
            ))
        }

        /// 拖拽到候选中心：求解吸附并写回（取整后的）中心。
        pub fn drag_to(&mut self, id: &ObjectId, proposed: Point2) -> Result<SnapResult, EngineError> {
            let result = self.resolve_drag(id, proposed)?;
            self.update(id, &ObjectPatch::center(result.center))?;
            Ok(result)
        }

        /// 在当前角度上叠加旋转，结果回绕到 [0, 360)。
        pub fn rotate_by(&mut self, id: &ObjectId, delta_deg: f64) -> Result<bool, EngineError> {
            if !delta_deg.is_finite() {
                return Err(EngineError::InvalidArgument(format!(
                    "rotation delta must be finite, got {delta_deg}"
                )));
            }
            let object = &self.objects[self.index_of(id)?];
            if object.is_locked() {
                return Err(EngineError::ObjectLocked(id.to_string()));
            }
            let patch = ObjectPatch::rotation(object.rotation_deg() + delta_deg);
            self.update(id, &patch)
        }

        /// 删除对象；若其处于选中状态则一并取消选中。
        pub fn remove(&mut self, id: &ObjectId) -> Result<Object2D, EngineError> {
            let index = self.index_of(id)?;
            let removed = self.objects.remove(index);
            if self.selected.as_ref() == Some(id) {
                self.selected = None;
            }
            debug!(id = %id, "对象已删除");
            Ok(removed)
        }

        /// 选中指定对象。若对象不存在则返回错误。
        pub fn select(&mut self, id: &ObjectId) -> Result<(), EngineError> {
            self.index_of(id)?;
            self.selected = Some(id.clone());
            Ok(())
        }

        /// 取消选中指定对象，返回之前是否处于选中状态。
        pub fn deselect(&mut self, id: &ObjectId) -> bool {
            if self.selected.as_ref() == Some(id) {
                self.selected = None;
                true
            } else {
                false
            }
        }

        #[inline]
        pub fn clear_selection(&mut self) {
            self.selected = None;
        }

        #[inline]
        pub fn selected(&self) -> Option<&ObjectId> {
            self.selected.as_ref()
        }

        pub fn selected_object(&self) -> Option<&Object2D> {
            self.selected.as_ref().and_then(|id| self.object(id))
        }

        #[inline]
        pub fn snap_enabled(&self) -> bool {
            self.settings.snap.enabled
        }

        pub fn set_snap_enabled(&mut self, enabled: bool) {
            self.settings.snap.enabled = enabled;
            debug!(enabled, "吸附开关已切换");
        }

        /// 为全部对象生成标注。
        pub fn dimensions(&self) -> Vec<DimensionSegment> {
            dimensions::generate(&self.objects, &self.settings.dimensions)
        }

        /// 所有对象旋转包围盒的并集；场景为空时返回 `None`。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            for object in &self.objects {
                bounds.include_bounds(&object.bounding_box(None).to_bounds());
            }
            if bounds.is_empty() { None } else { Some(bounds) }
        }

        /// 为 CLI / 快速验证填充一组示例对象：一个平台与其左侧带右翼板的坡道。
        pub fn populate_demo(&mut self) -> DemoObjects {
            self.objects.clear();
            self.clear_selection();

            let landing_id = self.next_id(ObjectKind::Landing);
            let landing = Object2D::landing(landing_id.clone(), Point2::ORIGIN).apply_patch(
                &ObjectPatch {
                    elevation_mm: Some(300.0),
                    ..ObjectPatch::default()
                },
            );

            let ramp_id = self.next_id(ObjectKind::Ramp);
            let ramp = Object2D::ramp(ramp_id.clone(), Point2::new(-1500.0, 0.0)).apply_patch(
                &ObjectPatch {
                    has_right_wing: Some(true),
                    right_wing_size_mm: Some(300.0),
                    ..ObjectPatch::default()
                },
            );

            self.objects.push(landing);
            self.objects.push(ramp);

            let ids = DemoObjects {
                landing: landing_id,
                ramp: ramp_id,
            };
            debug!(landing = %ids.landing, ramp = %ids.ramp, "已创建演示对象");
            ids
        }
    }

    impl Default for Scene {
        fn default() -> Self {
            Self::new()
        }
    }

    #[cfg(test)]
    mod tests {
        use rampkit_core::model::{
            AnchorOrientation, AnchorPatch, DEFAULT_MEASUREMENT_OFFSET_MM, MeasurementKey,
        };

        use super::*;
        use crate::snap::SnapSource;

        #[test]
        fn demo_population_creates_objects() {
            let mut scene = Scene::new();
            let ids = scene.populate_demo();
            assert_eq!(scene.objects().len(), 2);
            assert_eq!(ids.landing.as_str(), "landing-1");
            assert_eq!(ids.ramp.as_str(), "ramp-2");
            let ramp = scene.object(&ids.ramp).expect("demo ramp");
            assert_eq!(ramp.as_ramp().map(|r| r.right_wing_size_mm), Some(300.0));
            assert!(scene.selected().is_none());
        }

        #[test]
        fn place_snaps_selects_and_numbers_ids() {
            let mut scene = Scene::new();
            let first = scene.place(ObjectKind::Landing, Point2::new(12.0, -37.0));
            assert_eq!(first.as_str(), "landing-1");
            // 网格吸附：左上角 (-588, -637) 吸附到 (-600, -600)
            assert_eq!(
                scene.object(&first).map(Object2D::center),
                Some(Point2::new(0.0, 0.0))
            );

            let second = scene.place(ObjectKind::Landing, Point2::new(1205.0, 3.0));
            assert_eq!(second.as_str(), "landing-2");
            assert_eq!(
                scene.object(&second).map(Object2D::center),
                Some(Point2::new(1200.0, 0.0))
            );
            assert_eq!(scene.selected(), Some(&second));
        }

        #[test]
        fn generated_ids_skip_loaded_ones() {
            let mut scene = Scene::new();
            scene
                .load_objects([Object2D::ramp("ramp-1", Point2::ORIGIN)])
                .expect("load");
            let id = scene.place(ObjectKind::Ramp, Point2::new(5000.0, 5000.0));
            assert_eq!(id.as_str(), "ramp-2");
        }

        #[test]
        fn duplicate_ids_are_rejected() {
            let mut scene = Scene::new();
            scene
                .insert(Object2D::landing("dup", Point2::ORIGIN))
                .expect("first insert");
            let err = scene
                .insert(Object2D::ramp("dup", Point2::ORIGIN))
                .unwrap_err();
            assert!(matches!(err, EngineError::DuplicateId(id) if id == "dup"));

            let err = scene
                .load_objects([
                    Object2D::landing("a", Point2::ORIGIN),
                    Object2D::landing("a", Point2::ORIGIN),
                ])
                .unwrap_err();
            assert!(matches!(err, EngineError::DuplicateId(_)));
            assert!(scene.objects().is_empty());
        }

        #[test]
        fn update_reports_whether_anything_changed() {
            let mut scene = Scene::new();
            let ids = scene.populate_demo();
            let unchanged = scene
                .update(&ids.landing, &ObjectPatch::center(Point2::new(0.2, -0.3)))
                .expect("update landing");
            assert!(!unchanged);

            let before = scene.dimensions();
            let default_anchor = ObjectPatch::default().with_anchor(
                MeasurementKey::L1,
                AnchorPatch {
                    offset_mm: Some(DEFAULT_MEASUREMENT_OFFSET_MM),
                    orientation: Some(AnchorOrientation::Auto),
                },
            );
            let unchanged = scene
                .update(&ids.landing, &default_anchor)
                .expect("update landing");
            assert!(!unchanged);
            assert_eq!(scene.dimensions(), before);

            let changed = scene
                .update(
                    &ids.landing,
                    &ObjectPatch::default().with_measurement(MeasurementKey::L2, true),
                )
                .expect("update landing");
            assert!(changed);

            let missing = ObjectId::from("missing");
            let err = scene.update(&missing, &ObjectPatch::default()).unwrap_err();
            assert!(matches!(err, EngineError::ObjectNotFound(_)));
        }

        #[test]
        fn drag_stores_snapped_center_and_rejects_locked_objects() {
            let mut scene = Scene::new();
            let ids = scene.populate_demo();

            // 坡道右边线（x = -600）贴近平台左边线
            let result = scene
                .drag_to(&ids.ramp, Point2::new(-1496.0, 2.0))
                .expect("drag ramp");
            assert_eq!(result.guides.x.source, SnapSource::Face);
            assert_eq!(result.center, Point2::new(-1500.0, 0.0));
            assert_eq!(
                scene.object(&ids.ramp).map(Object2D::center),
                Some(Point2::new(-1500.0, 0.0))
            );

            scene
                .update(
                    &ids.ramp,
                    &ObjectPatch {
                        locked: Some(true),
                        ..ObjectPatch::default()
                    },
                )
                .expect("lock ramp");
            let err = scene
                .drag_to(&ids.ramp, Point2::new(-3000.0, 0.0))
                .unwrap_err();
            assert!(matches!(err, EngineError::ObjectLocked(_)));
            let err = scene.rotate_by(&ids.ramp, 90.0).unwrap_err();
            assert!(matches!(err, EngineError::ObjectLocked(_)));
        }

        #[test]
        fn drag_without_snap_only_clamps() {
            let mut scene = Scene::new();
            let ids = scene.populate_demo();
            scene.set_snap_enabled(false);
            assert!(!scene.snap_enabled());
            let result = scene
                .drag_to(&ids.landing, Point2::new(20_000.0, 1234.4))
                .expect("drag landing");
            assert_eq!(result.center, Point2::new(12_500.0, 1234.4));
            assert_eq!(
                scene.object(&ids.landing).map(Object2D::center),
                Some(Point2::new(12_500.0, 1234.0))
            );
        }

        #[test]
        fn rotate_wraps_and_validates_delta() {
            let mut scene = Scene::new();
            let ids = scene.populate_demo();
            assert!(scene.rotate_by(&ids.ramp, -90.0).expect("rotate"));
            assert_eq!(
                scene.object(&ids.ramp).map(Object2D::rotation_deg),
                Some(270.0)
            );
            assert!(scene.rotate_by(&ids.ramp, 450.0).expect("rotate"));
            assert_eq!(
                scene.object(&ids.ramp).map(Object2D::rotation_deg),
                Some(0.0)
            );
            let err = scene.rotate_by(&ids.ramp, f64::NAN).unwrap_err();
            assert!(matches!(err, EngineError::InvalidArgument(_)));
        }

        #[test]
        fn selection_follows_removal() {
            let mut scene = Scene::new();
            let ids = scene.populate_demo();

            scene.select(&ids.ramp).expect("select ramp");
            assert_eq!(scene.selected_object().map(Object2D::id), Some(&ids.ramp));
            assert!(!scene.deselect(&ids.landing));

            let removed = scene.remove(&ids.ramp).expect("remove ramp");
            assert_eq!(removed.id(), &ids.ramp);
            assert!(scene.selected().is_none());
            assert_eq!(scene.objects().len(), 1);

            let err = scene.select(&ids.ramp).unwrap_err();
            assert!(matches!(err, EngineError::ObjectNotFound(_)));

            scene.select(&ids.landing).expect("select landing");
            assert!(scene.deselect(&ids.landing));
            assert!(!scene.deselect(&ids.landing));
        }

        #[test]
        fn scene_dimensions_follow_object_order() {
            let mut scene = Scene::new();
            scene.populate_demo();
            let segments = scene.dimensions();
            let labels: Vec<(&str, MeasurementKey, &str)> = segments
                .iter()
                .map(|s| (s.object_id().as_str(), s.measurement_key(), s.label()))
                .collect();
            assert_eq!(
                labels,
                vec![
                    ("landing-1", MeasurementKey::L1, "1200mm"),
                    ("landing-1", MeasurementKey::W1, "1200mm"),
                    ("landing-1", MeasurementKey::H, "300mm"),
                    ("landing-1", MeasurementKey::E, "300mm"),
                    ("ramp-2", MeasurementKey::L1, "1800mm"),
                    ("ramp-2", MeasurementKey::W1, "1000mm"),
                    ("ramp-2", MeasurementKey::WR, "300mm"),
                    ("ramp-2", MeasurementKey::H, "300mm"),
                ]
            );

            let json = serde_json::to_value(&segments[0]).expect("serialize segment");
            assert_eq!(json["kind"], "plan");
            assert_eq!(json["measurementKey"], "L1");
            assert_eq!(json["variant"], "length");
        }

        #[test]
        fn bounds_cover_all_objects() {
            let mut scene = Scene::new();
            assert!(scene.bounds().is_none());
            scene.populate_demo();
            let bounds = scene.bounds().expect("scene bounds");
            assert_eq!(bounds.min(), Point2::new(-2400.0, -600.0));
            assert_eq!(bounds.max(), Point2::new(600.0, 600.0));
        }
    }
}
