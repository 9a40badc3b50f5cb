pub mod model;

pub mod units {
    /// 屏幕像素与毫米的固定换算比例，仅供调用方在渲染层使用。
    pub const MM_PER_PX: f64 = 10.0;

    pub const DEFAULT_SNAP_INCREMENT_MM: f64 = 100.0;
    pub const GRID_STEP_MM: f64 = DEFAULT_SNAP_INCREMENT_MM;
    pub const SNAP_INCREMENT_OPTIONS_MM: [f64; 4] = [1.0, 10.0, 100.0, 1000.0];

    #[inline]
    pub fn mm_to_px(mm: f64) -> f64 {
        mm / MM_PER_PX
    }

    #[inline]
    pub fn px_to_mm(px: f64) -> f64 {
        px * MM_PER_PX
    }

    /// 四舍五入，`.5` 一律向正无穷方向进位（负数 -2.5 得到 -2）。
    #[inline]
    pub fn round_half_up(value: f64) -> f64 {
        (value + 0.5).floor()
    }

    /// 将毫米值吸附到最近的步长倍数。步长非正时原样返回。
    pub fn snap_mm(mm: f64, step_mm: f64) -> f64 {
        if step_mm <= 0.0 || !step_mm.is_finite() {
            return mm;
        }
        round_half_up(mm / step_mm) * step_mm
    }

    /// 判断步长是否为编辑器支持的网格增量。
    pub fn is_supported_increment(step_mm: f64) -> bool {
        SNAP_INCREMENT_OPTIONS_MM.contains(&step_mm)
    }
}

pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维点（毫米），内部以 `glam::DVec2` 表示。屏幕坐标系，y 轴向下。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        pub const ORIGIN: Point2 = Point2(DVec2::ZERO);

        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        /// 绕原点旋转（角度制）。
        #[inline]
        pub fn rotated(self, rotation_deg: f64) -> Self {
            Self(rotate_point(self.x(), self.y(), rotation_deg))
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维向量，用于偏移量、外法线等。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        pub const ZERO: Vector2 = Vector2(DVec2::ZERO);

        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn scale(self, factor: f64) -> Self {
            Self(self.0 * factor)
        }

        #[inline]
        pub fn rotated(self, rotation_deg: f64) -> Self {
            Self(rotate_point(self.x(), self.y(), rotation_deg))
        }

        /// 归一化；零向量返回零向量而不是 NaN。
        pub fn normalize_or_zero(self) -> Self {
            let len = self.0.length();
            if len == 0.0 {
                Self::ZERO
            } else {
                Self(self.0 / len)
            }
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 绕原点旋转 `(x, y)`。角度为 0 时直接返回原值，避免引入浮点噪声。
    pub fn rotate_point(x: f64, y: f64, rotation_deg: f64) -> DVec2 {
        if rotation_deg == 0.0 {
            return DVec2::new(x, y);
        }
        let (sin, cos) = rotation_deg.to_radians().sin_cos();
        DVec2::new(x * cos - y * sin, x * sin + y * cos)
    }

    /// 轴对齐边界框，用于累积旋转后的角点或整个场景范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            self.min = Point2::from_vec(self.min.as_vec2().min(point.as_vec2()));
            self.max = Point2::from_vec(self.max.as_vec2().max(point.as_vec2()));
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            Point2::from_vec((self.min.as_vec2() + self.max.as_vec2()) * 0.5)
        }
    }

    /// 未旋转的局部外形尺寸：`width_mm` 沿局部 x 轴，`height_mm` 沿局部 y 轴。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Footprint {
        pub width_mm: f64,
        pub height_mm: f64,
    }

    impl Footprint {
        #[inline]
        pub fn new(width_mm: f64, height_mm: f64) -> Self {
            Self {
                width_mm,
                height_mm,
            }
        }

        #[inline]
        pub fn half_extents(self) -> Vector2 {
            Vector2::new(self.width_mm / 2.0, self.height_mm / 2.0)
        }
    }

    #[inline]
    pub fn top_left_from_center(center: Point2, footprint: Footprint) -> Point2 {
        Point2::from_vec(center.as_vec2() - footprint.half_extents().as_vec2())
    }

    #[inline]
    pub fn center_from_top_left(top_left: Point2, footprint: Footprint) -> Point2 {
        top_left.translate(footprint.half_extents())
    }

    /// 九个兴趣点的命名，按行优先排列（上、中、下）。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PoiKind {
        TopLeft,
        TopCenter,
        TopRight,
        MiddleLeft,
        Center,
        MiddleRight,
        BottomLeft,
        BottomCenter,
        BottomRight,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct PointOfInterest {
        pub kind: PoiKind,
        pub point: Point2,
    }

    /// 旋转后对象在屏幕上的轴对齐包围盒，附带对象中心。
    ///
    /// 只覆盖主体矩形，不包含坡道翼板等延伸部分。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct BoundingBoxMm {
        pub left: f64,
        pub right: f64,
        pub top: f64,
        pub bottom: f64,
        pub center_x: f64,
        pub center_y: f64,
    }

    impl BoundingBoxMm {
        /// 由外形、旋转角与中心点计算：四角先绕原点旋转再平移，最后取极值。
        pub fn rotated(center: Point2, footprint: Footprint, rotation_deg: f64) -> Self {
            let half = footprint.half_extents();
            let corners = [
                (-half.x(), -half.y()),
                (half.x(), -half.y()),
                (half.x(), half.y()),
                (-half.x(), half.y()),
            ];
            let mut bounds = Bounds2D::empty();
            for (x, y) in corners {
                let rotated = rotate_point(x, y, rotation_deg);
                bounds.include_point(Point2::from_vec(rotated + center.as_vec2()));
            }
            Self {
                left: bounds.min().x(),
                right: bounds.max().x(),
                top: bounds.min().y(),
                bottom: bounds.max().y(),
                center_x: center.x(),
                center_y: center.y(),
            }
        }

        #[inline]
        pub fn width(&self) -> f64 {
            self.right - self.left
        }

        #[inline]
        pub fn height(&self) -> f64 {
            self.bottom - self.top
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            Point2::new(self.center_x, self.center_y)
        }

        #[inline]
        pub fn top_left(&self) -> Point2 {
            Point2::new(self.left, self.top)
        }

        #[inline]
        pub fn footprint(&self) -> Footprint {
            Footprint::new(self.width(), self.height())
        }

        #[inline]
        pub fn to_bounds(&self) -> Bounds2D {
            Bounds2D::new(
                Point2::new(self.left, self.top),
                Point2::new(self.right, self.bottom),
            )
        }

        /// x 轴上的三条代表线：左边、中心、右边。
        #[inline]
        pub fn lines_x(&self) -> [f64; 3] {
            [self.left, self.center_x, self.right]
        }

        /// y 轴上的三条代表线：上边、中心、下边。
        #[inline]
        pub fn lines_y(&self) -> [f64; 3] {
            [self.top, self.center_y, self.bottom]
        }

        pub fn points_of_interest(&self) -> [PointOfInterest; 9] {
            let poi = |kind, x, y| PointOfInterest {
                kind,
                point: Point2::new(x, y),
            };
            [
                poi(PoiKind::TopLeft, self.left, self.top),
                poi(PoiKind::TopCenter, self.center_x, self.top),
                poi(PoiKind::TopRight, self.right, self.top),
                poi(PoiKind::MiddleLeft, self.left, self.center_y),
                poi(PoiKind::Center, self.center_x, self.center_y),
                poi(PoiKind::MiddleRight, self.right, self.center_y),
                poi(PoiKind::BottomLeft, self.left, self.bottom),
                poi(PoiKind::BottomCenter, self.center_x, self.bottom),
                poi(PoiKind::BottomRight, self.right, self.bottom),
            ]
        }
    }

}
