//! layout::geometry
//!
//! Plain 2-D value types shared by the position calculator and the router.

use serde::{Serialize, Serializer};

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3-D cross product.
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Point) -> f64 {
        self.sub(other).length()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        (len > f64::EPSILON).then(|| self.scale(1.0 / len))
    }

    /// The vector rotated by 90 degrees counter-clockwise.
    pub fn perpendicular(self) -> Point {
        Point::new(-self.y, self.x)
    }
}

/// Point at parameter `t` on the cubic Bezier `p0`..`p3`.
pub fn cubic_point(p: [Point; 4], t: f64) -> Point {
    let u = 1.0 - t;
    p[0].scale(u * u * u)
        .add(p[1].scale(3.0 * u * u * t))
        .add(p[2].scale(3.0 * u * t * t))
        .add(p[3].scale(t * t * t))
}

/// Endpoints of a cubic Bezier plus its interior axis extrema.
///
/// The box around these points is the tight box around the curve;
/// control points can lie outside it.
pub fn cubic_extrema(p: [Point; 4]) -> Vec<Point> {
    let axes: [fn(Point) -> f64; 2] = [|q| q.x, |q| q.y];
    let mut ts = Vec::new();
    for axis in axes {
        let [p0, p1, p2, p3] = p.map(axis);
        // derivative / 3 = a t^2 + b t + c
        let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
        let b = 2.0 * (p0 - 2.0 * p1 + p2);
        let c = p1 - p0;
        if a.abs() < 1e-12 {
            if b.abs() > 1e-12 {
                ts.push(-c / b);
            }
        } else {
            let disc = b * b - 4.0 * a * c;
            if disc >= 0.0 {
                let root = disc.sqrt();
                ts.push((-b + root) / (2.0 * a));
                ts.push((-b - root) / (2.0 * a));
            }
        }
    }

    let mut points = vec![p[0], p[3]];
    points.extend(
        ts.into_iter()
            .filter(|t| *t > 0.0 && *t < 1.0)
            .map(|t| cubic_point(p, t)),
    );
    points
}

/// Distance from `p` to the closed segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b.sub(a);
    let len_sq = ab.dot(ab);
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (p.sub(a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a.add(ab.scale(t)))
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// A rectangle that contains nothing; the first `include` defines it.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Include a box of the given half extents centered on `center`.
    pub fn include_box(&mut self, center: Point, half_width: f64, half_height: f64) {
        self.include(Point::new(center.x - half_width, center.y - half_height));
        self.include(Point::new(center.x + half_width, center.y + half_height));
    }

    /// Grow by `padding` on every side. An empty rectangle becomes a
    /// `2 * padding` square at the origin.
    pub fn padded(self, padding: f64) -> Self {
        if self.is_empty() {
            return Self {
                min_x: -padding,
                min_y: -padding,
                max_x: padding,
                max_y: padding,
            };
        }
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

impl Serialize for Bounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("Bounds", 4)?;
        s.serialize_field("x", &self.min_x)?;
        s.serialize_field("y", &self.min_y)?;
        s.serialize_field("width", &self.width())?;
        s.serialize_field("height", &self.height())?;
        s.end()
    }
}
