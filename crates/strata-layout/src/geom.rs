//! World-space geometry types. The y axis points up; the drawing plane is spanned by x and z.

pub type Unit = euclid::UnknownUnit;

pub type Point3 = euclid::Point3D<f64, Unit>;
pub type Vector3 = euclid::Vector3D<f64, Unit>;
pub type Size3 = euclid::Size3D<f64, Unit>;
pub type Point2 = euclid::Point2D<f64, Unit>;

pub fn point3(x: f64, y: f64, z: f64) -> Point3 {
    euclid::point3(x, y, z)
}

pub fn vector3(x: f64, y: f64, z: f64) -> Vector3 {
    euclid::vec3(x, y, z)
}

pub fn size3(width: f64, height: f64, depth: f64) -> Size3 {
    Size3::new(width, height, depth)
}

pub fn point2(x: f64, z: f64) -> Point2 {
    euclid::point2(x, z)
}
