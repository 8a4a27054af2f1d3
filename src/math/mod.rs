mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;
