//! Three-axis value type shared by raw, corrected and derived readings.

use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A value per sensor axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vector3<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Apply `f` to every axis.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vector3<U> {
        Vector3 {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }

    /// Combine two vectors axis by axis.
    pub fn zip_with<U, R>(self, other: Vector3<U>, mut f: impl FnMut(T, U) -> R) -> Vector3<R> {
        Vector3 {
            x: f(self.x, other.x),
            y: f(self.y, other.y),
            z: f(self.z, other.z),
        }
    }

    pub fn to_array(self) -> [T; 3] {
        [self.x, self.y, self.z]
    }
}

impl<T: Copy> Vector3<T> {
    pub const fn splat(value: T) -> Self {
        Self {
            x: value,
            y: value,
            z: value,
        }
    }
}

impl Vector3<i32> {
    /// Widen to `f64`. Exact over the whole `i32` range.
    pub fn as_f64(self) -> Vector3<f64> {
        self.map(|v| v as f64)
    }
}

impl Vector3<f64> {
    /// Narrow to the `f32` the signal pipeline works in.
    pub fn as_f32(self) -> Vector3<f32> {
        self.map(|v| v as f32)
    }
}

impl Vector3<f32> {
    pub const ZERO: Self = Self::splat(0.0);

    /// Euclidean norm.
    pub fn norm(self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

impl<T: Add<Output = T>> Add for Vector3<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Sub<Output = T>> Sub for Vector3<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T> From<[T; 3]> for Vector3<T> {
    fn from([x, y, z]: [T; 3]) -> Self {
        Self { x, y, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm() {
        assert_eq!(Vector3::new(3.0_f32, 4.0, 12.0).norm(), 13.0);
        assert_eq!(Vector3::<f32>::ZERO.norm(), 0.0);
    }

    #[test]
    fn test_axis_wise_arithmetic() {
        let a = Vector3::new(1.5_f32, -2.0, 8.0);
        let b = Vector3::new(0.5_f32, 2.0, -1.0);

        assert_eq!(a + b, Vector3::new(2.0, 0.0, 7.0));
        assert_eq!(a - b, Vector3::new(1.0, -4.0, 9.0));
    }

    #[test]
    fn test_integer_widening_is_exact_at_extremes() {
        let v = Vector3::new(i32::MAX, i32::MIN, 16_777_217);
        let wide = v.as_f64();

        assert_eq!(wide.map(|x| x as i32), v);
        assert_eq!(wide.z, 16_777_217.0);
    }
}
