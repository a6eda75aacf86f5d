//! Numeric Backends Interop
//! Optional conversions between crate types and ndarray/nalgebra types.
//!
//! Fully gated behind feature flags; the renderer itself only uses plain
//! buffers and its own `Transform`.

// ndarray interop
#[cfg(feature = "ndarray")]
pub mod ndarray_impl {
    use ndarray::Array3;

    use crate::core::{RenderFrame, Result, SceneError};

    impl RenderFrame {
        /// View the frame as a `(height, width, channels)` array.
        pub fn to_ndarray(&self) -> Result<Array3<u8>> {
            let (w, h) = (self.width() as usize, self.height() as usize);
            let data = self.data();
            let channels = if w * h == 0 { 0 } else { data.len() / (w * h) };
            Array3::from_shape_vec((h, w, channels), data.to_vec())
                .map_err(|e| SceneError::InvalidFrame(format!("frame does not fit {}x{}: {}", w, h, e)))
        }

        /// Build an RGBA frame from a `(height, width, 4)` array.
        pub fn from_ndarray(arr: &Array3<u8>) -> Result<Self> {
            let (h, w, c) = arr.dim();
            if c != 3 && c != 4 {
                return Err(SceneError::InvalidFrame(format!("expected 3 or 4 channels, got {}", c)));
            }
            Ok(RenderFrame::Pixels { width: w as u32, height: h as u32, data: arr.iter().copied().collect() })
        }
    }
}

// nalgebra interop
#[cfg(feature = "nalgebra")]
pub mod nalgebra_impl {
    use nalgebra::Matrix3;

    use crate::utils::render2d::Transform;

    impl Transform {
        /// Homogeneous 3×3 matrix acting on column vectors `(x, y, 1)`.
        pub fn to_nalgebra(&self) -> Matrix3<f64> {
            Matrix3::new(
                self.a, self.c, self.e,
                self.b, self.d, self.f,
                0.0, 0.0, 1.0,
            )
        }

        /// Inverse of [`to_nalgebra`](Self::to_nalgebra); the projective row is ignored.
        pub fn from_nalgebra(m: &Matrix3<f64>) -> Self {
            Transform::new(m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)])
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::utils::render2d::Point;
        use nalgebra::Vector3;

        #[test]
        fn matrix_product_matches_transform_apply() {
            let t = Transform::from_scale(2.0, 2.0).translated(0.0, 50.0).scaled(1.0, -1.0);
            let p = Point::new(3.0, 4.0);
            let v = t.to_nalgebra() * Vector3::new(p.x, p.y, 1.0);
            let q = t.apply(p);
            assert!((v.x - q.x).abs() < 1e-12 && (v.y - q.y).abs() < 1e-12);
            assert_eq!(Transform::from_nalgebra(&t.to_nalgebra()), t);
        }
    }
}
