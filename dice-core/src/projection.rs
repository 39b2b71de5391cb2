/// Camera and projection utilities
use nalgebra::{Matrix4, Point3};

/// Projected vertex: screen coordinates plus normalized depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// NDC depth in [-1, 1]; smaller is nearer
    pub depth: f32,
}

/// Perspective camera sitting at the eye-space origin looking down -Z
///
/// The dice are placed directly in eye space by their model-view matrices,
/// so there is no separate view transform.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_aspect(width.max(1) as f32 / height.max(1) as f32)
    }

    pub fn with_aspect(aspect: f32) -> Self {
        Self {
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }
}

/// Project an eye-space point to screen space
///
/// Returns `None` for points on or behind the camera plane. Points outside
/// the viewport are still returned so partially visible triangles can be
/// clipped by the rasterizer.
pub fn project_to_screen(
    projection: &Matrix4<f32>,
    position_eye: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<ScreenPoint> {
    let clip = projection * position_eye.to_homogeneous();

    // Prevent division by near-zero depth values
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    Some(ScreenPoint {
        x: (ndc_x + 1.0) * 0.5 * width as f32,
        y: (1.0 - ndc_y) * 0.5 * height as f32,
        depth,
    })
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
