/// ASCII rasterizer for terminal rendering
///
/// Runs both shading stages on the CPU: a vertex stage that transforms
/// each vertex and evaluates lighting when per-vertex shading is selected,
/// and a fragment stage that evaluates it per cell otherwise.
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use dice_core::lighting::shade_point;
use dice_core::projection::project_to_screen;
use dice_core::{CubeEntity, LightUniforms, RenderBackend, ScreenPoint, SurfacePoint, Vertex};
use nalgebra::{Matrix4, Vector3, Vector4};
use std::convert::Infallible;
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const VERTEX_STAGE: i32 = 1;
const FRAGMENT_STAGE: i32 = 0;

/// One shaded terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    /// Final RGB in [0, 1]
    pub color: Vector3<f32>,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        color: Vector3::new(0.0, 0.0, 0.0),
    };

    fn shaded(color: Vector3<f32>) -> Self {
        let clamped = color.map(|c| c.clamp(0.0, 1.0));
        let luminance = 0.2126 * clamped.x + 0.7152 * clamped.y + 0.0722 * clamped.z;
        // Covered cells never use the blank glyph
        let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
        let index = 1 + (luminance * steps).round() as usize;
        Self {
            glyph: LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)],
            color: clamped,
        }
    }

    fn terminal_color(&self) -> Color {
        Color::Rgb {
            r: (self.color.x * 255.0) as u8,
            g: (self.color.y * 255.0) as u8,
            b: (self.color.z * 255.0) as u8,
        }
    }
}

/// Vertex stage output, the varyings handed to the fragment stage
#[derive(Debug, Clone, Copy)]
struct Varyings {
    screen: ScreenPoint,
    color: Vector4<f32>,
    local: Vector4<f32>,
    normal: Vector3<f32>,
}

/// ASCII renderer that converts the dice to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    projection: Matrix4<f32>,
    depth_buffer: Vec<f32>,
    cell_buffer: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            projection: Matrix4::identity(),
            depth_buffer: vec![f32::INFINITY; size],
            cell_buffer: vec![Cell::EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate the buffers for a new terminal size
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            projection: self.projection,
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cell_buffer.fill(Cell::EMPTY);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cell_buffer.get(y * self.width + x)
    }

    pub fn covered_cells(&self) -> usize {
        self.cell_buffer.iter().filter(|c| c.glyph != ' ').count()
    }

    pub fn render_cube(&mut self, cube: &CubeEntity, model_view: &Matrix4<f32>, uniforms: &LightUniforms) {
        for triangle in cube.mesh.triangles() {
            let [a, b, c] = triangle
                .vertices
                .map(|vertex| self.vertex_stage(&vertex, &cube.color, model_view, uniforms));
            // Triangles crossing the camera plane are dropped
            if let (Some(v0), Some(v1), Some(v2)) = (a, b, c) {
                self.rasterize_triangle(&[v0, v1, v2], model_view, uniforms);
            }
        }
    }

    fn vertex_stage(
        &self,
        vertex: &Vertex,
        color: &Vector4<f32>,
        model_view: &Matrix4<f32>,
        uniforms: &LightUniforms,
    ) -> Option<Varyings> {
        let normal = (model_view.fixed_view::<3, 3>(0, 0) * vertex.normal).normalize();
        let position_eye = model_view.transform_point(&vertex.position);
        let local = vertex.homogeneous();

        let light = shade_point(
            uniforms.shading,
            VERTEX_STAGE,
            uniforms.light_model,
            uniforms.damping_function,
            &SurfacePoint::new(normal, position_eye.coords, local),
            &Vector3::from(uniforms.light_direction),
            uniforms.light_power,
            uniforms.light_shininess,
        );

        let screen = project_to_screen(
            &self.projection,
            &position_eye,
            self.width as u32,
            self.height as u32,
        )?;

        let mut lit = *color;
        lit.x *= light;
        lit.y *= light;
        lit.z *= light;

        Some(Varyings {
            screen,
            color: lit,
            local,
            normal,
        })
    }

    fn fragment_stage(
        &self,
        varyings: &Varyings,
        model_view: &Matrix4<f32>,
        uniforms: &LightUniforms,
    ) -> Vector3<f32> {
        let position_eye = (model_view * varyings.local).xyz();

        let light = shade_point(
            uniforms.shading,
            FRAGMENT_STAGE,
            uniforms.light_model,
            uniforms.damping_function,
            &SurfacePoint::new(varyings.normal, position_eye, varyings.local),
            &Vector3::from(uniforms.light_direction),
            uniforms.light_power,
            uniforms.light_shininess,
        );

        varyings.color.xyz() * light
    }

    fn rasterize_triangle(&mut self, corners: &[Varyings; 3], model_view: &Matrix4<f32>, uniforms: &LightUniforms) {
        let [v0, v1, v2] = corners;
        let (p0, p1, p2) = (v0.screen, v1.screen, v2.screen);

        // Bounding box
        let min_x = p0.x.min(p1.x).min(p2.x).floor() as i32;
        let max_x = p0.x.max(p1.x).max(p2.x).ceil() as i32;
        let min_y = p0.y.min(p1.y).min(p2.y).floor() as i32;
        let max_y = p0.y.max(p1.y).max(p2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((p0.x, p0.y), (p1.x, p1.y), (p2.x, p2.y), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * p0.depth + w1 * p1.depth + w2 * p2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth > self.depth_buffer[idx] {
                    continue;
                }

                let interpolated = Varyings {
                    screen: ScreenPoint { x: px, y: py, depth },
                    color: v0.color * w0 + v1.color * w1 + v2.color * w2,
                    local: v0.local * w0 + v1.local * w1 + v2.local * w2,
                    normal: v0.normal * w0 + v1.normal * w1 + v2.normal * w2,
                };
                let color = self.fragment_stage(&interpolated, model_view, uniforms);

                self.depth_buffer[idx] = depth;
                self.cell_buffer[idx] = Cell::shaded(color);
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = &self.cell_buffer[y * self.width + x];
                if cell.glyph != ' ' {
                    writer.queue(SetForegroundColor(cell.terminal_color()))?;
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    type Error = Infallible;

    fn begin_frame(&mut self, projection: &Matrix4<f32>) -> Result<(), Self::Error> {
        self.projection = *projection;
        self.clear();
        Ok(())
    }

    fn draw_cube(
        &mut self,
        cube: &CubeEntity,
        model_view: &Matrix4<f32>,
        uniforms: &LightUniforms,
    ) -> Result<(), Self::Error> {
        self.render_cube(cube, model_view, uniforms);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
