//! Software-rasterised static previews
//!
//! Meshes are drawn with an orthographic isometric camera framing their
//! bounds, flat Lambert shading and a depth buffer. Opaque faces are drawn
//! first; translucent faces are then blended back to front.

use std::path::Path;

use glam::{Mat4, Vec2, Vec3};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::mesh::TriMesh;
use crate::voxel::palette::Rgba;

/// Which parts of the mesh to draw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Solid,
    Wireframe,
    Both,
}

impl RenderMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "solid" => Some(RenderMode::Solid),
            "wireframe" | "wire" => Some(RenderMode::Wireframe),
            "both" => Some(RenderMode::Both),
            _ => None,
        }
    }

    fn draws_faces(self) -> bool {
        matches!(self, RenderMode::Solid | RenderMode::Both)
    }

    fn draws_edges(self) -> bool {
        matches!(self, RenderMode::Wireframe | RenderMode::Both)
    }
}

/// Preview image settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    pub mode: RenderMode,
    pub wireframe_color: Rgba,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgba::WHITE,
            mode: RenderMode::Solid,
            wireframe_color: Rgba::BLACK,
        }
    }
}

/// Direction from the scene toward the camera
const VIEW_DIR: Vec3 = Vec3::new(1.0, -1.0, 0.8);
/// Direction toward the key light
const LIGHT_DIR: Vec3 = Vec3::new(0.4, -0.6, 1.0);
const AMBIENT: f32 = 0.35;
/// Fraction of the image left free around the framed mesh
const MARGIN: f32 = 0.08;
/// Lines pass the depth test this far in front of a coincident surface
const LINE_DEPTH_BIAS: f32 = 1e-3;

/// Orthographic projection from model space to pixel space plus depth
struct Projection {
    view: Mat4,
    scale: f32,
    center: Vec2,
    screen_center: Vec2,
}

impl Projection {
    fn framing(mesh: &TriMesh, width: u32, height: u32) -> Self {
        let bounds = mesh.bounds().unwrap_or_default();
        let target = bounds.center();
        let radius = bounds.size().length().max(1.0);
        let eye = target + VIEW_DIR.normalize() * radius * 2.0;
        let view = Mat4::look_at_rh(eye, target, Vec3::Z);

        let (mut lo, mut hi) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
        for p in &mesh.positions {
            let v = view.transform_point3(*p).truncate();
            lo = lo.min(v);
            hi = hi.max(v);
        }
        let extent = (hi - lo).max(Vec2::splat(1e-6));
        let usable = Vec2::new(width as f32, height as f32) * (1.0 - 2.0 * MARGIN);
        let scale = (usable.x / extent.x).min(usable.y / extent.y);

        Self {
            view,
            scale,
            center: (lo + hi) * 0.5,
            screen_center: Vec2::new(width as f32, height as f32) * 0.5,
        }
    }

    /// Pixel x, pixel y (down), depth (larger is farther)
    fn project(&self, p: Vec3) -> Vec3 {
        let v = self.view.transform_point3(p);
        let s = (v.truncate() - self.center) * self.scale;
        Vec3::new(self.screen_center.x + s.x, self.screen_center.y - s.y, -v.z)
    }
}

/// Color and depth buffers
struct Canvas {
    width: u32,
    height: u32,
    color: Vec<[f32; 4]>,
    depth: Vec<f32>,
}

impl Canvas {
    fn new(width: u32, height: u32, background: Rgba) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![background.to_f32(); n],
            depth: vec![f32::INFINITY; n],
        }
    }

    fn blend(&mut self, i: usize, src: [f32; 4]) {
        let a = src[3];
        let dst = &mut self.color[i];
        for c in 0..3 {
            dst[c] = dst[c] * (1.0 - a) + src[c] * a;
        }
        dst[3] = dst[3] + a * (1.0 - dst[3]);
    }

    fn fill_triangle(&mut self, pts: [Vec3; 3], color: [f32; 4], write_depth: bool) {
        let [a, b, c] = pts;
        let area = edge(a, b, c);
        if area.abs() < 1e-9 {
            return;
        }
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil() as i64).clamp(0, self.width as i64) as u32;
        let max_y = (a.y.max(b.y).max(c.y).ceil() as i64).clamp(0, self.height as i64) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                // normalised barycentrics; sign of `area` absorbs winding
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let z = w0 * a.z + w1 * b.z + w2 * c.z;
                let i = (y * self.width + x) as usize;
                if z >= self.depth[i] {
                    continue;
                }
                self.blend(i, color);
                if write_depth {
                    self.depth[i] = z;
                }
            }
        }
    }

    fn draw_line(&mut self, a: Vec3, b: Vec3, color: [f32; 4], depth_test: bool) {
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as u32;
        for s in 0..=steps {
            let p = a.lerp(b, s as f32 / steps as f32);
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x as u32, p.y as u32);
            if x >= self.width || y >= self.height {
                continue;
            }
            let i = (y * self.width + x) as usize;
            if depth_test && p.z > self.depth[i] + LINE_DEPTH_BIAS * p.z.abs().max(1.0) {
                continue;
            }
            self.blend(i, color);
        }
    }

    fn into_image(self) -> RgbaImage {
        let width = self.width;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.color[(y * width + x) as usize];
            image::Rgba(c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8))
        })
    }
}

/// Signed doubled area of `(a, b, p)` in screen space
fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Render `mesh` to an RGBA image
pub fn render_preview(mesh: &TriMesh, view: &ViewOptions) -> RgbaImage {
    let (width, height) = (view.width.max(1), view.height.max(1));
    let mut canvas = Canvas::new(width, height, view.background);
    if mesh.is_empty() {
        return canvas.into_image();
    }

    let projection = Projection::framing(mesh, width, height);
    let screen: Vec<Vec3> = mesh.positions.iter().map(|&p| projection.project(p)).collect();
    let corners = |f: [u32; 3]| f.map(|i| screen[i as usize]);

    if view.mode.draws_faces() {
        let normals = mesh.face_normals();
        let to_eye = VIEW_DIR.normalize();
        let light = LIGHT_DIR.normalize();

        let shade = |face: usize| -> [f32; 4] {
            let mut n = normals[face];
            if n.dot(to_eye) < 0.0 {
                n = -n;
            }
            let intensity = AMBIENT + (1.0 - AMBIENT) * n.dot(light).max(0.0);
            let [r, g, b, a] = mesh.face_color(face).to_f32();
            [r * intensity, g * intensity, b * intensity, a]
        };

        let (opaque, mut translucent): (Vec<usize>, Vec<usize>) =
            (0..mesh.face_count()).partition(|&f| mesh.face_color(f).a == 255);

        for face in opaque {
            canvas.fill_triangle(corners(mesh.faces[face]), shade(face), true);
        }

        let depth_of = |f: usize| corners(mesh.faces[f]).iter().map(|p| p.z).sum::<f32>();
        translucent.sort_by(|&a, &b| depth_of(b).total_cmp(&depth_of(a)));
        for face in translucent {
            canvas.fill_triangle(corners(mesh.faces[face]), shade(face), false);
        }
    }

    if view.mode.draws_edges() {
        let color = view.wireframe_color.to_f32();
        let depth_test = view.mode.draws_faces();
        for &face in &mesh.faces {
            let [a, b, c] = corners(face);
            canvas.draw_line(a, b, color, depth_test);
            canvas.draw_line(b, c, color, depth_test);
            canvas.draw_line(c, a, color, depth_test);
        }
    }

    log::debug!(
        "Rendered {} faces at {}x{} ({:?})",
        mesh.face_count(),
        width,
        height,
        view.mode
    );
    canvas.into_image()
}

/// Render `mesh` and save it as a PNG
pub fn save_preview(mesh: &TriMesh, view: &ViewOptions, path: &Path) -> Result<()> {
    let image = render_preview(mesh, view);
    image.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("Saved preview {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Material, primitives};
    use crate::voxel::palette::Appearance;

    fn small(mode: RenderMode) -> ViewOptions {
        ViewOptions {
            width: 64,
            height: 48,
            mode,
            ..Default::default()
        }
    }

    fn pixel(image: &RgbaImage, x: u32, y: u32) -> Rgba {
        Rgba::from_array(image.get_pixel(x, y).0)
    }

    #[test]
    fn test_empty_mesh_is_background() {
        let view = ViewOptions {
            background: Rgba::rgb(10, 20, 30),
            ..small(RenderMode::Both)
        };
        let image = render_preview(&TriMesh::default(), &view);
        assert_eq!((image.width(), image.height()), (64, 48));
        assert!(image.pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn test_solid_cube_fills_center() {
        let mut cube = primitives::cuboid(Vec3::ONE);
        cube.paint(Rgba::rgb(200, 0, 0));
        let image = render_preview(&cube, &small(RenderMode::Solid));
        let center = pixel(&image, 32, 24);
        assert_ne!(center, Rgba::WHITE);
        assert!(center.r > center.g);
        assert_eq!(pixel(&image, 0, 0), Rgba::WHITE);
    }

    #[test]
    fn test_wireframe_draws_lines_only() {
        let view = ViewOptions {
            wireframe_color: Rgba::rgb(0, 255, 0),
            ..small(RenderMode::Wireframe)
        };
        let image = render_preview(&primitives::cuboid(Vec3::ONE), &view);
        let green = image.pixels().filter(|p| p.0 == [0, 255, 0, 255]).count();
        let other = image
            .pixels()
            .filter(|p| p.0 != [0, 255, 0, 255] && p.0 != [255, 255, 255, 255])
            .count();
        assert!(green > 0);
        assert_eq!(other, 0);
    }

    #[test]
    fn test_translucent_blends_with_background() {
        let mut cube = primitives::cuboid(Vec3::ONE);
        cube.set_material(Material::new("glass", Appearance::new(Rgba::rgb(0, 0, 0), 0.5)));
        let image = render_preview(&cube, &small(RenderMode::Solid));
        let center = pixel(&image, 32, 24);
        assert!(center.r > 0 && center.r < 255);
    }

    #[test]
    fn test_render_mode_names() {
        assert_eq!(RenderMode::from_name("Both"), Some(RenderMode::Both));
        assert_eq!(RenderMode::from_name("wire"), Some(RenderMode::Wireframe));
        assert_eq!(RenderMode::from_name("shaded"), None);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        save_preview(&primitives::icosphere(1, 1.0), &small(RenderMode::Both), &path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 64);
    }
}
