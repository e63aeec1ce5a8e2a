//! Full pipeline: build, extract, export, preview

use std::fs;

use glam::{IVec3, Vec3};
use tempfile::TempDir;

use voxsculpt::config::JobConfig;
use voxsculpt::core::Error;
use voxsculpt::export::{self, ExportFormat};
use voxsculpt::math::Aabb;
use voxsculpt::mesh::{extract, extract_to_file, ExtractOptions, TriMesh};
use voxsculpt::models::{self, ModelKind, RecipeOptions};
use voxsculpt::render::{self, RenderMode, ViewOptions};
use voxsculpt::voxel::{BlendMode, GridBuilder, Palette, StampShape, VoxelGrid};

fn red() -> Palette {
    Palette::from_colors([(1, "red", 1.0)]).unwrap()
}

#[test]
fn sphere_stays_inside_its_cells() {
    let mut grid = VoxelGrid::new(10, 10, 10).unwrap();
    grid.stamp(&StampShape::sphere(IVec3::splat(5), 3), 1, BlendMode::Replace);

    let out = extract(&grid, &red(), &ExtractOptions::default()).unwrap();
    let mesh = out.mesh;
    assert!(mesh.vertex_count() > 0);
    assert!(mesh.face_count() > 0);
    assert!(mesh.is_valid());
    let cells = Aabb::new(Vec3::splat(1.0), Vec3::splat(9.0));
    for p in &mesh.positions {
        assert!(cells.contains_point(*p), "vertex {p} escapes [1, 9]");
    }
    assert!(mesh.bounds().is_some_and(|b| cells.contains_point(b.min) && cells.contains_point(b.max)));
    assert_eq!(mesh.materials.len(), 1);
    assert_eq!(mesh.materials[0].name, "label_1");
}

#[test]
fn zero_extent_grid_is_rejected() {
    assert!(matches!(VoxelGrid::new(0, 4, 4), Err(Error::InvalidGrid(_))));
    assert!(matches!(VoxelGrid::from_labels(2, 2, 2, vec![0; 7]), Err(Error::InvalidGrid(_))));
}

#[test]
fn padding_keeps_surface_off_the_outer_boundary() {
    let grid = GridBuilder::new(5, 5, 5)
        .cuboid(IVec3::ZERO, IVec3::splat(5), 1)
        .build()
        .unwrap();

    for pad in 1..3 {
        let mesh = extract(&grid, &red(), &ExtractOptions::with_padding(pad)).unwrap().mesh;
        let lo = -(pad as f32);
        let hi = 4.0 + pad as f32;
        assert!(mesh.positions.iter().all(|p| p.min_element() > lo && p.max_element() < hi));
    }

    // a grid filled edge to edge has no inside/outside transition without padding
    let bare = extract(&grid, &red(), &ExtractOptions::with_padding(0)).unwrap().mesh;
    assert!(bare.is_empty());
}

#[test]
fn extract_to_file_writes_obj_and_mtl() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sphere.obj");
    let mut grid = VoxelGrid::new(8, 8, 8).unwrap();
    grid.stamp(&StampShape::sphere(IVec3::splat(4), 2), 1, BlendMode::Replace);
    grid.set(0, 0, 0, 3);

    let out = extract_to_file(&grid, &red(), &ExtractOptions::default(), &path).unwrap();
    assert_eq!(out.missing_labels, vec![3]);

    let obj = fs::read_to_string(&path).unwrap();
    let mtl = fs::read_to_string(dir.path().join("sphere.mtl")).unwrap();
    assert!(obj.contains("mtllib sphere.mtl"));
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), out.mesh.vertex_count());
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), out.mesh.face_count());
    assert!(mtl.contains("newmtl label_1"));
    assert!(mtl.contains("newmtl label_3"));
    assert!(mtl.contains("Kd 1.0000 0.0000 0.0000"));
}

#[test]
fn export_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("missing").join("out.glb");
    let err = export::write_mesh(&TriMesh::default(), &target).unwrap_err();
    match err {
        Error::Export { path, .. } => assert_eq!(path, target),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn every_model_builds_exports_and_renders() {
    let dir = TempDir::new().unwrap();
    let recipe = RecipeOptions { seed: 42, colored: true, ..Default::default() };

    for kind in ModelKind::ALL {
        let model = models::build(kind, &recipe).unwrap();
        let view = ViewOptions { width: 96, height: 72, ..model.view().clone() };
        let out = model.into_mesh(&ExtractOptions::default()).unwrap();
        assert!(!out.mesh.is_empty(), "{kind} produced no faces");
        assert!(out.mesh.is_valid(), "{kind} produced an invalid mesh");
        assert!(out.missing_labels.is_empty(), "{kind} has unmapped labels");

        for format in [ExportFormat::Obj, ExportFormat::Glb] {
            let path = dir.path().join(format!("{kind}.{}", format.extension()));
            export::write_mesh_as(&out.mesh, &path, format).unwrap();
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }

        let image = render::render_preview(&out.mesh, &view);
        let background = view.background.to_array();
        assert!(image.pixels().any(|p| p.0 != background), "{kind} preview is blank");
    }
}

#[test]
fn seeded_spaceship_is_reproducible() {
    let recipe = RecipeOptions { seed: 42, ..Default::default() };
    let a = models::build(ModelKind::PrimitiveSpaceship, &recipe).unwrap();
    let b = models::build(ModelKind::PrimitiveSpaceship, &recipe).unwrap();
    let a = a.into_mesh(&ExtractOptions::default()).unwrap().mesh;
    let b = b.into_mesh(&ExtractOptions::default()).unwrap().mesh;
    assert_eq!(a, b);
}

#[test]
fn config_drives_a_job() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("ship.glb");
    let preview = dir.path().join("ship.png");
    let json = format!(
        r#"{{
            "model": "voxel-spaceship",
            "output": {:?},
            "preview": {:?},
            "palette": {{ "entries": {{ "1": {{ "color": "gold" }} }} }},
            "view": {{ "width": 64, "height": 64, "mode": "both" }}
        }}"#,
        output.to_string_lossy(),
        preview.to_string_lossy()
    );
    let job = JobConfig::from_json(&json).unwrap();
    assert_eq!(job.resolved_format(), ExportFormat::Glb);

    let mut model = models::build(job.model, &job.recipe).unwrap();
    model.merge_palette(&job.palette);
    let out = model.into_mesh(&job.extract).unwrap();
    let fuselage = out.mesh.materials.iter().find(|m| m.label == Some(1)).unwrap();
    assert_eq!(fuselage.appearance.color.to_hex(), "#ffd700");

    export::write_mesh_as(&out.mesh, &job.resolved_output(), job.resolved_format()).unwrap();
    let view = job.view.clone().unwrap();
    assert_eq!(view.mode, RenderMode::Both);
    render::save_preview(&out.mesh, &view, job.preview.as_ref().unwrap()).unwrap();

    let glb = fs::read(&output).unwrap();
    assert_eq!(&glb[0..4], b"glTF");
    assert_eq!(image::open(&preview).unwrap().width(), 64);
}

#[test]
fn primitive_concatenation_keeps_every_part() {
    let params = models::CakeParams { layers: 3, candles: 4, colored: true };
    let mesh = models::primitive_cake::build_mesh(&params);
    let top = mesh.bounds().unwrap().max;
    assert!(top.z > 1.0);
    // 3 tiers (66 verts) + 4 candles (26) + 4 flames (42) + cherry (162)
    assert_eq!(mesh.vertex_count(), 3 * 66 + 4 * (26 + 42) + 162);
    assert!(mesh.faces.iter().flatten().all(|&i| (i as usize) < mesh.vertex_count()));
    assert!((top.x - 1.5).abs() < 1e-6);
}
