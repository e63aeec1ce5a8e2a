//! Model generation utility.
//!
//! Builds one of the built-in models, writes it as OBJ or GLB and optionally
//! renders a PNG preview.

use std::path::PathBuf;
use std::time::Instant;

use voxsculpt::config::JobConfig;
use voxsculpt::core::logging;
use voxsculpt::export::{self, ExportFormat};
use voxsculpt::models::{self, ModelKind};
use voxsculpt::render::{self, RenderMode};
use voxsculpt::voxel::Rgba;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    model: Option<ModelKind>,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    pad: Option<u32>,
    seed: Option<u64>,
    preview: Option<PathBuf>,
    background: Option<Rgba>,
    mode: Option<RenderMode>,
    wireframe_color: Option<Rgba>,
    plain: bool,
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{} needs a value", flag))
}

fn color(s: &str) -> Result<Rgba, String> {
    Rgba::parse(s).map_err(|e| e.to_string())
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-m" | "--model" => {
                let v = value(&mut args, &arg)?;
                parsed.model = Some(ModelKind::from_name(&v).ok_or_else(|| format!("unknown model '{}'", v))?);
            }
            "-o" | "--output" => {
                parsed.output = Some(PathBuf::from(value(&mut args, &arg)?));
            }
            "-f" | "--format" => {
                let v = value(&mut args, &arg)?;
                parsed.format = Some(ExportFormat::from_name(&v).ok_or_else(|| format!("unknown format '{}'", v))?);
            }
            "--pad" => {
                let v = value(&mut args, &arg)?;
                parsed.pad = Some(v.parse().map_err(|_| format!("invalid padding '{}'", v))?);
            }
            "-s" | "--seed" => {
                let v = value(&mut args, &arg)?;
                parsed.seed = Some(v.parse().map_err(|_| format!("invalid seed '{}'", v))?);
            }
            "-p" | "--preview" => {
                parsed.preview = Some(PathBuf::from(value(&mut args, &arg)?));
            }
            "--background" => {
                parsed.background = Some(color(&value(&mut args, &arg)?)?);
            }
            "--mode" => {
                let v = value(&mut args, &arg)?;
                parsed.mode = Some(RenderMode::from_name(&v).ok_or_else(|| format!("unknown mode '{}'", v))?);
            }
            "--wireframe-color" => {
                parsed.wireframe_color = Some(color(&value(&mut args, &arg)?)?);
            }
            "-c" | "--config" => {
                parsed.config = Some(PathBuf::from(value(&mut args, &arg)?));
            }
            "--plain" => { parsed.plain = true; }
            "-h" | "--help" | "help" => {
                return Err("show_help".to_string());
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(parsed)
}

fn print_help() {
    println!("voxsculpt - procedural model generator");
    println!("======================================");
    println!();
    println!("Usage: voxsculpt [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -m, --model <NAME>         Model to build (default: voxel-cake)");
    println!("  -o, --output <PATH>        Mesh output path (default: <model>.<format>)");
    println!("  -f, --format <obj|glb>     Output format (default: from extension, else obj)");
    println!("  --pad <N>                  Empty voxels added around voxel models (default: 1)");
    println!("  -s, --seed <N>             Seed for randomized models (default: 0)");
    println!("  -p, --preview <PNG>        Render a preview image");
    println!("  --background <COLOR>       Preview background color");
    println!("  --mode <MODE>              Preview mode: solid, wireframe, both");
    println!("  --wireframe-color <COLOR>  Preview wireframe color");
    println!("  -c, --config <JSON>        Load a job config; flags override it");
    println!("  --plain                    Leave primitive models uncolored");
    println!();
    println!("Models:");
    for kind in ModelKind::ALL {
        println!("  {}", kind);
    }
    println!();
    println!("Examples:");
    println!("  voxsculpt --model voxel-cake -o cake.obj --preview cake.png");
    println!("  voxsculpt --model primitive-spaceship --seed 42 -o ship.glb");
    println!("  voxsculpt --model station-core --mode both --wireframe-color lime -p station.png");
}

/// Merge a config file (if any) with the command-line overrides
fn job_from(args: &Args) -> voxsculpt::core::Result<JobConfig> {
    let mut job = match &args.config {
        Some(path) => JobConfig::from_file(path)?,
        None => {
            let mut job = JobConfig::default();
            job.recipe.colored = true;
            job
        }
    };

    if let Some(model) = args.model {
        job.model = model;
    }
    if args.output.is_some() {
        job.output = args.output.clone();
    }
    if args.format.is_some() {
        job.format = args.format;
    }
    if let Some(pad) = args.pad {
        job.extract.padding = pad;
    }
    if let Some(seed) = args.seed {
        job.recipe.seed = seed;
    }
    if args.plain {
        job.recipe.colored = false;
        job.recipe.cake.colored = false;
    }
    if args.preview.is_some() {
        job.preview = args.preview.clone();
    }
    Ok(job)
}

fn run(args: Args) -> voxsculpt::core::Result<()> {
    let job = job_from(&args)?;
    let start = Instant::now();

    let mut model = models::build(job.model, &job.recipe)?;
    model.merge_palette(&job.palette);

    let mut view = job.view.clone().unwrap_or_else(|| model.view().clone());
    if let Some(background) = args.background {
        view.background = background;
    }
    if let Some(mode) = args.mode {
        view.mode = mode;
    }
    if let Some(wireframe_color) = args.wireframe_color {
        view.wireframe_color = wireframe_color;
    }

    let extraction = model.into_mesh(&job.extract)?;
    let mesh = &extraction.mesh;
    if !extraction.missing_labels.is_empty() {
        println!("  Labels without palette entries: {:?}", extraction.missing_labels);
    }

    let output = job.resolved_output();
    let format = job.resolved_format();
    export::write_mesh_as(mesh, &output, format)?;
    println!(
        "  Wrote {} ({} vertices, {} faces, {} materials)",
        output.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.materials.len()
    );

    if let Some(preview) = &job.preview {
        render::save_preview(mesh, &view, preview)?;
        println!("  Preview {} ({}x{}, {:?})", preview.display(), view.width, view.height, view.mode);
    }

    println!("  Completed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            if e == "show_help" {
                print_help();
                return;
            }
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    println!("voxsculpt");
    println!("=========");
    if let Some(model) = args.model {
        println!("Model: {}", model);
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
