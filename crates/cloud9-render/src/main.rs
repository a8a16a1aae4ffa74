mod capture;
mod render_config;
mod scene;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cloud9_core::{bus::VideoBus, framebuffer::Frame};
use log::{error, info};

use render_config::{OutputScale, RenderConfig};
use scene::Scene;

#[derive(Parser)]
#[command(about = "Render captured Cloud 9 video state to PNG")]
struct Args {
    /// Path to the scene description (TOML)
    scene: PathBuf,

    /// Output PNG path (defaults to <output_dir>/<scene name>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of frames to run before capturing
    #[arg(long)]
    frames: Option<u32>,

    /// Integer output scale (1-4)
    #[arg(long)]
    scale: Option<u32>,

    /// Write every frame as <output stem>_NNNN.png instead of only the last
    #[arg(long)]
    every_frame: bool,

    /// Path to the render config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store the effective settings back into the config file
    #[arg(long)]
    save_config: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn output_path(args: &Args, cfg: &RenderConfig) -> PathBuf {
    if let Some(path) = &args.output {
        return path.clone();
    }
    let stem = args
        .scene
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "frame".into());
    let mut name = PathBuf::from(stem);
    name.set_extension("png");
    match &cfg.output_dir {
        Some(dir) => dir.join(name),
        None => name,
    }
}

fn numbered(path: &std::path::Path, frame: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    path.with_file_name(format!("{stem}_{frame:04}.png"))
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(render_config::default_config_path);
    let mut cfg = render_config::load_from_file(&config_path);

    if let Some(factor) = args.scale {
        match OutputScale::from_factor(factor) {
            Some(scale) => cfg.scale = scale,
            None => return Err(format!("unsupported scale {factor} (expected 1-4)").into()),
        }
    }
    if let Some(frames) = args.frames {
        cfg.frames = frames;
    }
    if args.save_config {
        render_config::save_to_file(&config_path, &cfg)?;
    }

    let scene = Scene::load(&args.scene)?;
    let mut bus = VideoBus::new();
    scene.apply(&mut bus);

    let out_path = output_path(args, &cfg);
    let frames = cfg.frames.max(1);
    let mut frame = Frame::new();
    for n in 0..frames {
        bus.video.render_frame(&mut frame, &scene.sprite_ram, &scene.gfx);
        if args.every_frame {
            capture::save_screenshot(
                &frame,
                cfg.visible_rows,
                cfg.scale.factor(),
                &numbered(&out_path, n),
            )?;
        }
    }

    if !args.every_frame {
        capture::save_screenshot(&frame, cfg.visible_rows, cfg.scale.factor(), &out_path)?;
    }
    info!(
        "Rendered {} frame(s) ({} rebuild(s)) to {}",
        bus.video.frames(),
        bus.video.rebuild_count(),
        out_path.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
