use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "frameink", version)]
struct Cli {
    /// Log more (repeat for trace output).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Write a single frame as SVG markup.
    Svg(SvgArgs),
    /// Export every frame as a PNG sequence or an animated GIF.
    Export(ExportArgs),
    /// Print a summary of a saved project.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output pixels per canvas unit.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Draw onion-skin ghosts as the editor shows them.
    #[arg(long)]
    onion: bool,
}

#[derive(Args, Debug)]
struct SvgArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: usize,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Draw onion-skin ghosts as the editor shows them.
    #[arg(long)]
    onion: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory for `frame_NNNN.png` files.
    #[arg(long, required_unless_present = "gif")]
    out_dir: Option<PathBuf>,

    /// Animated GIF output path.
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Output pixels per canvas unit.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// First frame to export.
    #[arg(long)]
    from: Option<usize>,

    /// Frame to stop before (exclusive).
    #[arg(long)]
    to: Option<usize>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print the normalized project document instead of a summary.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Svg(args) => cmd_svg(args),
        Command::Export(args) => cmd_export(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn read_project(path: &Path) -> anyhow::Result<frameink::Project> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open project '{}'", path.display()))?;
    let project = frameink::from_json(&text)
        .with_context(|| format!("parse project '{}'", path.display()))?;
    Ok(project)
}

fn check_frame(project: &frameink::Project, frame: usize) -> anyhow::Result<()> {
    let max = project.max_frames();
    if frame >= max {
        anyhow::bail!("frame {frame} is out of range (project has {max} frames)");
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    check_frame(&project, args.frame)?;

    let opts = frameink::ExportOptions {
        settings: frameink::RenderSettings {
            scale: args.scale,
            onion_skin: args.onion,
        },
        frames: Some(args.frame..args.frame + 1),
    };
    let mut captured = None;
    frameink::export_frames(&project, &opts, |f| {
        captured = Some(f.image.clone());
        Ok(())
    })?;
    let frame = captured.context("renderer produced no frame")?;

    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    check_frame(&project, args.frame)?;

    let markup = if args.onion {
        frameink::plan_to_svg(&frameink::render(&project, args.frame))
    } else {
        frameink::render_frame_to_vector_markup(&project, args.frame)
    };

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, markup)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let max = project.max_frames();
    let frames = match (args.from, args.to) {
        (None, None) => None,
        (from, to) => Some(from.unwrap_or(0)..to.unwrap_or(max)),
    };
    let opts = frameink::ExportOptions {
        settings: frameink::RenderSettings {
            scale: args.scale,
            onion_skin: false,
        },
        frames,
    };

    if let Some(dir) = &args.out_dir {
        let files = frameink::write_png_sequence(&project, dir, &opts)
            .with_context(|| format!("export png sequence to '{}'", dir.display()))?;
        eprintln!("wrote {} frames to {}", files.len(), dir.display());
    }
    if let Some(gif) = &args.gif {
        frameink::write_gif(&project, gif, &opts)
            .with_context(|| format!("export gif '{}'", gif.display()))?;
        eprintln!("wrote {}", gif.display());
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    if args.json {
        println!("{}", frameink::to_json(&project)?);
        return Ok(());
    }

    println!(
        "canvas {}x{} @ {} fps, {} frames, background {}",
        project.canvas.width,
        project.canvas.height,
        project.fps.0,
        project.max_frames(),
        match project.background.color() {
            Some(c) => c.to_hex(),
            None => "transparent".to_owned(),
        }
    );
    for layer in project.layers().iter().rev() {
        let holds = layer.frames().iter().filter(|f| f.is_hold()).count();
        let strokes: usize = layer.frames().iter().map(|f| f.strokes().len()).sum();
        println!(
            "{marker} {id} \"{name}\": {frames} frames ({holds} holds), {strokes} strokes{bg}{hidden}",
            marker = if layer.id == project.current_layer_id() { '*' } else { ' ' },
            id = layer.id,
            name = layer.name,
            frames = layer.frame_count(),
            bg = if layer.is_background { ", background" } else { "" },
            hidden = if layer.visible { "" } else { ", hidden" },
        );
    }
    Ok(())
}
