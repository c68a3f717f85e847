use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scanline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene script (PNG frames plus a GIF when animated).
    Render(RenderArgs),
    /// Parse a script and report its animation plan without rendering.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene script to run.
    script: PathBuf,

    /// Output directory for animation frames and the assembled GIF.
    #[arg(long, default_value = "anim")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Scene script to analyze.
    script: PathBuf,

    /// Emit the animation plan as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = scanline::RunOpts {
        out_dir: args.out_dir,
    };
    let summary = scanline::run_script(&args.script, &opts)?;

    eprintln!("rendered {} frame(s)", summary.frames_rendered);
    if let Some(gif) = &summary.animation {
        eprintln!("wrote {}", gif.display());
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct AnimationPlan {
    meta: scanline::AnimationMeta,
    schedule: scanline::KnobSchedule,
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let (commands, _symbols) = scanline::parse_file(&args.script)?;
    let meta = scanline::extract_metadata(&commands)?;
    let schedule = scanline::build_schedule(&commands, meta.num_frames)?;

    if args.json {
        let plan = AnimationPlan { meta, schedule };
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("commands:   {}", commands.len());
        println!("basename:   {}", meta.basename);
        println!("num_frames: {}", meta.num_frames);
    }
    Ok(())
}
