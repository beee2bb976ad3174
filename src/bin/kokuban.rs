use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kokuban", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a blackboard over a photo and write a PNG.
    Compose(ComposeArgs),
    /// Print the canonical layout a template adapts to.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input photo (any format the image crate decodes).
    #[arg(long)]
    photo: PathBuf,

    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Board record JSON; omitted fields fall back to template defaults.
    #[arg(long)]
    info: Option<PathBuf>,

    /// TTF/OTF font file used for every field.
    #[arg(long)]
    font: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Date format for recognized timestamp values, `strftime` syntax.
    #[arg(long)]
    date_format: Option<String>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn read_info_json(path: &Path) -> anyhow::Result<kokuban::BlackboardInfo> {
    let f = File::open(path).with_context(|| format!("open board record '{}'", path.display()))?;
    let info: kokuban::BlackboardInfo =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse board record JSON")?;
    Ok(info)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let template = kokuban::Template::from_path(&args.template)?;
    let info = match &args.info {
        Some(path) => read_info_json(path)?,
        None => kokuban::BlackboardInfo::default(),
    };

    let photo_bytes = std::fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;
    let photo = kokuban::Photo::decode(&photo_bytes)?;

    let font_bytes = std::fs::read(&args.font)
        .with_context(|| format!("read font '{}'", args.font.display()))?;
    let mut opts = kokuban::RenderOptions::default();
    if let Some(fmt) = args.date_format {
        opts.date_format = fmt;
    }
    let mut renderer = kokuban::BoardRenderer::with_options(font_bytes, opts)?;

    let mut image = renderer.compose(&photo, &info, &template)?;
    image.unpremultiply();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &image.data,
        image.width,
        image.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let template = kokuban::Template::from_path(&args.template)?;
    let resolved = kokuban::adapt(&template)?;
    let json = serde_json::to_string_pretty(&resolved).with_context(|| "serialize layout")?;
    println!("{json}");
    Ok(())
}
