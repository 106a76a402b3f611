use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;

use tokensmith::{
    AssetRecord, CanvasDoc, ComposeOpts, Compositor, ExportFormat, ExportOpts, FontBook,
    FrameAssetKind, FrameSources, FsImageLoader, ImageCache, TokenSize,
};

#[derive(Parser, Debug)]
#[command(name = "tokensmith", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a canvas document into a token image.
    Compose(ComposeArgs),
    /// Print the locator of one file of a library frame.
    FrameSrc(FrameSrcArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Canvas document JSON.
    #[arg(long)]
    doc: PathBuf,

    /// Directory image locators are resolved against.
    #[arg(long)]
    assets: PathBuf,

    /// Asset manifest JSON (needed for library frames).
    #[arg(long, requires = "frame_id")]
    manifest: Option<PathBuf>,

    /// Library frame to clip and draw.
    #[arg(long, requires = "manifest")]
    frame_id: Option<String>,

    /// Font file for the text layer. Repeatable; the first one is the fallback family.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Output edge length (1024, 512 or 256). Defaults to the document's size.
    #[arg(long)]
    size: Option<u32>,

    /// Output format.
    #[arg(long, default_value = "png")]
    format: ExportFormat,

    /// Leave the background layer out.
    #[arg(long, default_value_t = false)]
    no_background: bool,

    /// Output file path.
    #[arg(long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// Output directory; the file is named `{frame_id|token}_{size}.{ext}`.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameSrcArgs {
    /// Asset manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Library frame id.
    #[arg(long)]
    frame_id: String,

    /// Which file to resolve.
    #[arg(long, value_enum, default_value_t = KindArg::Master)]
    kind: KindArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Master,
    Thumbnail,
    Mask,
}

impl From<KindArg> for FrameAssetKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Master => FrameAssetKind::Master,
            KindArg::Thumbnail => FrameAssetKind::Thumbnail,
            KindArg::Mask => FrameAssetKind::Mask,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::FrameSrc(args) => cmd_frame_src(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let doc = CanvasDoc::from_path(&args.doc)?;
    doc.validate()
        .with_context(|| format!("invalid canvas document '{}'", args.doc.display()))?;

    let size = match args.size {
        Some(px) => TokenSize::try_from(px)?,
        None => doc.size()?,
    };

    let selected = match (&args.manifest, &args.frame_id) {
        (Some(path), Some(id)) => {
            let manifest = AssetRecord::from_path(path)?;
            let meta = manifest
                .frame(id)
                .cloned()
                .with_context(|| format!("frame '{id}' not found in '{}'", path.display()))?;
            Some(meta)
        }
        _ => None,
    };

    let loader = FsImageLoader::new(&args.assets);
    let mut cache = ImageCache::new();
    cache.sync(&doc, &loader);
    let sources = FrameSources::resolve(&doc, selected.as_ref());
    let frame_assets = tokensmith::load_frame_assets(&sources, &loader);

    let mut fonts = FontBook::new();
    for path in &args.fonts {
        let family = fonts
            .register_file(path)
            .with_context(|| format!("load font '{}'", path.display()))?;
        tracing::info!(family = %family, "font registered");
    }

    let mut compositor = Compositor::with_opts(
        fonts,
        ComposeOpts {
            include_background: !args.no_background,
        },
    );
    let surface = compositor.compose(
        &doc,
        &cache.snapshot(),
        frame_assets.frame.as_ref(),
        frame_assets.mask.as_ref(),
    )?;
    let bytes = tokensmith::export(surface, ExportOpts::new(size, args.format))?;

    let out = output_path(&args, size);
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &bytes).with_context(|| format!("write '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn output_path(args: &ComposeArgs, size: TokenSize) -> PathBuf {
    let name = tokensmith::export_file_name(args.frame_id.as_deref(), size.px(), args.format);
    match (&args.out, &args.out_dir) {
        (Some(out), _) => out.clone(),
        (None, Some(dir)) => dir.join(name),
        (None, None) => Path::new(".").join(name),
    }
}

fn cmd_frame_src(args: FrameSrcArgs) -> anyhow::Result<()> {
    let manifest = AssetRecord::from_path(&args.manifest)?;
    let meta = manifest.frame(&args.frame_id).with_context(|| {
        format!(
            "frame '{}' not found in '{}'",
            args.frame_id,
            args.manifest.display()
        )
    })?;
    println!("{}", tokensmith::frame_src(meta, args.kind.into()));
    Ok(())
}
