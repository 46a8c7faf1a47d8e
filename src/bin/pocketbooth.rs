use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pocketbooth::{
    BoothConfig, CaptureController, CaptureTiming, ConfigSession, ExportRoute, Exported,
    FacingMode, FileStore, FilterKind, KeyValueStore, MemoryStore, PreferenceStore, StripOptions,
    StripStore, StripStyle, SyntheticCamera, UploadGateway, UsageLimiter, export_strip,
    render_strip, show_upload, upload_strip,
};

#[derive(Parser, Debug)]
#[command(name = "pocketbooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available filters.
    Filters,
    /// Apply a filter to one image file.
    Filter(FilterArgs),
    /// Compose image files into a photo strip.
    Compose(ComposeArgs),
    /// Run a capture session against the synthetic camera and save the strip.
    Shoot(ShootArgs),
    /// List saved strips.
    List(StoreArgs),
    /// Delete a saved strip.
    Delete(IdArgs),
    /// Upload a saved strip (requires POCKETBOOTH_UPLOAD_URL).
    Upload(UploadArgs),
}

#[derive(Parser, Debug)]
struct FilterArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image; format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Filter id (normal, blackAndWhite, cute, film).
    #[arg(long, default_value = "normal")]
    filter: FilterKind,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Photos, top to bottom.
    #[arg(required = true)]
    photos: Vec<PathBuf>,

    /// Output image.
    #[arg(long)]
    out: PathBuf,

    /// Strip style (white, black).
    #[arg(long, default_value = "white")]
    style: StripStyle,

    /// Date shown in the label.
    #[arg(long)]
    date: Option<String>,
}

#[derive(Parser, Debug)]
struct StoreArgs {
    /// JSON file holding saved strips, preferences and usage counters.
    #[arg(long, default_value = "pocketbooth.json")]
    store: PathBuf,
}

#[derive(Parser, Debug)]
struct ShootArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Photos per strip (1-4); defaults to the saved preference.
    #[arg(long)]
    shots: Option<u32>,

    /// Filter id; defaults to the saved preference.
    #[arg(long)]
    filter: Option<FilterKind>,

    /// Camera (front, back); defaults to the saved preference.
    #[arg(long)]
    facing: Option<FacingMode>,

    /// Strip style; defaults to the saved preference.
    #[arg(long)]
    style: Option<StripStyle>,

    /// Skip countdown and shot delays.
    #[arg(long)]
    fast: bool,

    /// Also export the finished strip into this directory.
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct IdArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Strip id.
    id: u64,
}

#[derive(Parser, Debug)]
struct UploadArgs {
    #[command(flatten)]
    target: IdArgs,

    /// Configuration key selecting the upload bucket.
    #[arg(long)]
    key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Filters => cmd_filters(),
        Command::Filter(args) => cmd_filter(args),
        Command::Compose(args) => cmd_compose(args),
        Command::Shoot(args) => cmd_shoot(args).await,
        Command::List(args) => cmd_list(args),
        Command::Delete(args) => cmd_delete(args),
        Command::Upload(args) => cmd_upload(args).await,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(path: &Path) -> anyhow::Result<Arc<FileStore>> {
    let store = FileStore::open(path).with_context(|| format!("open store '{}'", path.display()))?;
    Ok(Arc::new(store))
}

fn read_image(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let img = image::open(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

fn write_image(img: &image::RgbaImage, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::DynamicImage::ImageRgba8(img.clone())
        .to_rgb8()
        .save(path)
        .with_context(|| format!("write image '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_filters() -> anyhow::Result<()> {
    for kind in FilterKind::ALL {
        println!("{:<14} {:<14} {}", kind.id(), kind.label(), kind.css_filter());
    }
    Ok(())
}

fn cmd_filter(args: FilterArgs) -> anyhow::Result<()> {
    let mut img = read_image(&args.in_path)?;
    pocketbooth::apply_filter(&mut img, args.filter);
    write_image(&img, &args.out)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let photos = args
        .photos
        .iter()
        .map(|p| read_image(p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let strip = render_strip(&photos, &StripOptions::styled(args.style, args.date))?;
    write_image(&strip, &args.out)
}

async fn cmd_shoot(args: ShootArgs) -> anyhow::Result<()> {
    let kv: Arc<dyn KeyValueStore> = open_store(&args.store.store)?;
    let prefs_store = PreferenceStore::new(kv.clone());
    let prefs = prefs_store.load()?;

    let timing = if args.fast {
        CaptureTiming::instant()
    } else {
        CaptureTiming::default()
    };
    let store = Arc::new(StripStore::new(kv));
    let controller = CaptureController::new(
        Arc::new(SyntheticCamera::default()),
        store,
        prefs,
        timing,
    )
    .with_preference_store(prefs_store);
    if let Some(n) = args.shots {
        controller.set_shot_count(n)?;
    }
    if let Some(f) = args.filter {
        controller.set_filter(f)?;
    }
    if let Some(f) = args.facing {
        controller.set_facing_mode(f).await?;
    }
    if let Some(s) = args.style {
        controller.set_style(s)?;
    }

    let mut status = controller.subscribe();
    let progress = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let s = status.borrow_and_update().clone();
            if let Some(glyph) = s.countdown_glyph().filter(|_| s.shot == 0) {
                eprintln!("  {glyph}");
            } else if s.flash {
                eprintln!("  shot {}/{}", s.shot, s.shot_total);
            }
        }
    });

    controller.activate().await.context("camera unavailable")?;
    let strip = controller.start_session().await?;
    controller.deactivate()?;
    drop(controller);
    let _ = progress.await;

    let strip = strip.context("capture session did not complete")?;
    println!("{}\t{} photos\t{} {}", strip.id, strip.photos.len(), strip.date, strip.timestamp);

    if let Some(dir) = args.export {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create export dir '{}'", dir.display()))?;
        if let Exported::Saved(path) = export_strip(&strip, ExportRoute::Direct, &dir).await? {
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn cmd_list(args: StoreArgs) -> anyhow::Result<()> {
    let store = StripStore::new(open_store(&args.store)?);
    for strip in store.list()? {
        println!(
            "{}\t{} photos\t{}\t{} {}",
            strip.id,
            strip.photos.len(),
            strip.style.as_str(),
            strip.date,
            strip.timestamp
        );
    }
    Ok(())
}

fn cmd_delete(args: IdArgs) -> anyhow::Result<()> {
    let store = StripStore::new(open_store(&args.store.store)?);
    if !store.remove(args.id)? {
        anyhow::bail!("no strip with id {}", args.id);
    }
    eprintln!("deleted {}", args.id);
    Ok(())
}

async fn cmd_upload(args: UploadArgs) -> anyhow::Result<()> {
    let config = Arc::new(BoothConfig::from_env());
    let kv: Arc<dyn KeyValueStore> = open_store(&args.target.store.store)?;
    let store = StripStore::new(kv.clone());
    let strip = store
        .get(args.target.id)?
        .with_context(|| format!("no strip with id {}", args.target.id))?;

    let session = ConfigSession::new(Arc::new(MemoryStore::new()), config.clone());
    if let Some(key) = args.key.as_deref() {
        session.apply_key(key)?;
    }
    let session = session.session_config()?;
    if !show_upload(&session) {
        tracing::warn!(key = args.key.as_deref(), "upload refused; no recognised configuration key");
        anyhow::bail!("Uploads need a recognised configuration key (--key)");
    }
    let limiter = UsageLimiter::new(kv, config.clone());
    let gateway = UploadGateway::from_config(&config)?;

    let outcome = upload_strip(&gateway, &limiter, &session, &strip).await;
    if !outcome.success {
        anyhow::bail!(
            "{}",
            outcome.error.unwrap_or_else(|| "Upload failed".to_string())
        );
    }
    println!(
        "uploaded {}\t{}",
        outcome.file_name.unwrap_or_else(|| strip.file_name()),
        outcome.web_view_link.unwrap_or_default()
    );
    println!("remaining: {}", limiter.remaining(session.key.as_deref())?);
    Ok(())
}
