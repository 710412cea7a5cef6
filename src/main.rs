use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use easel::{EcLevel, RenderReport, SceneStyle, Studio, StudioConfig};

#[derive(Parser)]
#[command(name = "easel", version, about = "Generate a QR code or a 3D-styled house scene as PNG")]
struct Cli {
    /// JSON file with `qr` and `scene` settings; flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print a JSON report for every saved file
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a URL as a QR code PNG
    Qr(QrArgs),
    /// Draw the house scene
    Scene(SceneArgs),
    /// Produce both artworks concurrently
    All,
}

#[derive(Args)]
struct QrArgs {
    #[arg(long)]
    url: Option<String>,
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    /// Quiet zone in modules
    #[arg(long)]
    margin: Option<u32>,
    #[arg(long)]
    dark: Option<String>,
    #[arg(long)]
    light: Option<String>,
    #[arg(long, value_enum)]
    ec: Option<EcLevel>,
    /// Print a data URI instead of writing a file
    #[arg(long)]
    data_uri: bool,
}

#[derive(Args)]
struct SceneArgs {
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long, value_enum)]
    style: Option<SceneStyle>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    sky_url: Option<String>,
    /// Skip the sky download and use the flat fallback
    #[arg(long, conflicts_with = "sky_url")]
    offline: bool,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl QrArgs {
    fn apply(self, cfg: &mut easel::QrConfig) {
        if let Some(v) = self.url {
            cfg.url = v;
        }
        if let Some(v) = self.output {
            cfg.output = v;
        }
        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.margin {
            cfg.margin = v;
        }
        if let Some(v) = self.dark {
            cfg.dark = v;
        }
        if let Some(v) = self.light {
            cfg.light = v;
        }
        if let Some(v) = self.ec {
            cfg.error_correction = v;
        }
    }
}

impl SceneArgs {
    fn apply(self, cfg: &mut easel::SceneConfig) {
        if let Some(v) = self.output {
            cfg.output = v;
        }
        if let Some(v) = self.style {
            cfg.style = v;
        }
        if self.width.is_some() {
            cfg.width = self.width;
        }
        if self.height.is_some() {
            cfg.height = self.height;
        }
        if self.sky_url.is_some() {
            cfg.sky_texture_url = self.sky_url;
        }
        if self.offline {
            cfg.sky_texture_url = None;
        }
        if let Some(v) = self.timeout_ms {
            cfg.timeout_ms = v;
        }
    }
}

fn print_report(report: &RenderReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!("{} ({}x{}, {} bytes)", report.path, report.width, report.height, report.bytes);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => StudioConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StudioConfig::default(),
    };

    match cli.command {
        Command::Qr(args) => {
            let data_uri = args.data_uri;
            args.apply(&mut config.qr);
            if data_uri {
                println!("{}", easel::qr_data_uri(&config.qr)?);
            } else {
                let report = easel::generate_qr(&config.qr)?;
                print_report(&report, cli.json)?;
            }
        }
        Command::Scene(args) => {
            args.apply(&mut config.scene);
            let report = easel::render_scene(&config.scene)?;
            print_report(&report, cli.json)?;
        }
        Command::All => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("starting async runtime")?;
            let studio = Studio::new(config);
            let (qr, scene) = runtime.block_on(studio.render_all())?;
            print_report(&qr, cli.json)?;
            print_report(&scene, cli.json)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("easel: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
