// SPDX-License-Identifier: MPL-2.0
use lightbox::app::{paths, FileOnboardingStore};
use lightbox::config;
use lightbox::error::{Error, Result};
use lightbox::replay::{self, Script};
use lightbox::ui::viewer::subcomponents::onboarding::{MemoryStore, OnboardingStore};
use iced_core::Size;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
lightbox-replay: replay a gesture script through the viewer engine

USAGE:
  lightbox-replay [OPTIONS] SCRIPT

OPTIONS:
  --viewport WxH     Viewport size in pixels [default: 800x600]
  --config PATH      Settings file [default: settings.toml in the config dir]
  --config-dir PATH  Directory holding settings.toml [default: platform config dir]
  --data-dir PATH    Directory holding persisted state; without it the
                     script's onboarding_seen flag is used
  --frame-ms N       Frame interval in milliseconds [default: 16]
  -h, --help         Print this help
";

struct Args {
    viewport: Size,
    config: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    frame: Duration,
    script: PathBuf,
}

fn parse_viewport(value: &str) -> std::result::Result<Size, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {value:?}"))?;
    let width: f32 = width.trim().parse().map_err(|_| format!("bad width in {value:?}"))?;
    let height: f32 = height.trim().parse().map_err(|_| format!("bad height in {value:?}"))?;
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("viewport must be positive, got {value:?}"));
    }
    Ok(Size::new(width, height))
}

fn parse_args(mut args: pico_args::Arguments) -> std::result::Result<Option<Args>, String> {
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let viewport = args
        .opt_value_from_fn("--viewport", parse_viewport)
        .map_err(|err| err.to_string())?
        .unwrap_or(Size::new(800.0, 600.0));
    let config = args
        .opt_value_from_os_str("--config", |s| Ok::<_, String>(PathBuf::from(s)))
        .map_err(|err| err.to_string())?;
    let config_dir = args
        .opt_value_from_os_str("--config-dir", |s| Ok::<_, String>(PathBuf::from(s)))
        .map_err(|err| err.to_string())?;
    let data_dir = args
        .opt_value_from_os_str("--data-dir", |s| Ok::<_, String>(PathBuf::from(s)))
        .map_err(|err| err.to_string())?;
    let frame_ms: u64 = args
        .opt_value_from_str("--frame-ms")
        .map_err(|err| err.to_string())?
        .unwrap_or(config::DEFAULT_FRAME_MS);
    let script = args
        .free_from_os_str(|s| Ok::<_, String>(PathBuf::from(s)))
        .map_err(|err| err.to_string())?;

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(format!("unexpected arguments: {rest:?}"));
    }

    Ok(Some(Args {
        viewport,
        config,
        config_dir,
        data_dir,
        frame: Duration::from_millis(frame_ms),
        script,
    }))
}

fn run(args: Args) -> Result<()> {
    let use_data_dir = args.data_dir.is_some();
    if !paths::init_cli_overrides(args.data_dir.clone(), args.config_dir.clone()) {
        tracing::warn!("directory overrides were already set, ignoring --data-dir/--config-dir");
    }

    let config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    let settings = config.settings();
    let script = Script::load(&args.script)?;

    let store: Box<dyn OnboardingStore> = if use_data_dir {
        Box::new(FileOnboardingStore::new())
    } else {
        Box::new(MemoryStore::new(script.onboarding_seen))
    };

    tracing::info!(
        script = %args.script.display(),
        steps = script.steps.len(),
        images = script.images.len(),
        "replaying"
    );
    let replay = replay::run(&script, args.viewport, settings, store, args.frame)?;

    for (at, effect) in &replay.effects {
        println!("{:>6} ms  {effect:?}", at.as_millis());
    }
    println!("page      {}", replay.page_label);
    println!("controls  {}", if replay.controls_visible { "visible" } else { "hidden" });
    println!("overlay   {}", if replay.overlay_faded { "faded" } else { "opaque" });
    match replay.transform {
        Some(t) => println!(
            "transform scale={:.3} pan=({:.1}, {:.1}) background={:.2} dismiss={:.2}",
            t.scale, t.pan.x, t.pan.y, t.background_opacity, t.dismiss_progress
        ),
        None => println!("transform (empty gallery)"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lightbox=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(pico_args::Arguments::from_env()) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::Script(_)) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
