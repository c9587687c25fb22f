use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use tracing::Level;

use durian_screen::analysis::{DurianRiskAnalyzer, ScreeningService};
use durian_screen::config::Settings;
use durian_screen::error::AppError;
use durian_screen::intake::UploadedImage;
use durian_screen::presentation::report::render_guide;
use durian_screen::presentation::{DiagnosticImages, Language, ScreeningReport};

/// Screen a durian photograph for signs of BY2 contamination.
#[derive(Parser, Debug)]
#[command(name = "durian-screen", version, about)]
struct Cli {
    /// JPEG or PNG photograph of the durian
    #[arg(value_name = "IMAGE", required_unless_present = "guide")]
    image: Option<PathBuf>,

    /// Configuration file (defaults to ./durian-screen.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the HSV and LBP diagnostic images into this directory
    #[arg(long, value_name = "DIR")]
    diagnostics: Option<PathBuf>,

    /// Report language (th, en)
    #[arg(long, value_name = "LANG")]
    lang: Option<Language>,

    /// Print photo-capture guidelines
    #[arg(long)]
    guide: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(language) = cli.lang {
        settings.presentation.language = language;
    }
    init_logging(if cli.verbose {
        Level::DEBUG
    } else {
        settings.level()?
    });

    let language = settings.presentation.language;
    if cli.guide {
        print!("{}", render_guide(language));
    }
    let Some(path) = cli.image else {
        return Ok(());
    };

    let upload = UploadedImage::open(&path, &settings.intake)?;
    let service = ScreeningService::new(DurianRiskAnalyzer::new(settings.analysis.clone()));
    let result = service.oneshot(Arc::clone(&upload.rgb)).await?;

    let report = ScreeningReport::new(&upload, &result, language);
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text(&settings.presentation));
    }

    if let Some(dir) = cli.diagnostics {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| upload.id.to_string());
        DiagnosticImages::from_result(&result).write_png(&dir, &stem)?;
    }

    Ok(())
}
