use lamp_analyzer::capture::{FrameSampler, MeanPixelSampler, RandomSampler, SyntheticCamera};
use lamp_analyzer::config::{Configuration, OutputFormat, SamplerKind};
use lamp_analyzer::error::AppError;
use lamp_analyzer::presentation::render_state;
use lamp_analyzer::session::CaptureSession;
use std::path::PathBuf;
use tracing::Level;

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn build_sampler(configuration: &Configuration) -> Box<dyn FrameSampler> {
    match configuration.sampler {
        SamplerKind::Random => Box::new(RandomSampler::new()),
        SamplerKind::MeanPixel => {
            Box::new(MeanPixelSampler::new().with_stride(configuration.pixel_stride))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let configuration = Configuration::load(config_path.as_deref())?;
    init_logging(configuration.log_level());

    // A warm desk lamp with a slight ripple.
    let camera = SyntheticCamera::new(configuration.frame_width, configuration.frame_height)
        .with_colors(vec![[182, 150, 118], [176, 146, 114], [186, 153, 121]]);
    let session = CaptureSession::new(
        Box::new(camera),
        build_sampler(&configuration),
        configuration.scan_settings(),
    );

    if let Err(e) = session.start_camera().await {
        tracing::error!("Could not start camera: {}", e);
        println!("{}", render_state(&session.snapshot()));
        return Ok(());
    }

    let outcome = session.scan().await;
    session.stop_camera().await;

    match (outcome, configuration.output) {
        (Ok(report), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        (Err(e), OutputFormat::Json) if e.is_recoverable() => {
            println!("{}", serde_json::json!({ "error": e.user_message() }));
        }
        (Err(e), _) if !e.is_recoverable() => return Err(e),
        _ => println!("{}", render_state(&session.snapshot())),
    }
    Ok(())
}
