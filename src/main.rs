use anyhow::{Context, Result};
use meal_recognition::RecognitionService;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: meal-recognizer <food description>\n       meal-recognizer --image <path>";

enum Command {
    Describe(String),
    Image(PathBuf),
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [flag, path] if flag == "--image" => Ok(Command::Image(PathBuf::from(path))),
        [flag, ..] if flag == "--image" => {
            Err(anyhow::anyhow!("--image takes exactly one path\n{USAGE}"))
        }
        [] => Err(anyhow::anyhow!("{USAGE}")),
        words => {
            let description = words.join(" ");
            if description.trim().is_empty() {
                return Err(anyhow::anyhow!("{USAGE}"));
            }
            Ok(Command::Describe(description))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    // Logs go to stderr so stdout stays valid JSON
    let _ = if env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let service = RecognitionService::from_env();
    info!(ai_available = service.is_ai_available(), "Starting meal recognition");

    let result = match command {
        Command::Describe(description) => service.recognize_text(&description).await,
        Command::Image(path) => service.recognize_image(&path).await?,
    };

    let output = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    println!("{output}");

    Ok(())
}
