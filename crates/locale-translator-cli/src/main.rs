//! Locale Translator CLI - translate texts and JSON localization files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use locale_translator_core::{AppConfig, DocumentTranslator, EngineKind, Language, create_engine};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineOption {
    /// Drive the translation web page through WebDriver
    Browser,
    /// Call a LibreTranslate API
    Libre,
}

impl From<EngineOption> for EngineKind {
    fn from(opt: EngineOption) -> Self {
        match opt {
            EngineOption::Browser => Self::Browser,
            EngineOption::Libre => Self::Libre,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "locale-translate")]
#[command(author, version, about = "Translate texts and JSON localization files", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Translation backend
    #[arg(long, value_enum, global = true)]
    engine: Option<EngineOption>,

    /// WebDriver endpoint for the browser engine
    #[arg(long, env = "WEBDRIVER_URL", global = true)]
    webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long, global = true)]
    headless: bool,

    /// LibreTranslate API base URL
    #[arg(long, env = "LIBRETRANSLATE_URL", global = true)]
    api_base: Option<String>,

    /// LibreTranslate API key
    #[arg(long, env = "LIBRETRANSLATE_API_KEY", global = true)]
    api_key: Option<String>,

    /// Directory translated files are written to
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate text
    Text {
        /// Text to translate
        text: String,
        /// The source language of the text
        source_language: Language,
        /// The target language for the translation
        target_language: Language,
    },
    /// Translate a json file
    Json {
        /// Path to the json file
        file_path: PathBuf,
        /// The source language of the file. Defaults to `source_lang` from the config
        source_language: Option<Language>,
        /// The target languages for the translation. Defaults to `target_langs` from the
        /// config; if that is empty too, all languages are translated
        target_languages: Vec<Language>,
    },
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(engine) = args.engine {
        config.engine = engine.into();
    }
    if let Some(ref url) = args.webdriver_url {
        config.browser.webdriver_url.clone_from(url);
    }
    if args.headless {
        config.browser.headless = true;
    }
    if let Some(ref base) = args.api_base {
        config.libre.api_base.clone_from(base);
    }
    if args.api_key.is_some() {
        config.libre.api_key.clone_from(&args.api_key);
    }
    if args.output_dir.is_some() {
        config.output_dir.clone_from(&args.output_dir);
    }
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    let engine = create_engine(&config).context("Failed to initialize translation engine")?;
    info!("Using {} engine", engine.name());
    if engine.info().requires_webdriver {
        info!("WebDriver endpoint: {}", config.browser.webdriver_url);
    }

    match args.command {
        Command::Text {
            text,
            source_language,
            target_language,
        } => {
            let pb = spinner(format!("Translating to {target_language}"));
            let result = engine
                .translate(&text, source_language, target_language)
                .await
                .context("Translation failed");
            pb.finish_and_clear();
            let result = result?;

            // CLI output is intentional
            #[allow(clippy::print_stdout)]
            {
                println!("Translated result:");
                println!("{}", result.translated_text);
            }
        }
        Command::Json {
            file_path,
            source_language,
            target_languages,
        } => {
            anyhow::ensure!(file_path.is_file(), "File {} does not exist", file_path.display());
            let (source_language, target_languages) = config.run_languages(source_language, target_languages);

            let translator = DocumentTranslator::with_output_dir(engine, config.output_dir());
            let pb = spinner(format!("Translating {}", file_path.display()));
            let report = translator
                .translate_file_report(&file_path, source_language, &target_languages)
                .await;
            pb.finish_and_clear();

            // CLI output is intentional
            #[allow(clippy::print_stdout)]
            {
                for outcome in &report.outcomes {
                    match &outcome.result {
                        Ok(saved) => println!(
                            "File {} saved with target language {}",
                            saved.file_path.display(),
                            saved.target_language
                        ),
                        Err(e) => println!("Failed to translate to {}: {}", outcome.target_language, e),
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_command_with_optional_targets() {
        let args = Args::parse_from(["locale-translate", "json", "en.json", "English", "fr", "German"]);
        match args.command {
            Command::Json {
                source_language,
                target_languages,
                ..
            } => {
                assert_eq!(source_language, Some(Language::English));
                assert_eq!(target_languages, vec![Language::French, Language::German]);
            }
            Command::Text { .. } => unreachable!("parsed the wrong command"),
        }

        let args = Args::parse_from(["locale-translate", "json", "en.json", "en"]);
        assert!(matches!(args.command, Command::Json { ref target_languages, .. } if target_languages.is_empty()));

        let args = Args::parse_from(["locale-translate", "json", "en.json"]);
        assert!(matches!(
            args.command,
            Command::Json { source_language: None, ref target_languages, .. } if target_languages.is_empty()
        ));
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::parse_from([
            "locale-translate",
            "--engine",
            "libre",
            "--api-base",
            "http://localhost:5000",
            "--headless",
            "text",
            "hello",
            "English",
            "Japanese",
        ]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.engine, EngineKind::Libre);
        assert_eq!(config.libre.api_base, "http://localhost:5000");
        assert!(config.browser.headless);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(Args::try_parse_from(["locale-translate", "text", "hi", "English", "Klingon"]).is_err());
    }
}
