//! partscout CLI
//!
//! Command-line interface for identifying marine engine parts from uploaded
//! image filenames and generating voiced sales pitches for the matches.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use partscout_catalog::{Catalog, CatalogCache};
use partscout_pitch::{AnthropicClient, ElevenLabsClient, LogEntry, SessionLog, generate_pitch};

#[derive(Parser)]
#[command(name = "partscout")]
#[command(about = "Identify marine parts from image filenames", long_about = None)]
struct Cli {
    /// Path to the catalog CSV (defaults to catalog.csv)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match uploaded image filenames against the catalog
    Identify {
        /// Image files (or bare filenames) to identify
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Generate a sales pitch for the first matched row
        #[arg(short, long)]
        pitch: bool,

        /// Voice the pitch to an MP3 file (implies --pitch)
        #[arg(short, long)]
        voice: bool,

        /// Directory for audio files and the session log
        #[arg(long, default_value = "pitches")]
        out: PathBuf,

        /// Disable the session log file
        #[arg(long)]
        no_log: bool,
    },

    /// Inspect the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Manage API credentials configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print catalog rows as loaded
    Preview {
        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print rows with an image URL and their derived fields
    Derived,

    /// Print catalog counts
    Stats,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current credentials and their sources
    Show,

    /// Interactively set up credentials
    Setup,

    /// Test credentials against both APIs
    Test,

    /// Print the config file path
    Path,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let catalog_path = cli
        .catalog
        .unwrap_or_else(|| PathBuf::from("catalog.csv"));

    match cli.command {
        Commands::Identify {
            files,
            pitch,
            voice,
            out,
            no_log,
        } => {
            run_identify(&catalog_path, files, pitch || voice, voice, out, no_log);
        }
        Commands::Catalog { action } => match action {
            CatalogAction::Preview { limit } => run_catalog_preview(&catalog_path, limit),
            CatalogAction::Derived => run_catalog_derived(&catalog_path),
            CatalogAction::Stats => run_catalog_stats(&catalog_path),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::Setup => run_config_setup(),
            ConfigAction::Test => run_config_test(),
            ConfigAction::Path => run_config_path(),
        },
    }
}

/// Load the catalog, printing a friendly error on failure.
fn load_catalog_or_exit(path: &Path) -> std::sync::Arc<Catalog> {
    let mut cache = CatalogCache::new();
    match cache.get_or_load(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!(
                "{} Failed to load catalog {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                path.display(),
                e,
            );
            eprintln!();
            eprintln!("Pass a catalog CSV with -c/--catalog.");
            std::process::exit(1);
        }
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Run the identify command.
fn run_identify(
    catalog_path: &Path,
    files: Vec<PathBuf>,
    pitch: bool,
    voice: bool,
    out: PathBuf,
    no_log: bool,
) {
    let catalog = load_catalog_or_exit(catalog_path);

    println!(
        "Catalog: {} ({} parts)",
        catalog_path
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
        catalog.len(),
    );
    println!();

    // Set up API clients only when enrichment was requested. A missing key
    // disables that enrichment with a warning instead of aborting.
    let creds = partscout_pitch::Credentials::load();
    let anthropic = if pitch {
        match creds
            .require_anthropic()
            .and_then(AnthropicClient::new)
        {
            Ok(client) => Some(client),
            Err(e) => {
                eprintln!(
                    "{} Pitch generation disabled: {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    e,
                );
                None
            }
        }
    } else {
        None
    };
    let elevenlabs = if voice {
        match creds
            .require_elevenlabs()
            .and_then(|key| ElevenLabsClient::new(key, creds.voice_id.clone()))
        {
            Ok(client) => Some(client),
            Err(e) => {
                eprintln!(
                    "{} Voice synthesis disabled: {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    e,
                );
                None
            }
        }
    } else {
        None
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let mut log = SessionLog::new();

    rt.block_on(async {
        for path in &files {
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    eprintln!(
                        "{} Skipping {}: not a valid filename",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        path.display(),
                    );
                    continue;
                }
            };

            let result = catalog.identify(file_name);
            println!("{}:", file_name.if_supports_color(Stdout, |t| t.bold()));
            println!(
                "  {} {}",
                "Identifier:".if_supports_color(Stdout, |t| t.cyan()),
                result.identifier,
            );

            let Some(tier) = result.tier else {
                println!(
                    "  {} {}",
                    "?".if_supports_color(Stdout, |t| t.yellow()),
                    "no matching parts found".if_supports_color(Stdout, |t| t.dimmed()),
                );
                println!();
                log.add(LogEntry::NoMatch {
                    file: file_name.to_string(),
                    identifier: result.identifier.clone(),
                });
                continue;
            };

            println!(
                "  {} {} match{} {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                result.rows.len(),
                if result.rows.len() == 1 { "" } else { "es" },
                format!("[{tier}]").if_supports_color(Stdout, |t| t.dimmed()),
            );
            for &idx in &result.rows {
                if let Some(entry) = catalog.get(idx) {
                    print_entry_line(entry);
                }
            }

            // Enrichment uses the first matched row
            let first = result.rows.first().and_then(|&idx| catalog.get(idx));
            let mut pitched = false;
            let mut voiced = false;

            if let (Some(client), Some(entry)) = (anthropic.as_ref(), first) {
                let pb = spinner("Generating sales pitch...");
                match generate_pitch(client, &entry.record).await {
                    Ok(text) => {
                        pb.finish_and_clear();
                        pitched = true;
                        println!(
                            "  {}",
                            "Pitch:".if_supports_color(Stdout, |t| t.bright_magenta()),
                        );
                        for line in text.lines() {
                            println!("    {}", line);
                        }

                        if let Some(tts) = elevenlabs.as_ref() {
                            let pb = spinner("Voicing pitch...");
                            match tts.synthesize(&text).await {
                                Ok(audio) => {
                                    pb.finish_and_clear();
                                    match write_audio(&out, file_name, &audio) {
                                        Ok(audio_path) => {
                                            voiced = true;
                                            println!(
                                                "  {} audio written to {}",
                                                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                                                audio_path
                                                    .display()
                                                    .if_supports_color(Stdout, |t| t.cyan()),
                                            );
                                        }
                                        Err(e) => {
                                            eprintln!(
                                                "  {} Could not write audio: {}",
                                                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                                                e,
                                            );
                                            log.add(LogEntry::Error {
                                                file: file_name.to_string(),
                                                message: format!("audio write failed: {e}"),
                                            });
                                        }
                                    }
                                }
                                Err(e) => {
                                    pb.finish_and_clear();
                                    eprintln!(
                                        "  {} Could not voice pitch: {}",
                                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                                        e,
                                    );
                                    log.add(LogEntry::Error {
                                        file: file_name.to_string(),
                                        message: format!("voice failed: {e}"),
                                    });
                                }
                            }
                        }
                    }
                    Err(e) => {
                        pb.finish_and_clear();
                        eprintln!(
                            "  {} Could not generate pitch: {}",
                            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                            e,
                        );
                        log.add(LogEntry::Error {
                            file: file_name.to_string(),
                            message: format!("pitch failed: {e}"),
                        });
                    }
                }
            }

            log.add(LogEntry::Matched {
                file: file_name.to_string(),
                part_name: first.map(|e| e.record.name.clone()).unwrap_or_default(),
                tier,
                row_count: result.rows.len(),
                pitched,
                voiced,
            });
            println!();
        }
    });

    print_identify_summary(&log);

    if !no_log {
        let log_path = out.join(format!(
            "identify-log-{}.txt",
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
        ));
        if let Err(e) = std::fs::create_dir_all(&out) {
            eprintln!("Warning: could not create output dir: {}", e);
        } else if let Err(e) = log.write_to_file(&log_path) {
            eprintln!("Warning: could not write session log: {}", e);
        } else {
            println!(
                "Log written to {}",
                log_path.display().if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
}

/// Print one matched catalog entry.
fn print_entry_line(entry: &partscout_catalog::CatalogEntry) {
    let record = &entry.record;
    let stock = record
        .stock
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!(
        "    {} [{}]  stock: {}  {}",
        record.name.if_supports_color(Stdout, |t| t.bold()),
        record
            .sku
            .as_deref()
            .unwrap_or("no SKU")
            .if_supports_color(Stdout, |t| t.cyan()),
        stock,
        record
            .price
            .as_deref()
            .unwrap_or("")
            .if_supports_color(Stdout, |t| t.green()),
    );
    if !record.description.is_empty() {
        println!(
            "      {}",
            record.description.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Print the overall identify summary.
fn print_identify_summary(log: &SessionLog) {
    let summary = log.summary();
    println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    println!(
        "  {} {} matched (filename: {}, image-sku: {}, sku-substring: {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.total_matched,
        summary.by_filename,
        summary.by_image_sku,
        summary.by_sku_substring,
    );
    if summary.total_unmatched > 0 {
        println!(
            "  {} {} unmatched",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            summary.total_unmatched,
        );
    }
    if summary.pitched > 0 || summary.voiced > 0 {
        println!(
            "  {} {} pitches generated, {} voiced",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.pitched,
            summary.voiced,
        );
    }
    if summary.total_errors > 0 {
        println!(
            "  {} {} errors",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.total_errors,
        );
    }
}

/// Write pitch audio next to the session log. Returns the written path.
fn write_audio(out: &Path, file_name: &str, audio: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(out)?;
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let path = out.join(format!("{stem}.mp3"));
    std::fs::write(&path, audio)?;
    Ok(path)
}

/// Print catalog rows as loaded.
fn run_catalog_preview(catalog_path: &Path, limit: Option<usize>) {
    let catalog = load_catalog_or_exit(catalog_path);

    let count = limit.unwrap_or(catalog.len()).min(catalog.len());
    println!(
        "{} ({} of {} parts)",
        "Catalog preview".if_supports_color(Stdout, |t| t.bold()),
        count,
        catalog.len(),
    );
    println!();

    for entry in catalog.entries().iter().take(count) {
        print_entry_line(entry);
    }
}

/// Print rows with an image URL and their derived fields.
fn run_catalog_derived(catalog_path: &Path) {
    let catalog = load_catalog_or_exit(catalog_path);

    println!(
        "{}",
        "Derived image fields".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    let mut shown = 0usize;
    for entry in catalog.entries() {
        let Some(url) = entry.record.image_url.as_deref() else {
            continue;
        };
        shown += 1;
        println!(
            "  {} [{}]",
            entry.record.name.if_supports_color(Stdout, |t| t.bold()),
            entry
                .record
                .sku
                .as_deref()
                .unwrap_or("no SKU")
                .if_supports_color(Stdout, |t| t.cyan()),
        );
        println!("    Image URL:         {}", url);
        match (&entry.image_sku, &entry.expected_filename) {
            (Some(sku), Some(expected)) => {
                println!("    Image SKU:         {}", sku);
                println!("    Expected filename: {}", expected);
            }
            _ => {
                println!(
                    "    {}",
                    "no __<digits> token in URL".if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }

    if shown == 0 {
        println!(
            "  {}",
            "No rows carry an image URL".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Print catalog counts.
fn run_catalog_stats(catalog_path: &Path) {
    let catalog = load_catalog_or_exit(catalog_path);

    let with_url = catalog
        .entries()
        .iter()
        .filter(|e| e.record.image_url.is_some())
        .count();
    let with_derived = catalog
        .entries()
        .iter()
        .filter(|e| e.image_sku.is_some())
        .count();
    let missing_sku = catalog
        .entries()
        .iter()
        .filter(|e| e.record.sku.is_none())
        .count();

    println!("{}", "Catalog stats:".if_supports_color(Stdout, |t| t.bold()));
    println!("  Parts:               {}", catalog.len());
    println!("  With image URL:      {}", with_url);
    println!("  With derived fields: {}", with_derived);
    println!("  Missing SKU:         {}", missing_sku);
}

// -- Config subcommands --

/// Mask a string, showing only the first 2 characters.
fn mask_value(s: &str) -> String {
    if s.len() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", &s[..2])
    }
}

/// Show current credentials and their sources.
fn run_config_show() {
    use partscout_pitch::CredentialSource;

    let path = partscout_pitch::config_path();
    let sources = partscout_pitch::credential_sources();
    let creds = partscout_pitch::Credentials::load();

    println!(
        "{}",
        "partscout Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    match &path {
        Some(p) if p.exists() => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            println!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    println!();

    let fields: &[(&str, &CredentialSource, Option<String>)] = &[
        (
            "anthropic_api_key",
            &sources.anthropic_api_key,
            creds.anthropic_api_key.as_deref().map(mask_value),
        ),
        (
            "elevenlabs_api_key",
            &sources.elevenlabs_api_key,
            creds.elevenlabs_api_key.as_deref().map(mask_value),
        ),
        ("voice_id", &sources.voice_id, Some(creds.voice_id.clone())),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => {
                println!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                println!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }
}

/// Interactively set up credentials.
fn run_config_setup() {
    println!(
        "{}",
        "partscout Credential Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    // Load existing config as defaults
    let existing = partscout_pitch::Credentials::load();

    let read_line = |prompt: &str, default: Option<&str>| -> Option<String> {
        if let Some(def) = default {
            print!("  {} [{}]: ", prompt, def);
        } else {
            print!("  {}: ", prompt);
        }
        std::io::stdout().flush().unwrap();

        let mut input = String::new();
        std::io::stdin().read_line(&mut input).unwrap();
        let trimmed = input.trim().to_string();

        if trimmed.is_empty() {
            return default.map(str::to_string);
        }
        Some(trimmed)
    };

    println!(
        "  {}",
        "API keys (press Enter to keep/skip):".if_supports_color(Stdout, |t| t.dimmed()),
    );
    let anthropic_api_key = read_line(
        "anthropic_api_key",
        existing.anthropic_api_key.as_deref(),
    );
    let elevenlabs_api_key = read_line(
        "elevenlabs_api_key",
        existing.elevenlabs_api_key.as_deref(),
    );
    let voice_id = read_line("voice_id", Some(existing.voice_id.as_str()))
        .unwrap_or_else(|| partscout_pitch::credentials::DEFAULT_VOICE_ID.to_string());

    let creds = partscout_pitch::Credentials {
        anthropic_api_key,
        elevenlabs_api_key,
        voice_id,
    };

    match partscout_pitch::save_to_file(&creds) {
        Ok(path) => {
            println!();
            println!(
                "{} Credentials saved to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        Err(e) => {
            eprintln!();
            eprintln!(
                "{} Failed to save credentials: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}

/// Test credentials against both APIs.
fn run_config_test() {
    let creds = partscout_pitch::Credentials::load();

    if creds.anthropic_api_key.is_none() && creds.elevenlabs_api_key.is_none() {
        eprintln!(
            "{} No API keys configured",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
        eprintln!();
        eprintln!("Run 'partscout config setup' to configure credentials.");
        return;
    }

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        match creds.require_anthropic().and_then(AnthropicClient::new) {
            Ok(client) => {
                let pb = spinner("Testing Anthropic API key...");
                match client.validate().await {
                    Ok(()) => {
                        pb.finish_and_clear();
                        println!(
                            "{} Anthropic API key is valid",
                            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        );
                    }
                    Err(e) => {
                        pb.finish_and_clear();
                        eprintln!(
                            "{} Anthropic validation failed: {}",
                            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                            e,
                        );
                    }
                }
            }
            Err(_) => {
                println!(
                    "{} Anthropic API key {}",
                    "?".if_supports_color(Stdout, |t| t.yellow()),
                    "not set".if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }

        match creds
            .require_elevenlabs()
            .and_then(|key| ElevenLabsClient::new(key, creds.voice_id.clone()))
        {
            Ok(client) => {
                let pb = spinner("Testing ElevenLabs API key...");
                match client.validate().await {
                    Ok(()) => {
                        pb.finish_and_clear();
                        println!(
                            "{} ElevenLabs API key is valid",
                            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        );
                    }
                    Err(e) => {
                        pb.finish_and_clear();
                        eprintln!(
                            "{} ElevenLabs validation failed: {}",
                            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                            e,
                        );
                    }
                }
            }
            Err(_) => {
                println!(
                    "{} ElevenLabs API key {}",
                    "?".if_supports_color(Stdout, |t| t.yellow()),
                    "not set".if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    });
}

/// Print the config file path.
fn run_config_path() {
    match partscout_pitch::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    }
}
