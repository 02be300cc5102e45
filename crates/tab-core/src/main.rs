//! tabsplit - split a restaurant bill from a photo to a shareable link
//!
//! The main entry point for the tabsplit CLI, handling:
//! - Receipt photo analysis through the vision model
//! - Validation of raw receipt JSON
//! - Share-link encoding and decoding
//! - One party's claim and share computation

use clap::{Args, Parser, Subcommand};
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tab_core::exit_codes::ExitCode;
use tab_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use tab_core::output::{self, OutputFormat};
use tab_core::session::{AppEvent, AppState, SessionError};
use tab_core::vision::{
    mime_for_path, GeminiClient, ImagePayload, ReceiptAnalyzer, VisionConfig, VisionError,
    DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use tab_link::{fragment_of, share_url, LinkError};
use tab_receipt::{Language, Receipt, ReceiptError};
use tracing::{debug, error, info, warn};

/// tabsplit - Snap a receipt, share a link, split the bill
#[derive(Parser)]
#[command(name = "tabsplit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a receipt photo and print the receipt plus its share link
    Analyze(AnalyzeArgs),

    /// Validate raw receipt JSON and emit a share token
    Encode(EncodeArgs),

    /// Decode a share link (or bare token) back into a receipt
    Decode(DecodeArgs),

    /// Validate raw receipt JSON and report ok/invalid
    Check(CheckArgs),

    /// Decode a share link and compute one party's share of the bill
    Claim(ClaimArgs),

    /// List supported translation languages
    Languages,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Receipt photo (jpeg/png/webp/heic)
    image: PathBuf,

    /// Treat IMAGE as a file containing a base64 data URI instead of raw bytes
    #[arg(long)]
    data_uri: bool,

    /// Target language for item descriptions
    #[arg(long, value_enum, default_value_t = Language::En)]
    language: Language,

    /// Base URL to attach the share token to as a fragment
    #[arg(long)]
    share_base: Option<String>,

    /// Vision API key
    #[arg(long, env = "TABSPLIT_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Vision model identifier
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Vision API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Vision request timeout (seconds)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Receipt JSON file (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Base URL to attach the share token to as a fragment
    #[arg(long)]
    share_base: Option<String>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Full URL, fragment, or bare share token
    link: String,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Receipt JSON file (reads stdin when omitted)
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ClaimArgs {
    /// Full URL, fragment, or bare share token
    link: String,

    /// Item to claim, as <id> or <id>:<split> (repeatable)
    #[arg(long = "item", value_name = "ID[:SPLIT]", required = true)]
    items: Vec<String>,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders its own message; --help and --version exit clean,
            // everything else is an argument error with a stable code.
            let code = if err.use_stderr() {
                ExitCode::ArgsError.as_i32()
            } else {
                0
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let log_level = if cli.global.quiet {
        LogLevel::Error
    } else {
        match cli.global.verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    };

    // Machine-readable stdout gets machine-readable stderr.
    let log_format = match cli.global.format {
        OutputFormat::Json => LogFormat::Json,
        _ => LogFormat::Human,
    };

    init_logging(&LogConfig {
        level: log_level,
        format: log_format,
        timestamps: true,
        ansi: !cli.global.no_color,
    });

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();
    debug!(format = %cli.global.format, "tabsplit starting");

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, args, &run_id),
        Commands::Encode(args) => run_encode(&cli.global, args, &run_id),
        Commands::Decode(args) => run_decode(&cli.global, args, &run_id),
        Commands::Check(args) => run_check(&cli.global, args, &run_id),
        Commands::Claim(args) => run_claim(&cli.global, args, &run_id),
        Commands::Languages => run_languages(&cli.global, &run_id),
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs, run_id: &str) -> ExitCode {
    let image = match load_image(args) {
        Ok(image) => image,
        Err(code) => return code,
    };

    let client = match GeminiClient::new(VisionConfig {
        api_base: args.api_base.clone(),
        api_key: args.api_key.clone(),
        model: args.model.clone(),
        timeout: Duration::from_secs(args.timeout),
    }) {
        Ok(client) => client,
        Err(err) => return reject_vision(&err),
    };

    let receipt = match client.analyze(&image, args.language) {
        Ok(receipt) => receipt,
        Err(err) => return reject_vision(&err),
    };

    let token = match tab_link::encode(&receipt) {
        Ok(token) => token,
        Err(err) => return encode_bug(&err),
    };
    let url = args
        .share_base
        .as_deref()
        .map(|base| share_url(base, &token));

    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "receipt": receipt,
                "token": token.as_str(),
                "url": url,
            });
            let wrapped = output::wrap(run_id, "analysis", payload);
            println!("{}", serde_json::to_string_pretty(&wrapped).unwrap());
        }
        OutputFormat::Md => {
            print!("{}", output::render_receipt_md(&receipt));
            println!();
            println!("Share: {}", url.as_deref().unwrap_or(token.as_str()));
        }
        OutputFormat::Summary => {
            println!("{}", url.as_deref().unwrap_or(token.as_str()));
        }
    }
    ExitCode::Clean
}

fn run_encode(global: &GlobalOpts, args: &EncodeArgs, run_id: &str) -> ExitCode {
    let raw = match read_json_input(args.file.as_deref()) {
        Ok(raw) => raw,
        Err(code) => return code,
    };
    let receipt = match tab_receipt::validate(&raw) {
        Ok(receipt) => receipt,
        Err(err) => return reject_receipt(&err),
    };
    let token = match tab_link::encode(&receipt) {
        Ok(token) => token,
        Err(err) => return encode_bug(&err),
    };
    info!(
        items = receipt.items.len(),
        token_len = token.as_str().len(),
        "receipt encoded"
    );
    let url = args
        .share_base
        .as_deref()
        .map(|base| share_url(base, &token));

    match global.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "token": token.as_str(),
                "url": url,
            });
            let wrapped = output::wrap(run_id, "share", payload);
            println!("{}", serde_json::to_string_pretty(&wrapped).unwrap());
        }
        OutputFormat::Md => {
            println!("# Share Link");
            println!();
            println!("{}", url.as_deref().unwrap_or(token.as_str()));
        }
        OutputFormat::Summary => {
            println!("{}", url.as_deref().unwrap_or(token.as_str()));
        }
    }
    ExitCode::Clean
}

fn run_decode(global: &GlobalOpts, args: &DecodeArgs, run_id: &str) -> ExitCode {
    let receipt = match decode_link(&args.link) {
        Ok(receipt) => receipt,
        Err(code) => return code,
    };
    info!(
        restaurant = %receipt.restaurant_name,
        items = receipt.items.len(),
        "link decoded"
    );

    match global.format {
        OutputFormat::Json => {
            let wrapped = output::wrap(
                run_id,
                "receipt",
                serde_json::to_value(&receipt).unwrap(),
            );
            println!("{}", serde_json::to_string_pretty(&wrapped).unwrap());
        }
        OutputFormat::Md => print!("{}", output::render_receipt_md(&receipt)),
        OutputFormat::Summary => println!("{}", output::render_receipt_summary(&receipt)),
    }
    ExitCode::Clean
}

fn run_check(global: &GlobalOpts, args: &CheckArgs, run_id: &str) -> ExitCode {
    let raw = match read_json_input(args.file.as_deref()) {
        Ok(raw) => raw,
        Err(code) => return code,
    };

    // The verdict is the payload here, so it goes to stdout either way;
    // the exit code carries the same answer for scripts.
    match tab_receipt::validate(&raw) {
        Ok(receipt) => {
            info!(
                restaurant = %receipt.restaurant_name,
                items = receipt.items.len(),
                "receipt ok"
            );
            match global.format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "status": "ok",
                        "receipt": receipt,
                    });
                    let wrapped = output::wrap(run_id, "check", payload);
                    println!("{}", serde_json::to_string_pretty(&wrapped).unwrap());
                }
                OutputFormat::Md => {
                    println!("Receipt OK");
                    println!();
                    print!("{}", output::render_receipt_md(&receipt));
                }
                OutputFormat::Summary => {
                    println!("ok: {}", output::render_receipt_summary(&receipt));
                }
            }
            ExitCode::Clean
        }
        Err(err) => {
            warn!(code = err.code(), error = %err, "receipt rejected");
            match global.format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "status": "invalid",
                        "error": {
                            "code": err.code(),
                            "headline": err.headline(),
                            "detail": err.to_string(),
                        },
                    });
                    let wrapped = output::wrap(run_id, "check", payload);
                    println!("{}", serde_json::to_string_pretty(&wrapped).unwrap());
                }
                OutputFormat::Md | OutputFormat::Summary => {
                    println!("invalid: {}", err);
                }
            }
            ExitCode::ReceiptInvalid
        }
    }
}

fn run_claim(global: &GlobalOpts, args: &ClaimArgs, run_id: &str) -> ExitCode {
    let receipt = match decode_link(&args.link) {
        Ok(receipt) => receipt,
        Err(code) => return code,
    };

    let mut claims: std::collections::BTreeMap<String, Option<u32>> = Default::default();
    for raw in &args.items {
        let (id, split) = parse_item_claim(raw);
        if !receipt.items.iter().any(|item| item.id == id) {
            warn!(item = %id, "claimed item is not on the receipt");
        }
        if claims.insert(id.clone(), split).is_some() {
            warn!(item = %id, "duplicate --item; keeping the last split");
        }
    }

    // Drive the same state machine the interactive flow uses: decode
    // lands in SelectItems, claims are toggle/split events, the share
    // is read off the Summary state.
    let mut state = match AppState::Home.apply(AppEvent::LinkDecoded(receipt)) {
        Ok(state) => state,
        Err(err) => return session_bug(&err),
    };
    for (id, split) in claims {
        state = match state.apply(AppEvent::ToggleItem(id.clone())) {
            Ok(state) => state,
            Err(err) => return session_bug(&err),
        };
        if let Some(count) = split {
            state = match state.apply(AppEvent::SetSplitCount(id, count)) {
                Ok(state) => state,
                Err(err) => return session_bug(&err),
            };
        }
    }
    let state = match state.apply(AppEvent::ShowSummary) {
        Ok(state) => state,
        Err(err) => return session_bug(&err),
    };

    let (Some(receipt), Some(selections), Some(share)) =
        (state.receipt(), state.selections(), state.allocation())
    else {
        error!("summary state carries no allocation");
        return ExitCode::InternalError;
    };
    info!(total = share.total, "share computed");

    match global.format {
        OutputFormat::Json => {
            let claimed: Vec<serde_json::Value> = output::claimed_shares(receipt, selections)
                .into_iter()
                .map(|(item, split, amount)| {
                    serde_json::json!({
                        "id": item.id,
                        "description": item.description,
                        "splitCount": split,
                        "share": amount,
                    })
                })
                .collect();
            let payload = serde_json::json!({
                "allocation": share,
                "claimed": claimed,
                "currency": receipt.currency,
            });
            let wrapped = output::wrap(run_id, "claim", payload);
            println!("{}", serde_json::to_string_pretty(&wrapped).unwrap());
        }
        OutputFormat::Md => {
            print!("{}", output::render_allocation_md(receipt, selections, &share));
        }
        OutputFormat::Summary => {
            println!("{}", output::render_allocation_summary(receipt, &share));
        }
    }
    ExitCode::Clean
}

fn run_languages(global: &GlobalOpts, run_id: &str) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let languages: Vec<serde_json::Value> = Language::all()
                .iter()
                .map(|lang| {
                    serde_json::json!({
                        "code": lang.code(),
                        "name": lang.english_name(),
                    })
                })
                .collect();
            let wrapped = output::wrap(run_id, "languages", serde_json::Value::Array(languages));
            println!("{}", serde_json::to_string_pretty(&wrapped).unwrap());
        }
        OutputFormat::Md => {
            println!("# Supported Languages");
            println!();
            for lang in Language::all() {
                println!("{:<4} {}", lang.code(), lang.english_name());
            }
        }
        OutputFormat::Summary => {
            let codes: Vec<&str> = Language::all().iter().map(|lang| lang.code()).collect();
            println!("{}", codes.join(" "));
        }
    }
    ExitCode::Clean
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Read raw receipt JSON from a file or stdin.
fn read_json_input(path: Option<&Path>) -> Result<serde_json::Value, ExitCode> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|err| {
            error!(path = %path.display(), error = %err, "cannot read input file");
            eprintln!("cannot read {}: {}", path.display(), err);
            ExitCode::IoError
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(|err| {
                error!(error = %err, "cannot read stdin");
                eprintln!("cannot read stdin: {}", err);
                ExitCode::IoError
            })?;
            buf
        }
    };

    serde_json::from_str(&raw).map_err(|err| {
        error!(error = %err, "input is not JSON");
        eprintln!("input is not JSON: {}", err);
        ExitCode::ReceiptInvalid
    })
}

/// Load the analyze input as raw image bytes or as a data-URI file.
fn load_image(args: &AnalyzeArgs) -> Result<ImagePayload, ExitCode> {
    if args.data_uri {
        let text = std::fs::read_to_string(&args.image).map_err(|err| {
            error!(path = %args.image.display(), error = %err, "cannot read data URI file");
            eprintln!("cannot read {}: {}", args.image.display(), err);
            ExitCode::IoError
        })?;
        return ImagePayload::from_data_uri(&text).map_err(|err| reject_vision(&err));
    }

    let bytes = std::fs::read(&args.image).map_err(|err| {
        error!(path = %args.image.display(), error = %err, "cannot read image file");
        eprintln!("cannot read {}: {}", args.image.display(), err);
        ExitCode::IoError
    })?;
    let mime = mime_for_path(&args.image);
    debug!(
        path = %args.image.display(),
        mime,
        bytes = bytes.len(),
        "image loaded"
    );
    Ok(ImagePayload::from_bytes(&bytes, mime))
}

/// Extract the token from a URL/fragment/bare input and decode it.
fn decode_link(input: &str) -> Result<Receipt, ExitCode> {
    let Some(token) = fragment_of(input) else {
        error!("empty link input");
        eprintln!("Invalid Link: nothing to decode");
        return Err(ExitCode::LinkInvalid);
    };
    tab_link::decode(token).map_err(|err| reject_link(&err))
}

/// Parse `<id>` or `<id>:<split>`; a non-numeric suffix stays in the id.
fn parse_item_claim(raw: &str) -> (String, Option<u32>) {
    if let Some((id, split)) = raw.rsplit_once(':') {
        if !id.is_empty() {
            if let Ok(count) = split.parse::<u32>() {
                return (id.to_string(), Some(count));
            }
        }
    }
    (raw.to_string(), None)
}

fn reject_receipt(err: &ReceiptError) -> ExitCode {
    error!(code = err.code(), error = %err, "receipt rejected");
    eprintln!("{}: {}", err.headline(), err);
    eprintln!("{}", err.remediation());
    ExitCode::ReceiptInvalid
}

fn reject_link(err: &LinkError) -> ExitCode {
    error!(code = err.code(), error = %err, "link rejected");
    eprintln!("{}: {}", err.headline(), err);
    eprintln!("{}", err.remediation());
    ExitCode::LinkInvalid
}

fn reject_vision(err: &VisionError) -> ExitCode {
    error!(code = err.code(), error = %err, "analysis failed");
    eprintln!("{}: {}", err.headline(), err);
    eprintln!("{}", err.remediation());
    ExitCode::AnalysisFailed
}

/// Encoding a validated receipt cannot fail; if it does, that is a bug.
fn encode_bug(err: &LinkError) -> ExitCode {
    error!(code = err.code(), error = %err, "share token encoding failed");
    eprintln!("internal error: {}", err);
    ExitCode::InternalError
}

fn session_bug(err: &SessionError) -> ExitCode {
    error!(code = err.code(), error = %err, "session transition bug");
    eprintln!("internal error: {}", err);
    ExitCode::InternalError
}
