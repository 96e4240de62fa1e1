//! `docgen`: local command-line front end for the same render pipeline
//! the HTTP service exposes, with no Redis/HTTP layer involved —
//! `Orchestrator` is given a disabled cache backend directly.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use docgen_cache::backend::DisabledBackend;
use docgen_cache::DocumentCache;
use docgen_orchestrator::{Orchestrator, OrchestratorError};
use docgen_types::model::{DocumentRequest, DocumentType, Format};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "docgen")]
#[command(about = "Generate résumés and cover letters from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document from a JSON or YAML input file.
    Generate {
        document_type: String,
        template: String,
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "pdf")]
        format: String,
        #[arg(long)]
        ultra_validation: bool,
    },
    /// List every registered template, optionally scoped to a document type.
    List {
        document_type: Option<String>,
    },
    /// Show the required fields and description for one template.
    Info {
        document_type: String,
        template: String,
    },
    /// Write an illustrative sample payload for a document type.
    Sample {
        document_type: String,
        output: PathBuf,
    },
}

/// Exit codes, per the CLI's own contract (not shared with the HTTP
/// error-code taxonomy, which is wire-level rather than process-level).
mod exit {
    pub const OK: u8 = 0;
    pub const USAGE: u8 = 2;
    pub const VALIDATION: u8 = 3;
    pub const TEMPLATE_NOT_FOUND: u8 = 4;
    pub const COMPILATION: u8 = 5;
    pub const OTHER: u8 = 1;
}

fn parse_document_type(raw: &str) -> Result<DocumentType, ExitCode> {
    raw.parse::<DocumentType>().map_err(|message| {
        eprintln!("error: {message}");
        ExitCode::from(exit::USAGE)
    })
}

fn load_input(path: &PathBuf) -> Result<serde_json::Value, ExitCode> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read {}: {e}", path.display());
        ExitCode::from(exit::USAGE)
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| {
            eprintln!("error: malformed YAML in {}: {e}", path.display());
            ExitCode::from(exit::USAGE)
        })
    } else {
        serde_json::from_str(&raw).map_err(|e| {
            eprintln!("error: malformed JSON in {}: {e}", path.display());
            ExitCode::from(exit::USAGE)
        })
    }
}

fn orchestrator_exit_code(error: &OrchestratorError) -> u8 {
    match error {
        OrchestratorError::Validation(_) => exit::VALIDATION,
        OrchestratorError::Template(e) => match e {
            docgen_templates::TemplateError::NotFound { .. } => exit::TEMPLATE_NOT_FOUND,
            docgen_templates::TemplateError::MissingRequiredField { .. } => exit::VALIDATION,
            docgen_templates::TemplateError::RenderingFailed { .. } => exit::COMPILATION,
        },
        OrchestratorError::Docx(_) => exit::COMPILATION,
        OrchestratorError::Compile(_) | OrchestratorError::CompileErrors(_) => exit::COMPILATION,
    }
}

fn build_orchestrator() -> Orchestrator {
    let cache = Arc::new(DocumentCache::new(
        Arc::new(DisabledBackend),
        docgen_cache::DEFAULT_PDF_TTL_SECONDS,
        docgen_cache::DEFAULT_TYPST_TTL_SECONDS,
    ));
    Orchestrator::new(cache)
}

async fn run(command: Command) -> ExitCode {
    match command {
        Command::Generate {
            document_type,
            template,
            input,
            output,
            format,
            ultra_validation,
        } => {
            let document_type = match parse_document_type(&document_type) {
                Ok(dt) => dt,
                Err(code) => return code,
            };
            let format = match format.parse::<FormatArg>() {
                Ok(f) => f.0,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(exit::USAGE);
                }
            };
            let data = match load_input(&input) {
                Ok(v) => v,
                Err(code) => return code,
            };

            let request = DocumentRequest {
                document_type,
                template,
                format,
                data,
                ultra_validation,
                spacing_mode: None,
            };

            let orchestrator = build_orchestrator();
            match orchestrator.render(request).await {
                Ok(artifact) => {
                    if let Err(e) = std::fs::write(&output, &artifact.bytes) {
                        eprintln!("error: cannot write {}: {e}", output.display());
                        return ExitCode::from(exit::OTHER);
                    }
                    println!("wrote {} ({} bytes)", output.display(), artifact.bytes.len());
                    ExitCode::from(exit::OK)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::from(orchestrator_exit_code(&e))
                }
            }
        }

        Command::List { document_type } => {
            let document_type = match document_type {
                Some(raw) => match parse_document_type(&raw) {
                    Ok(dt) => Some(dt),
                    Err(code) => return code,
                },
                None => None,
            };
            for info in docgen_templates::list(document_type) {
                println!("{}/{}: {}", info.document_type, info.name, info.description);
            }
            ExitCode::from(exit::OK)
        }

        Command::Info {
            document_type,
            template,
        } => {
            let document_type = match parse_document_type(&document_type) {
                Ok(dt) => dt,
                Err(code) => return code,
            };
            match docgen_templates::get(document_type, &template) {
                Ok(info) => {
                    println!("{}/{}", info.document_type, info.name);
                    println!("{}", info.description);
                    println!("required fields:");
                    for field in &info.required_fields {
                        println!("  {field}");
                    }
                    ExitCode::from(exit::OK)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::from(exit::TEMPLATE_NOT_FOUND)
                }
            }
        }

        Command::Sample {
            document_type,
            output,
        } => {
            let document_type = match parse_document_type(&document_type) {
                Ok(dt) => dt,
                Err(code) => return code,
            };
            let sample = docgen_templates::sample_data(document_type);
            let rendered = match serde_json::to_string_pretty(&sample) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(exit::OTHER);
                }
            };
            if let Err(e) = std::fs::write(&output, rendered) {
                eprintln!("error: cannot write {}: {e}", output.display());
                return ExitCode::from(exit::OTHER);
            }
            println!("wrote {}", output.display());
            ExitCode::from(exit::OK)
        }
    }
}

/// Thin wrapper so `Format`'s `FromStr` (not implemented on the type
/// itself, since the wire layer uses serde rename rules instead) has a
/// CLI-local home.
struct FormatArg(Format);

impl std::str::FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(FormatArg(Format::Pdf)),
            "typst" | "typ" => Ok(FormatArg(Format::Typst)),
            "docx" => Ok(FormatArg(Format::Docx)),
            other => Err(format!("unknown format '{other}' (expected pdf, typst, or docx)")),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli.command).await
}
