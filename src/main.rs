//! Thin CLI front end over the `curator` library.
//!
//! Kept deliberately small: the full CLI/configuration-loading layer is an
//! external-collaborator concern, this just exercises the dispatcher,
//! module registry, and handler contract end to end. Flag style follows
//! the teacher's `clap` derive usage
//! (`examples/photostructure-exif-oxide/src/main.rs`).

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use curator::dispatcher::{AbortFlag, Dispatcher};
use curator::handler::{AppDescriptor, Handler, HandlerDescriptor, JsonHandler, TextHandler, XmlHandler};
use curator::hash::ChecksumAlgorithm;
use curator::module::ModuleOptions;
use curator::modules;

const APP: AppDescriptor = AppDescriptor {
    name: "curator",
    release: env!("CARGO_PKG_VERSION"),
    date: "2026-01-01",
    rights: "Released under the MIT license",
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChecksumKind {
    Crc32,
    Md5,
    Sha1,
}

impl From<ChecksumKind> for ChecksumAlgorithm {
    fn from(value: ChecksumKind) -> Self {
        match value {
            ChecksumKind::Crc32 => ChecksumAlgorithm::Crc32,
            ChecksumKind::Md5 => ChecksumAlgorithm::Md5,
            ChecksumKind::Sha1 => ChecksumAlgorithm::Sha1,
        }
    }
}

/// Identify, validate, and characterize a file or directory of files.
#[derive(Debug, Parser)]
#[command(name = "curator", version, about)]
struct Cli {
    /// File or directory to process.
    path: PathBuf,

    /// Pin a specific module by name (e.g. "TIFF-hul") instead of letting
    /// the signature matcher choose.
    #[arg(short, long)]
    module: Option<String>,

    /// Output handler to use.
    #[arg(short = 'H', long, value_enum, default_value_t = HandlerKindArg::Text)]
    handler: HandlerKindArg,

    /// Emit bitfield/enum properties as raw integers instead of labels.
    #[arg(long)]
    raw: bool,

    /// Only run signature matching; do not parse.
    #[arg(long)]
    signature: bool,

    /// Checksum algorithms to compute (repeatable).
    #[arg(short, long, value_enum)]
    checksum: Vec<ChecksumKind>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HandlerKindArg {
    Json,
    Xml,
    Text,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    modules::register_all();

    let mut options = ModuleOptions::new();
    options.raw = cli.raw;

    let algorithms: Vec<ChecksumAlgorithm> = if cli.checksum.is_empty() {
        vec![ChecksumAlgorithm::Crc32, ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha1]
    } else {
        cli.checksum.into_iter().map(ChecksumAlgorithm::from).collect()
    };

    let dispatcher = Dispatcher {
        options,
        checksum_algorithms: algorithms,
        abort: AbortFlag::new(),
        pinned_module: cli.module,
        signature_only: cli.signature,
    };

    tracing::info!(path = %cli.path.display(), "dispatching");

    let stdout = io::stdout();
    match cli.handler {
        HandlerKindArg::Json => run(
            &dispatcher,
            &cli.path,
            JsonHandler::new(stdout.lock()),
            HandlerDescriptor {
                name: "JSON",
                release: "1.0",
                date: "2026-01-01",
                vendor: "curator",
                note: "line-delimited JSON RepInfo records",
                rights: "",
            },
        ),
        HandlerKindArg::Xml => run(
            &dispatcher,
            &cli.path,
            XmlHandler::new(stdout.lock()),
            HandlerDescriptor {
                name: "XML",
                release: "1.0",
                date: "2026-01-01",
                vendor: "curator",
                note: "JHOVE-style jhove-output schema",
                rights: "",
            },
        ),
        HandlerKindArg::Text => run(
            &dispatcher,
            &cli.path,
            TextHandler::new(stdout.lock()),
            HandlerDescriptor {
                name: "TEXT",
                release: "1.0",
                date: "2026-01-01",
                vendor: "curator",
                note: "human-readable indented output",
                rights: "",
            },
        ),
    }
}

fn run(
    dispatcher: &Dispatcher,
    path: &PathBuf,
    mut handler: impl Handler,
    handler_descriptor: HandlerDescriptor,
) -> anyhow::Result<()> {
    handler.show_header()?;
    handler.show_app(&APP)?;
    handler.show_handler(&handler_descriptor)?;
    dispatcher.process_path(path, &mut handler)?;
    handler.show_footer()?;
    handler.close()?;
    Ok(())
}
