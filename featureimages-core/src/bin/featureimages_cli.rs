//! FeatureImages CLI - Bridge interface for CMS hosts
//!
//! Commands: generate, compile, write, fields, validate
//! Outputs CSS or JSON to stdout, logs to stderr
//! Returns 2 on validation failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use featureimages_core::{
    plan_fields, FeatureImagePipeline, FeatureImagesConfig, HostRelativeResolver, PageImages,
    PipelineError,
};

#[derive(Parser)]
#[command(name = "featureimages-cli")]
#[command(about = "FeatureImages CLI - responsive background stylesheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stylesheet for a page
    Generate {
        /// JSON payload (PageImages)
        #[arg(short, long)]
        payload: String,

        /// Protocol and host to strip from image URLs
        #[arg(long, default_value = "")]
        host: String,
    },

    /// Print the compiled stylesheet record as JSON
    Compile {
        #[arg(short, long)]
        payload: String,

        #[arg(long, default_value = "")]
        host: String,
    },

    /// Write the stylesheet into the page's feature image folder
    Write {
        #[arg(short, long)]
        payload: String,

        #[arg(long, default_value = "")]
        host: String,

        /// Assets directory
        #[arg(long)]
        assets_dir: PathBuf,

        /// Page folder name under the feature images root
        #[arg(long)]
        folder: String,
    },

    /// List the CMS fields this configuration enables
    Fields,

    /// Validate a payload against the breakpoint table
    Validate {
        #[arg(short, long)]
        payload: String,
    },
}

fn error_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "success": false, "error": e.to_string() }).to_string()
}

fn print_json(value: &impl serde::Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", error_json(e));
            ExitCode::FAILURE
        }
    }
}

fn parse_payload(payload: &str) -> Result<PageImages, ExitCode> {
    serde_json::from_str(payload).map_err(|e| {
        println!("{}", error_json(format!("Invalid payload: {}", e)));
        ExitCode::FAILURE
    })
}

fn failure_code(e: &PipelineError) -> ExitCode {
    match e {
        PipelineError::ValidationFailed(_) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match FeatureImagesConfig::load_from_file(path) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", error_json(e));
                return ExitCode::FAILURE;
            }
        },
        None => FeatureImagesConfig::default(),
    };

    let pipeline = FeatureImagePipeline::new(config);

    match cli.command {
        Commands::Generate { payload, host } => {
            let page = match parse_payload(&payload) {
                Ok(p) => p,
                Err(code) => return code,
            };
            match pipeline.compile(page.page_id, &page.images, &HostRelativeResolver::new(host)) {
                Ok(compiled) => {
                    print!("{}", compiled.css);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("{}", error_json(&e));
                    failure_code(&e)
                }
            }
        }

        Commands::Compile { payload, host } => {
            let page = match parse_payload(&payload) {
                Ok(p) => p,
                Err(code) => return code,
            };
            match pipeline.compile(page.page_id, &page.images, &HostRelativeResolver::new(host)) {
                Ok(compiled) => print_json(&serde_json::json!({ "success": true, "stylesheet": compiled })),
                Err(e) => {
                    println!("{}", error_json(&e));
                    failure_code(&e)
                }
            }
        }

        Commands::Write { payload, host, assets_dir, folder } => {
            let page = match parse_payload(&payload) {
                Ok(p) => p,
                Err(code) => return code,
            };
            let path = pipeline.config().stylesheet_path(&assets_dir, &folder);
            let resolver = HostRelativeResolver::new(host);
            match pipeline.regenerate(page.page_id, &page.images, &resolver, &path) {
                Ok(outcome) => print_json(&serde_json::json!({
                    "success": true,
                    "result": outcome,
                    "url": pipeline.config().stylesheet_url(&folder),
                })),
                Err(e) => {
                    println!("{}", error_json(&e));
                    failure_code(&e)
                }
            }
        }

        Commands::Fields => print_json(&plan_fields(pipeline.config())),

        Commands::Validate { payload } => {
            let page = match parse_payload(&payload) {
                Ok(p) => p,
                Err(code) => return code,
            };
            let result = pipeline.validate(&page.images);
            let code = print_json(&result);
            if result.valid {
                code
            } else {
                ExitCode::from(2)
            }
        }
    }
}
