//! lookml-omni CLI - Convert LookML fields to Omni YAML
//!
//! Usage:
//!   lookml-omni convert <file.lkml|-> [--output <file.yaml>] [--strict]
//!   lookml-omni inspect <file.lkml> [--json]
//!   lookml-omni check <file.lkml>
//!
//! Examples:
//!   lookml-omni convert views/orders.view.lkml -o orders.yaml
//!   cat orders.view.lkml | lookml-omni convert -
//!   lookml-omni inspect views/orders.view.lkml --json

use clap::{Parser, Subcommand};
use lookml_omni::config::Settings;
use lookml_omni::convert::{convert, convert_with_fallback, ConvertOptions, Origin};
use lookml_omni::lookml::{self, Diagnostic};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lookml-omni")]
#[command(about = "lookml-omni - Convert LookML dimensions and measures to Omni YAML")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to lookml-omni.toml lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert LookML to Omni YAML
    Convert {
        /// Path to the LookML file, or `-` for stdin
        file: PathBuf,

        /// Write the YAML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print skipped lines as warnings
        #[arg(long)]
        strict: bool,

        /// Never run the configured fallback command
        #[arg(long)]
        no_fallback: bool,
    },

    /// List the fields found in a LookML file
    Inspect {
        /// Path to the LookML file, or `-` for stdin
        file: PathBuf,

        /// Print the scanned fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report lines the converter would skip
    Check {
        /// Path to the LookML file, or `-` for stdin
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Convert {
            file,
            output,
            strict,
            no_fallback,
        } => cmd_convert(&settings, file, output, strict, no_fallback),
        Commands::Inspect { file, json } => cmd_inspect(file, json),
        Commands::Check { file } => cmd_check(file),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, lookml_omni::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn read_source(file: &Path) -> Result<String, std::io::Error> {
    if file == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(file)
    }
}

fn cmd_convert(
    settings: &Settings,
    file: PathBuf,
    output: Option<PathBuf>,
    strict: bool,
    no_fallback: bool,
) -> ExitCode {
    let source = match read_source(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let options: ConvertOptions = settings.convert_options().strict(settings.scan.strict || strict);

    let provider = if no_fallback {
        None
    } else {
        match settings.fallback.provider() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let (yaml, warnings) = match provider {
        Some(provider) => match convert_with_fallback(&source, &options, &provider) {
            Ok(resolved) => {
                if resolved.origin == Origin::Fallback {
                    eprintln!("note: output produced by fallback '{}'", provider.program());
                }
                (resolved.yaml, resolved.warnings)
            }
            Err(e) => {
                eprintln!("Conversion error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let converted = convert(&source, &options);
            if converted.is_empty() {
                eprintln!(
                    "Conversion error: no dimensions or measures found in '{}'",
                    file.display()
                );
                return ExitCode::FAILURE;
            }
            (converted.yaml, converted.warnings)
        }
    };

    print_diagnostics(&warnings);

    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, yaml) {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", yaml),
    }
    ExitCode::SUCCESS
}

fn cmd_inspect(file: PathBuf, json: bool) -> ExitCode {
    let source = match read_source(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let objects = lookml::scan(&source);

    if json {
        match serde_json::to_string_pretty(&objects) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing fields: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("File: {}", file.display());
    println!();

    if objects.is_empty() {
        println!("No fields defined.");
        return ExitCode::SUCCESS;
    }

    for object in &objects {
        println!(
            "  {:<16} {:<32} {} properties (line {})",
            object.kind.keyword(),
            object.name,
            object.properties.len(),
            object.line
        );
    }

    ExitCode::SUCCESS
}

fn cmd_check(file: PathBuf) -> ExitCode {
    let source = match read_source(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = lookml::scan_with_diagnostics(&source);
    print_diagnostics(&result.diagnostics);

    if result.is_empty() {
        eprintln!("No dimensions or measures found in '{}'", file.display());
        return ExitCode::FAILURE;
    }

    println!(
        "{}: {} fields, {} skipped lines",
        file.display(),
        result.objects.len(),
        result.diagnostics.len()
    );

    if result.has_warnings() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("  {}", diag);
    }
}
