//! Command-line interface for the plantscribe utility
//!
//! Loads a JSON codebase manifest, lists its assemblies and classes, and
//! renders a selected class as a PlantUML diagram.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::clipboard::FileClipboard;
use plantscribe::controller::SelectionController;
use plantscribe::core::logging::init_logging;
use plantscribe::index::{Session, SolutionIndex};
use plantscribe::manifest::ManifestCodebase;
use plantscribe::{DiagramConfig, NameQualifier};

/// Plantscribe - PlantUML class diagrams from a codebase manifest
#[derive(Parser)]
#[command(name = "plantscribe")]
#[command(about = "Browse a codebase manifest and render PlantUML class diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the assemblies of a manifest
    Assemblies {
        /// Manifest file (use - for stdin)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List the classes of one assembly
    Classes {
        /// Manifest file (use - for stdin)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Assembly to list
        #[arg(short, long)]
        assembly: String,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Render one class as a PlantUML diagram
    Render {
        /// Manifest file (use - for stdin)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Assembly containing the class
        #[arg(short, long)]
        assembly: String,

        /// Class to render, by qualified name or identifier
        #[arg(short, long)]
        class: String,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also copy the diagram to this file
        #[arg(long)]
        copy_to: Option<PathBuf>,

        /// How diagram nodes are labelled
        #[arg(long, value_enum, default_value_t = QualifierChoice::Namespace)]
        qualifier: QualifierChoice,

        /// Extra base type names to treat like `object` (repeatable)
        #[arg(long = "root-type")]
        root_types: Vec<String>,
    },

    /// Dump the whole index as JSON
    Inspect {
        /// Manifest file (use - for stdin)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output file for the JSON (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Node label styles
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum QualifierChoice {
    /// `Namespace.Type`
    #[default]
    Namespace,
    /// `Assembly.Type`
    Assembly,
    /// `Type`
    Bare,
}

impl From<QualifierChoice> for NameQualifier {
    fn from(value: QualifierChoice) -> Self {
        match value {
            QualifierChoice::Namespace => NameQualifier::Namespace,
            QualifierChoice::Assembly => NameQualifier::Assembly,
            QualifierChoice::Bare => NameQualifier::Bare,
        }
    }
}

#[derive(Serialize)]
struct AssemblyList<'a> {
    assemblies: &'a [String],
    total: usize,
}

#[derive(Serialize)]
struct ClassList<'a> {
    assembly: &'a str,
    classes: &'a [String],
    total: usize,
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct PlantscribeApp;

impl PlantscribeApp {
    pub fn new() -> Self {
        Self
    }

    fn build_config(qualifier: QualifierChoice, root_types: &[String]) -> DiagramConfig {
        root_types
            .iter()
            .fold(DiagramConfig::new().with_qualifier(qualifier.into()), |config, root| {
                config.with_root_type(root.as_str())
            })
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Flags win over PLANTSCRIBE_LOG_LEVEL / PLANTSCRIBE_LOG_FORMAT
        if let Err(e) = init_logging(
            cli.log_level.map(|l| l.as_str()),
            cli.log_format.map(|f| f.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Plantscribe v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Assemblies { manifest, json } => {
                self.assemblies_command(manifest, json, cli.verbose)
            }
            Commands::Classes {
                manifest,
                assembly,
                json,
            } => self.classes_command(manifest, &assembly, json, cli.verbose),
            Commands::Render {
                manifest,
                assembly,
                class,
                output,
                copy_to,
                qualifier,
                root_types,
            } => {
                let config = Self::build_config(qualifier, &root_types);
                let diagram =
                    self.render_command(manifest, &assembly, &class, copy_to, &config, cli.verbose)?;
                self.write_output(output, &diagram)
            }
            Commands::Inspect { manifest, output } => {
                let index = self.load_index(manifest, &DiagramConfig::default(), cli.verbose)?;
                let json = serde_json::to_string_pretty(&*index)?;
                self.write_output(output, &json)
            }
        }
    }

    /// Read, parse and index a manifest
    pub fn load_index(
        &self,
        manifest: Option<PathBuf>,
        config: &DiagramConfig,
        verbose: bool,
    ) -> Result<Arc<SolutionIndex>> {
        let codebase = self.load_codebase(manifest, verbose)?;
        let index = Session::with_config(config).load(&codebase)?;
        if verbose {
            eprintln!(
                "Indexed {} assemblies, {} types ({} documents skipped)",
                index.assembly_count(),
                index.type_count(),
                index.skipped_documents()
            );
        }
        Ok(index)
    }

    fn load_codebase(&self, manifest: Option<PathBuf>, verbose: bool) -> Result<ManifestCodebase> {
        let content = self.read_input(manifest)?;
        if verbose {
            eprintln!("Read {} bytes of manifest", content.len());
        }
        Ok(ManifestCodebase::from_json_str(&content)?)
    }

    /// Handle the assemblies command
    fn assemblies_command(&self, manifest: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let index = self.load_index(manifest, &DiagramConfig::default(), verbose)?;
        let names = index.assembly_names();
        debug!(assembly_count = names.len(), "Listing assemblies");

        if json {
            let list = AssemblyList {
                assemblies: &names,
                total: names.len(),
            };
            println!("{}", serde_json::to_string_pretty(&list)?);
        } else {
            for name in &names {
                println!("{}", name);
            }
        }
        Ok(())
    }

    /// Handle the classes command
    fn classes_command(
        &self,
        manifest: Option<PathBuf>,
        assembly: &str,
        json: bool,
        verbose: bool,
    ) -> Result<()> {
        let index = self.load_index(manifest, &DiagramConfig::default(), verbose)?;
        let classes = index
            .class_names(assembly)
            .ok_or_else(|| anyhow!("Assembly '{}' not found", assembly))?;

        if json {
            let list = ClassList {
                assembly,
                classes: &classes,
                total: classes.len(),
            };
            println!("{}", serde_json::to_string_pretty(&list)?);
        } else {
            for class in &classes {
                println!("{}", class);
            }
        }
        Ok(())
    }

    /// Drive the selection controller to render one class
    pub fn render_command(
        &self,
        manifest: Option<PathBuf>,
        assembly: &str,
        class: &str,
        copy_to: Option<PathBuf>,
        config: &DiagramConfig,
        verbose: bool,
    ) -> Result<String> {
        let codebase = self.load_codebase(manifest, verbose)?;
        let session = Session::with_config(config);

        let controller = SelectionController::new(config);
        let mut controller = match copy_to {
            Some(path) => controller.with_clipboard(FileClipboard::new(path)),
            None => controller,
        };
        controller.request_load(&session, &codebase)?;

        if !controller.select_assembly(assembly) {
            return Err(anyhow!("Assembly '{}' not found", assembly));
        }
        let diagram = controller
            .select_class(class)
            .ok_or_else(|| anyhow!("Class '{}' not found in assembly '{}'", class, assembly))?;

        info!(assembly, class, "Rendered diagram");
        if verbose {
            eprintln!("Rendered {} bytes of PlantUML", diagram.len());
        }
        Ok(diagram)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read manifest '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}
