use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracemark::cli::{detect_leak, generate_campaign, render_matches, show_info};
use tracemark::embed::EmbedOptions;
use tracemark::format::FormatFamily;
use tracemark::metadata::{ExifTool, MetadataEditor, NullEditor};
use tracemark::project::Project;

/// Version info from build.rs
const VERSION: &str = env!("TRACEMARK_VERSION");
const BUILD: &str = env!("TRACEMARK_BUILD");
const PROFILE: &str = env!("TRACEMARK_PROFILE");
const GIT_HASH: &str = env!("TRACEMARK_GIT_HASH");

/// Combined version string (compile-time concatenation not possible, so we build at runtime)
fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "tracemark")]
#[command(author, about = "Leak-attribution fingerprinting for distributed documents", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Directory the project lives under
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create fingerprinted copies of a base file for every target
    #[command(alias = "g")]
    Generate {
        /// Name of the project
        #[arg(short = 'n', long)]
        project: String,

        /// Target list: one "name,contact" pair per line
        #[arg(short = 't', long)]
        targets: PathBuf,

        /// Base file to fingerprint
        #[arg(short = 'f', long)]
        file: PathBuf,

        /// Skip the binary-append channel
        #[arg(long)]
        no_binary: bool,

        /// Skip the metadata channel
        #[arg(long)]
        no_metadata: bool,

        /// Skip the PDF watermark channel
        #[arg(long)]
        no_watermark: bool,
    },

    /// Find who a suspect file traces back to
    #[command(alias = "d")]
    Detect {
        /// Name of the project
        #[arg(short = 'n', long)]
        project: String,

        /// Suspect file to inspect
        #[arg(short = 'f', long)]
        file: PathBuf,
    },

    /// Show a project's fingerprint store
    #[command(alias = "i")]
    Info {
        /// Name of the project
        #[arg(short = 'n', long)]
        project: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("tracemark {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().unwrap();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Generate {
            project,
            targets,
            file,
            no_binary,
            no_metadata,
            no_watermark,
        } => {
            let options = EmbedOptions {
                binary: !no_binary,
                metadata: !no_metadata,
                watermark: !no_watermark,
            };
            if !options.any() {
                eprintln!("{}", "All embedding channels are disabled".red());
                return ExitCode::FAILURE;
            }

            // Document packages get their metadata patched by the repacker,
            // so exiftool is only mandatory for the other families
            let family = FormatFamily::classify_path(&file);
            let exiftool = ExifTool::default();
            let tool_available = exiftool.is_available();
            if options.metadata && !family.is_container() && !tool_available {
                eprintln!(
                    "{}",
                    "exiftool not found: install it or pass --no-metadata".red()
                );
                return ExitCode::FAILURE;
            }
            let editor: Box<dyn MetadataEditor> = if tool_available {
                Box::new(exiftool)
            } else {
                Box::new(NullEditor)
            };

            let project = Project::new(&cli.root, project);
            match generate_campaign(&project, &file, &targets, &options, editor.as_ref()) {
                Ok(records) => {
                    println!(
                        "{}",
                        format!(
                            "Fingerprinted {} copies under {}",
                            records.len(),
                            project.files_dir().display()
                        )
                        .magenta()
                    );
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }

        Commands::Detect { project, file } => {
            let project = Project::new(&cli.root, project);
            let exiftool = ExifTool::default();
            let editor: Box<dyn MetadataEditor> = if exiftool.is_available() {
                Box::new(exiftool)
            } else {
                eprintln!(
                    "{}",
                    "exiftool not found: metadata channel skipped".yellow()
                );
                Box::new(NullEditor)
            };

            match detect_leak(&project, &file, editor.as_ref()) {
                Ok(matches) => {
                    if matches.is_empty() {
                        print!("{}", render_matches(&matches));
                    } else {
                        print!("{}", render_matches(&matches).magenta());
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }

        Commands::Info { project } => {
            let project = Project::new(&cli.root, project);
            match show_info(&project) {
                Ok(info) => {
                    print!("{}", info);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            ExitCode::FAILURE
        }
    }
}
