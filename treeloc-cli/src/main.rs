mod stats;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use treeloc::{Error, Project, TracingSink};

use crate::stats::{print_stats, print_untranslated};

/// Simple pattern based internationalization tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base path that the config and translation file lie in
    #[arg(value_name = "BASE_PATH")]
    base_path: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands. Paths are relative to BASE_PATH.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print statistics about the translation file.
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the untranslated ids for each locale in the translation file.
    Untranslated,

    /// List the ids used in the translatable files in the folder and its sub folders.
    ListIds {
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Only print ids that are not already present in the translation file
        #[arg(long)]
        only_untranslated: bool,
    },

    /// Gather the ids used in the translatable files and add them to the translation file.
    GatherIds {
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,
    },

    /// Translate and post-process a single file.
    TranslateFile {
        #[arg(value_name = "LOCALE")]
        locale: String,
        #[arg(value_name = "INPUT_FILE")]
        input_file: PathBuf,
        #[arg(value_name = "OUTPUT_FILE")]
        output_file: PathBuf,
    },

    /// Copy all files from SOURCE_FOLDER into TARGET_FOLDER, translating them on the way.
    Translate {
        #[arg(value_name = "LOCALE")]
        locale: String,
        #[arg(value_name = "SOURCE_FOLDER")]
        source_folder: PathBuf,
        #[arg(value_name = "TARGET_FOLDER")]
        target_folder: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn require_dir(project: &Project, folder: &Path) -> Result<(), String> {
    let path = project.abspath(folder);
    if !path.is_dir() {
        return Err(format!("{:?} is not a directory", path));
    }
    Ok(())
}

fn require_file(project: &Project, file: &Path) -> Result<(), String> {
    let path = project.abspath(file);
    if !path.is_file() {
        return Err(format!("{:?} is not a file", path));
    }
    Ok(())
}

fn run(args: Args) -> Result<(), String> {
    if !args.base_path.is_dir() {
        return Err(format!("{:?} is not a directory", args.base_path));
    }
    let mut project = Project::open(&args.base_path).map_err(|e| e.to_string())?;
    tracing::debug!(
        base_path = %args.base_path.display(),
        locales = ?project.store().locale_ids(),
        ids = project.store().ids().len(),
        "opened project"
    );

    match args.commands {
        Commands::Stats { json } => {
            print_stats(project.store(), json).map_err(|e| e.to_string())?;
        }
        Commands::Untranslated => print_untranslated(project.store()),
        Commands::ListIds {
            folder,
            only_untranslated,
        } => {
            require_dir(&project, &folder)?;
            let ids = project
                .list_ids(&folder, only_untranslated)
                .map_err(|e| e.to_string())?;
            for id in ids {
                println!("{}", id);
            }
        }
        Commands::GatherIds { folder } => {
            require_dir(&project, &folder)?;
            let added = project
                .gather_translations(&folder)
                .map_err(|e| e.to_string())?;
            println!(
                "Added {} new ids to {}",
                added.len(),
                project.translation_file().display()
            );
        }
        Commands::TranslateFile {
            locale,
            input_file,
            output_file,
        } => {
            require_file(&project, &input_file)?;
            project
                .translate_file(&locale, &input_file, &output_file, &mut TracingSink)
                .map_err(describe)?;
        }
        Commands::Translate {
            locale,
            source_folder,
            target_folder,
        } => {
            require_dir(&project, &source_folder)?;
            let summary = project
                .translate(&locale, &source_folder, &target_folder, &mut TracingSink)
                .map_err(describe)?;
            println!(
                "Translated {} files, copied {} files, compressed {} files",
                summary.translated, summary.copied, summary.compressed
            );
        }
    }
    Ok(())
}

fn describe(error: Error) -> String {
    match error {
        Error::UnknownLocale(_) => format!("{} (see `stats` for the known locales)", error),
        other => other.to_string(),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
