use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quiz_runner::logging::{self, LogTarget, DEFAULT_LOG_LEVEL};
use quiz_runner::{Quiz, QuizError, QuizLibrary, DEFAULT_LIBRARY_DIR};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Append log events to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Directory holding the quiz files
    #[arg(long, global = true, env = "QUIZ_LIBRARY", default_value = DEFAULT_LIBRARY_DIR)]
    library: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a quiz in the terminal
    Play {
        /// Quiz file to load; omit to pick one from the library
        file: Option<PathBuf>,

        /// Disable per-question countdowns
        #[arg(long)]
        no_timer: bool,

        /// Print the final score as JSON after quitting
        #[arg(long)]
        json: bool,
    },
    /// List the quiz files in the library
    List,
    /// Copy a quiz file into the library
    Add {
        /// Quiz file to import
        file: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), QuizError> {
    let target = match (&args.log_file, &args.command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Command::Play { .. }) => LogTarget::Off,
        (None, _) => LogTarget::Stderr,
    };
    logging::init(target, &args.log_level)?;

    let library = QuizLibrary::new(args.library);

    match args.command {
        Command::Play {
            file,
            no_timer,
            json,
        } => {
            let quiz = match file {
                Some(path) => Quiz::from_csv(path)?.library(library),
                None => Quiz::from_library(library),
            };

            let result = quiz.timer(!no_timer).run()?;
            match result {
                Some(score) if json => {
                    let output = serde_json::to_string(&score).map_err(std::io::Error::other)?;
                    println!("{}", output);
                }
                Some(score) => {
                    println!("Final score: {}/{}", score.score, score.total);
                }
                None => {}
            }
        }
        Command::List => {
            let entries = library.list()?;
            if entries.is_empty() {
                println!("No quiz files in {}", library.dir().display());
            }
            for entry in entries {
                println!("{}", entry.name);
            }
        }
        Command::Add { file } => {
            let dest = library.import(&file)?;
            println!("Added {}", dest.display());
        }
    }

    Ok(())
}
