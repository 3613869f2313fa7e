use clap::{Parser, Subcommand};
use huffpack::batch::{self, BatchConfig, Mode};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "huffpack", version, about = "Huffman compress and restore files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress one file
    Encode {
        input: PathBuf,
        #[arg(short, long, default_value = "out.bin")]
        output: PathBuf,
    },
    /// Restore one compressed file
    Decode {
        input: PathBuf,
        #[arg(short, long, default_value = "out.txt")]
        output: PathBuf,
    },
    /// Compress every file under a directory
    BatchEncode {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
    /// Restore every file under a directory
    BatchDecode {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
}

fn run_batch(input: PathBuf, output: PathBuf, mode: Mode, threads: usize) -> ExitCode {
    let config = BatchConfig::new(input, output, mode).with_threads(threads);
    match batch::run_batch(&config) {
        Ok(report) => {
            println!(
                "Processed {}/{} files from {} into {} in {:.2?}",
                report.success,
                report.total,
                report.input.display(),
                report.output.display(),
                report.elapsed
            );
            for failure in &report.errors {
                eprintln!("  {}: {}", failure.path.display(), failure.error);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode { input, output } => match batch::encode_file(&input, &output) {
            Ok(stats) => {
                println!("Original length: {} bytes", stats.original);
                println!("Compressed length (data only): {} bytes", stats.data);
                println!(
                    "Compressed length (with Huffman table): {} bytes",
                    stats.total()
                );
                if let Some(ratio) = stats.compression_ratio() {
                    println!("Compression ratio: {:.2}%", ratio * 100.0);
                }
                println!("Code generation time: {:.2?}", stats.code_gen);
                println!("Write time: {:.2?}", stats.write);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Error: cannot encode {}: {}", input.display(), err);
                ExitCode::FAILURE
            }
        },
        Command::Decode { input, output } => match batch::decode_file(&input, &output) {
            Ok(stats) => {
                println!(
                    "Decoded {} bytes into {} bytes in {:.2?}",
                    stats.original, stats.decoded, stats.elapsed
                );
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Error: cannot decode {}: {}", input.display(), err);
                ExitCode::FAILURE
            }
        },
        Command::BatchEncode {
            input,
            output,
            threads,
        } => run_batch(input, output, Mode::Encode, threads),
        Command::BatchDecode {
            input,
            output,
            threads,
        } => run_batch(input, output, Mode::Decode, threads),
    }
}
