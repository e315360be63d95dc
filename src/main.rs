use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use md2docx::Config;

#[derive(Parser)]
#[command(name = "md2docx")]
#[command(about = "Convert a Markdown file to a Word document")]
struct Cli {
    /// Input Markdown file (defaults to the configured input path)
    input: Option<PathBuf>,

    /// Output .docx file (defaults to the configured output path)
    output: Option<PathBuf>,

    /// Settings file; ignored if it does not exist
    #[arg(short, long, default_value = "md2docx.toml")]
    config: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config);

    let input = cli.input.unwrap_or_else(|| config.paths.input.clone());
    let output = cli.output.unwrap_or_else(|| config.paths.output.clone());

    if let Err(e) = md2docx::convert_file(&input, &output, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!(
        "✅ Successfully converted {} to {}",
        input.display(),
        output.display()
    );
    println!("📄 Word document saved as: {}", output.display());
}
