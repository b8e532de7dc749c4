//! Command line interface of mdocx.

use std::{
    io::{Read, Write},
    path::PathBuf,
    process::exit,
};

use clap::Parser;
use mdocx::{output_file_name, ConvertConfig, Converter, Error, ErrorKind, Result};

/// Converts a markdown file into a styled DOCX document.
#[derive(Debug, Clone, Parser)]
#[clap(name = "mdocx", version)]
pub struct ConvertArgs {
    /// Path to the markdown input, or `-` to read stdin
    #[clap(value_name = "INPUT")]
    pub input: String,

    /// Path to output file, or `-` to write stdout
    #[clap(value_name = "OUTPUT", default_value = None)]
    pub output: Option<String>,

    /// Reads conversion options from a TOML file
    #[clap(long, value_name = "CONFIG_PATH", env = "MDOCX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides a single option, e.g. `--set font_size=14`
    #[clap(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = ConvertArgs::parse();
    if let Err(err) = run(args) {
        match err.kind() {
            ErrorKind::EmptyInput => eprintln!("内容不能为空"),
            _ => eprintln!("error: {err}"),
        }
        exit(1);
    }
}

fn run(args: ConvertArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .map_err(|err| Error::config(format!("cannot read {path:?}: {err}")))?;
            ConvertConfig::from_toml_str(&source)?
        }
        None => ConvertConfig::default(),
    };
    for item in &args.overrides {
        let Some((key, value)) = item.split_once('=') else {
            return Err(Error::config(format!("expected KEY=VALUE, found `{item}`")));
        };
        config.set(key.trim(), value);
    }

    let markdown = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.input)?
    };

    let bytes = Converter::new(config).convert(&markdown)?;

    match args.output.as_deref() {
        Some("-") => std::io::stdout().write_all(&bytes)?,
        output => {
            let path = output
                .map(PathBuf::from)
                .unwrap_or_else(|| output_file_name(chrono::Local::now().naive_local()).into());
            std::fs::write(&path, &bytes)?;
            log::info!("wrote {} bytes to {}", bytes.len(), path.display());
        }
    }
    Ok(())
}
