use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use zxml::{Error, FormatConfig, Result, XmlParser};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input XML file; reads stdin when omitted
    file: Option<PathBuf>,

    /// Indent nested elements by this many spaces
    #[arg(short, long)]
    indent: Option<usize>,

    /// Emit an <?xml ...?> declaration before the root element
    #[arg(short, long)]
    declaration: bool,

    /// Print the structured value of the tree instead of XML
    #[arg(long)]
    value: bool,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let parser = XmlParser::new();

    let element = match &args.file {
        Some(path) => {
            info!("Reading file: {}", path.display());
            parser.from_file(path)?
        }
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| Error::io(e.to_string()).with_context("stdin"))?;
            parser.from_string(&input)?
        }
    };

    let output = if args.value {
        format!("{:#?}", element.to_value(true))
    } else {
        let mut config = FormatConfig::default();
        if let Some(spaces) = args.indent {
            config = config.with_indent(spaces);
        }
        config.declaration = args.declaration;
        element.to_string_with(&config)
    };

    match args.output {
        Some(path) => fs::write(&path, output)
            .map_err(|e| Error::io(e.to_string()).with_context(path.display().to_string()))?,
        None => println!("{}", output.trim_end()),
    }

    Ok(())
}
