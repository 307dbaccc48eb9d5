//! semtree - HTML to semantic node tree

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use semtree::{StyleMode, TransformOptions, Transformer, stylesheet};

#[derive(Parser)]
#[command(name = "semtree")]
#[command(version, about = "Transform HTML into a semantic node tree", long_about = None)]
#[command(after_help = "EXAMPLES:
    semtree page.html                   Print the node tree as JSON
    cat page.html | semtree -           Read markup from stdin
    semtree page.html --disable list    Skip list markers
    semtree --stylesheet --prefix app   Print the css-class stylesheet")]
struct Cli {
    /// Input file, or `-` for stdin
    #[arg(value_name = "INPUT", required_unless_present = "stylesheet")]
    input: Option<String>,

    /// Keep markup class attributes
    #[arg(long)]
    keep_class: bool,

    /// Ignore markup style attributes (default tag styles still apply)
    #[arg(long)]
    remove_style: bool,

    /// How default styles are attached: inline or css-class
    #[arg(long, value_name = "MODE", default_value = "inline")]
    style_mode: String,

    /// Prefix for generated class names
    #[arg(long, value_name = "PREFIX", default_value = semtree::engine::DEFAULT_ROOT_CLASS)]
    prefix: String,

    /// Disable a built-in plugin (repeatable)
    #[arg(long, value_name = "NAME")]
    disable: Vec<String>,

    /// Validate the resulting tree
    #[arg(long)]
    validate: bool,

    /// Print the stylesheet for css-class mode instead of transforming
    #[arg(long)]
    stylesheet: bool,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> semtree::Result<()> {
    let mut stdout = io::stdout().lock();

    if cli.stylesheet {
        stdout.write_all(stylesheet::generate(&cli.prefix).as_bytes())?;
        return Ok(());
    }

    let bytes = match cli.input.as_deref() {
        Some("-") | None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
        Some(path) => fs::read(path)?,
    };

    let options = options(cli)?;
    let nodes = Transformer::new().transform_bytes(&bytes, &options)?;

    if cli.compact {
        serde_json::to_writer(&mut stdout, &nodes).map_err(io::Error::from)?;
    } else {
        serde_json::to_writer_pretty(&mut stdout, &nodes).map_err(io::Error::from)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn options(cli: &Cli) -> semtree::Result<TransformOptions> {
    let style_mode: StyleMode = cli.style_mode.parse()?;
    let mut options = TransformOptions::default()
        .with_remove_all_class(!cli.keep_class)
        .with_remove_all_style(cli.remove_style)
        .with_style_mode(style_mode)
        .with_root_class_name(&cli.prefix);
    for name in &cli.disable {
        options = options.with_disabled(name);
    }
    if cli.validate {
        options = options.with_validation();
    }
    Ok(options)
}
