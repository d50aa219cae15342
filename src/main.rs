//! go-annotation: describe `@`-annotated Go declarations for code generators.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `go-annotation < service.go`
//! - **file mode**: `go-annotation -o gen -p prefix.tpl internal/service`

mod render;

use anyhow::{Context, Result};
use clap::Parser;
use go_annotation::config::Config;
use go_annotation::{
    source, AnnotationMode, FileDescription, GoModuleResolver, ModuleResolver, NoModule,
};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "go-annotation",
    version,
    about = "Extract @annotations from Go doc comments into a description tree"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted (and no
    /// servicePath is configured), reads Go source from stdin.
    files: Vec<String>,

    /// YAML config with servicePath, genFilePath and templateFile
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output directory; descriptions go to stdout when unset
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Prefix template file prepended to every output file.
    /// Supports ${name} and ${package} substitution.
    #[arg(short = 'p', long)]
    prefix: Option<PathBuf>,

    /// Output format: json (default) or markdown
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Annotation dialect [default: array]
    #[arg(short = 'm', long, value_enum)]
    mode: Option<AnnotationMode>,

    /// Warn about and skip files that fail to parse instead of stopping
    #[arg(long)]
    keep_going: bool,

    /// Do not ask the go toolchain for the module path
    #[arg(long)]
    no_module: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Settings after merging the config file under the command line.
struct Settings {
    inputs: Vec<String>,
    output: Option<PathBuf>,
    prefix: Option<PathBuf>,
    mode: AnnotationMode,
}

impl Settings {
    fn resolve(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let inputs = if cli.files.is_empty() {
            config.source_path.into_iter().collect()
        } else {
            cli.files.clone()
        };
        Ok(Self {
            inputs,
            output: cli.output.clone().or(config.gen_file_path),
            prefix: cli.prefix.clone().or(config.template_file),
            mode: cli.mode.or(config.annotation_mode).unwrap_or_default(),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let settings = Settings::resolve(&cli)?;
    let renderer = render::create_renderer(&cli.format)?;

    if settings.inputs.is_empty() {
        return stdin_mode(&settings, renderer.as_ref());
    }

    file_mode(&cli, &settings, renderer.as_ref())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init()
        .context("failed to initialize logging")
}

/// stdin mode: read one Go file from stdin, write its description to stdout.
fn stdin_mode(settings: &Settings, renderer: &dyn render::Renderer) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let desc = go_annotation::parse_source(&input, "<stdin>", settings.mode)
        .context("failed to parse stdin")?;
    match desc {
        Some(desc) => print!("{}", renderer.render(&desc)?),
        None => info!("nothing to describe in stdin"),
    }
    Ok(())
}

/// file mode: describe every input file, one output per described file.
fn file_mode(cli: &Cli, settings: &Settings, renderer: &dyn render::Renderer) -> Result<()> {
    let input_files = source::find_sources(&settings.inputs)?;
    debug!(files = input_files.len(), mode = %settings.mode, "collected sources");

    let resolver: Box<dyn ModuleResolver> = if cli.no_module {
        Box::new(NoModule)
    } else {
        Box::new(GoModuleResolver::new())
    };

    let mut sources = Vec::new();
    let mut descriptions = Vec::new();
    let mut skipped = 0usize;
    for path in &input_files {
        match go_annotation::parse_file(path, settings.mode, resolver.as_ref()) {
            Ok(Some(desc)) => {
                sources.push(path.as_path());
                descriptions.push(desc);
            }
            Ok(None) => {}
            Err(err) if cli.keep_going => {
                warn!("skipping {}: {err}", path.display());
                skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    if skipped > 0 {
        info!(skipped, "some files failed to parse");
    }

    let Some(output_dir) = settings.output.as_deref() else {
        print!("{}", renderer.render_all(&descriptions)?);
        return Ok(());
    };

    let prefix_template = match &settings.prefix {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read prefix file: {}", path.display()))?,
        ),
        None => None,
    };

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let ext = renderer.file_extension();
    let stems = source::output_stems(&sources);
    for ((desc, path), stem) in descriptions.iter().zip(&sources).zip(stems) {
        let name = source::output_name(path);
        // Dotted stems such as `api.pb` keep their full name.
        let mut file = stem.into_os_string();
        file.push(".");
        file.push(ext);
        let out_path = output_dir.join(file);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }

        let mut output = String::new();
        if let Some(ref tpl) = prefix_template {
            output.push_str(&expand_prefix(tpl, &name, desc));
            output.push('\n');
        }
        output.push_str(&renderer.render(desc)?);

        fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        debug!(path = %out_path.display(), "wrote description");
    }

    Ok(())
}

fn expand_prefix(template: &str, name: &str, desc: &FileDescription) -> String {
    template
        .replace("${name}", name)
        .replace("${package}", &desc.declared_namespace)
}
