//! # Generate Command Implementation
//!
//! `kosko generate` runs the whole pipeline for the working directory:
//!
//! 1. Read `kosko.toml` and combine it with the selected environment.
//! 2. Run the `require` entries, configured ones first, then `--require`.
//! 3. Generate manifests from `components/`.
//! 4. Print them to stdout as YAML or JSON.
//!
//! Components given on the command line replace the configured ones.

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::{Args, ValueEnum};

use kosko::config;
use kosko::defaults;
use kosko::environment::Environment;
use kosko::generate::{generate_blocking, GenerateOptions, GenerateResult};
use kosko::loader::{CommandLoader, Runtime};
use kosko::preload::preload;
use kosko::print::{print, PrintFormat};

/// Arguments shared by every command that generates manifests.
#[derive(Args, Debug, Clone, Default)]
pub struct ComponentArgs {
    /// Components to generate (overrides `components` in kosko.toml)
    #[arg(value_name = "COMPONENT")]
    pub components: Vec<String>,

    /// Environment to generate for
    #[arg(short, long, value_name = "NAME")]
    pub env: Option<String>,

    /// Commands to run before loading components (repeatable)
    #[arg(short, long, value_name = "ID")]
    pub require: Vec<String>,
}

/// Output formats
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl From<OutputFormat> for PrintFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => PrintFormat::Yaml,
            OutputFormat::Json => PrintFormat::Json,
        }
    }
}

/// Generate manifests and print them
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub components: ComponentArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Run each manifest's validation before printing
    #[arg(long)]
    pub validate: bool,
}

/// Execute the `generate` command.
pub fn execute(args: GenerateArgs, cwd: &Path) -> Result<()> {
    let result = run(&args.components, cwd, args.validate)?;
    let mut stdout = io::stdout().lock();
    print(&result, args.output.into(), &mut stdout)?;
    Ok(())
}

/// Configure and run the pipeline for `cwd`.
pub fn run(args: &ComponentArgs, cwd: &Path, validate: bool) -> Result<GenerateResult> {
    let config = config::load(cwd)?;
    let effective = config.for_environment(args.env.as_deref());

    let components = if args.components.is_empty() {
        effective.components
    } else {
        args.components.clone()
    };
    let mut require = effective.require;
    require.extend(args.require.iter().cloned());

    let env = Environment::new(cwd)
        .with_name(args.env.clone())
        .with_paths(config.paths.environment.clone());

    let commands = CommandLoader::default();
    preload(&require, &env, &commands)?;

    let options = GenerateOptions {
        components,
        path: cwd.join(defaults::COMPONENTS_DIR),
        extensions: effective.extensions,
        validate,
    };
    let runtime = Runtime::builtin_with(commands);
    Ok(generate_blocking(&options, &runtime, &env)?)
}
