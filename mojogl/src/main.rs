////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! `mojogl`: generates Mojo OpenGL bindings from the Khronos `gl.xml` registry.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use mojogl_generator::{generate, Api, ErrorKind, FormatOptions, FunctionStyle, Profile, Registry, Request};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod download;

use crate::download::DownloadError;

#[derive(Parser, Debug)]
#[command(name = "mojogl")]
#[command(about = "Generate Mojo OpenGL bindings from the Khronos gl.xml registry")]
#[command(disable_version_flag = true)]
struct Args {
    /// Target OpenGL version
    #[arg(long = "version", value_name = "X.Y", default_value = "4.6")]
    gl_version: String,

    /// Target profile (core or compatibility)
    #[arg(long, default_value = "core")]
    profile: Profile,

    /// Registry api to generate for
    #[arg(long, default_value = "gl")]
    api: Api,

    /// Extension to include, may be repeated
    #[arg(long = "extension", value_name = "NAME")]
    extensions: Vec<String>,

    /// Output directory for the generated package
    #[arg(long, value_name = "DIR", default_value = "mojo/mojogl")]
    output_dir: PathBuf,

    /// Path to gl.xml
    #[arg(long, visible_alias = "gl-xml", value_name = "PATH", default_value = "gl.xml")]
    input_path: PathBuf,

    /// Download the latest gl.xml from the Khronos registry
    #[arg(long)]
    download: bool,

    /// Download even if the input file already exists
    #[arg(long)]
    force: bool,

    /// global-symbols or namespaced-struct
    #[arg(long, value_name = "STYLE", default_value = "global-symbols")]
    function_style: FunctionStyle,

    /// Leave out the descriptive comment block in generated files
    #[arg(long)]
    no_header_comment: bool,

    /// Fail instead of writing output when warnings are produced
    #[arg(long)]
    deny_warnings: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn request(&self) -> Request {
        Request {
            version: self.gl_version.clone(),
            profile: self.profile,
            extensions: self.extensions.iter().cloned().collect(),
            format: FormatOptions {
                function_style: self.function_style,
                header_comment: !self.no_header_comment,
            },
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Generate(#[from] mojogl_generator::Error),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("{0} warning(s) produced and --deny-warnings is set")]
    WarningsDenied(usize),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Generate(e) => match e.kind() {
                ErrorKind::RegistryParse => 3,
                ErrorKind::SchemaIntegrity => 4,
                ErrorKind::UnknownVersion => 5,
                ErrorKind::UnknownExtension => 6,
                ErrorKind::Io => 7,
            },
            CliError::Download(_) => 8,
            CliError::WarningsDenied(_) => 9,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("MOJOGL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    // also installs the bridge for the library's `log` records
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    if args.download || !args.input_path.exists() {
        download::fetch_registry(&args.input_path, args.force)?;
    }

    let request = args.request();
    info!(
        "generating {} {} {} bindings from {}",
        args.api,
        request.version,
        request.profile,
        args.input_path.display()
    );

    let registry = Registry::from_path(&args.input_path, args.api)?;
    let bindings = generate(&registry, &request)?;

    if !bindings.warnings.is_empty() {
        if args.deny_warnings {
            return Err(CliError::WarningsDenied(bindings.warnings.len()));
        }
        warn!("{} warning(s), see above", bindings.warnings.len());
    }

    bindings.write_to(&args.output_dir)?;

    info!(
        "generated bindings for {} functions and {} constants",
        bindings.command_count, bindings.enum_count
    );
    info!(output = %args.output_dir.display(), "output written");

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        },
    }
}
