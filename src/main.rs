use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arelle_client::config::{load_config, Overrides, Settings, SettingsBuilder};
use arelle_client::http::{Flavor, HttpValidationRequest, Media, ValidationQuery, ValidationTarget};
use arelle_client::output::{
    print_http_result, print_process_summary, save_response, save_transcript,
};
use arelle_client::telemetry::init_tracing;
use arelle_client::ExternalValidatorClient;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "arelle-client",
    version,
    about = "Run Arelle XBRL validations as a local process or through its REST service",
    disable_help_subcommand = true
)]
struct Cli {
    /// Validation service host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Validation service port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Select a profile from arelle-client.json
    #[arg(short = 'P', long, global = true)]
    profile: Option<String>,

    /// Directory or file containing arelle-client.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Env file whose entries are passed to the validator process
    #[arg(short, long, global = true)]
    env: Option<PathBuf>,

    /// Directory to store response bodies and run transcripts
    #[arg(long = "output", short = 'O', global = true)]
    output: Option<PathBuf>,

    /// Print only the first N bytes of a response body
    #[arg(short, long, global = true)]
    preview: Option<usize>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document by launching the Arelle command line
    Run {
        /// Instance, inline XBRL document or package to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Validator executable (defaults to arelleCmdLine on PATH)
        #[arg(long)]
        exe: Option<PathBuf>,
        /// Directory exported to the validator as XDG_CONFIG_HOME
        #[arg(long)]
        config_home: Option<PathBuf>,
        /// Plugins to load, separated by '|'
        #[arg(long, value_delimiter = '|')]
        plugins: Vec<String>,
        /// Extra arguments passed to the validator after `--`
        #[arg(last = true)]
        extra: Vec<String>,
    },
    /// Upload a zip archive to the validation service
    Post {
        /// Zip archive to upload
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
        /// Instance id used in the URL (defaults to the archive name)
        #[arg(long)]
        instance: Option<String>,
        /// Files to import into the DTS
        #[arg(long)]
        import: Vec<String>,
        #[arg(long, default_value = "text")]
        media: Media,
        /// Extra valueless query parameters
        #[arg(long = "flag")]
        flags: Vec<String>,
        /// Content type sent with the archive
        #[arg(long, default_value = "application/zip")]
        content_type: String,
    },
    /// Validate a document the service can reach by path or URL
    Get {
        #[arg(value_name = "INSTANCE_PATH")]
        instance: String,
        #[arg(long, default_value = "text")]
        media: Media,
        #[arg(long)]
        flavor: Option<Flavor>,
        /// Extra valueless query parameters
        #[arg(long = "flag")]
        flags: Vec<String>,
        /// Send the path as `?file=` instead of embedding it in the URL
        #[arg(long)]
        file_param: bool,
    },
    /// Check that the validation service is up
    About,
    /// Shut down the validation service
    Stop,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(
        cli.log_json,
        if cli.verbose { Level::DEBUG } else { Level::WARN },
    );

    let base_dir = std::env::current_dir()?;
    let config_target = cli
        .config
        .as_ref()
        .map(|p| resolve_relative(&base_dir, p))
        .unwrap_or_else(|| base_dir.clone());
    let cfg = load_config(&config_target).context("loading configuration")?;
    let config_dir = cfg.as_ref().map(|c| c.dir.clone()).unwrap_or_else(|| base_dir.clone());

    let mut overrides = Overrides {
        profile: cli.profile.clone(),
        host: cli.host.clone(),
        port: cli.port,
        env_file: cli.env.as_ref().map(|p| resolve_relative(&config_dir, p)),
        output_dir: cli.output.as_ref().map(|p| resolve_relative(&base_dir, p)),
        ..Overrides::default()
    };
    if let Commands::Run {
        exe,
        config_home,
        plugins,
        ..
    } = &cli.command
    {
        overrides.executable = exe.clone();
        overrides.config_home = config_home.clone();
        overrides.plugins = plugins.clone();
    }

    let settings = SettingsBuilder::new(base_dir, cfg, overrides).build()?;
    let client = ExternalValidatorClient::new(settings.endpoint.clone())?;

    match &cli.command {
        Commands::Run { file, extra, .. } => {
            let code = run_validation(&client, &settings, file, extra)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Post {
            archive,
            instance,
            import,
            media,
            flags,
            content_type,
        } => {
            let instance_id = match instance {
                Some(id) => id.clone(),
                None => archive
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .with_context(|| format!("{} has no file name", archive.display()))?,
            };
            let mut query = ValidationQuery::new(*media).flag("formulaAsserResultCounts");
            for file in import {
                query = query.import(file.clone());
            }
            for flag in flags {
                query = query.flag(flag.clone());
            }
            let url = client
                .endpoint()
                .validation_url(&ValidationTarget::Path(instance_id.clone()), &query)?;
            let request = HttpValidationRequest::post_file(url.as_str(), archive)?
                .with_content_type(content_type.as_str());
            let result = client.post_validation(&request)?;
            let saved = save_if_requested(&settings, &instance_id, |dir, label| {
                save_response(dir, label, &result)
            })?;
            print_http_result("POST", url.as_str(), &result, cli.preview, saved.as_deref());
        }
        Commands::Get {
            instance,
            media,
            flavor,
            flags,
            file_param,
        } => {
            let target = if *file_param {
                ValidationTarget::FileParam(instance.clone())
            } else {
                ValidationTarget::Path(instance.clone())
            };
            let mut query = ValidationQuery::new(*media);
            if let Some(flavor) = flavor {
                query = query.flavor(*flavor);
            }
            for flag in flags {
                query = query.flag(flag.clone());
            }
            let url = client.endpoint().validation_url(&target, &query)?;
            let result = client.get_validation(url.as_str())?;
            let saved = save_if_requested(&settings, instance, |dir, label| {
                save_response(dir, label, &result)
            })?;
            print_http_result("GET", url.as_str(), &result, cli.preview, saved.as_deref());
        }
        Commands::About => {
            let url = client.endpoint().about_url()?;
            let result = client.about()?;
            print_http_result("GET", url.as_str(), &result, cli.preview, None);
        }
        Commands::Stop => {
            let url = client.endpoint().stop_url()?;
            let result = client.stop_service()?;
            print_http_result("GET", url.as_str(), &result, cli.preview, None);
        }
    }

    Ok(())
}

fn run_validation(
    client: &ExternalValidatorClient,
    settings: &Settings,
    file: &Path,
    extra: &[String],
) -> Result<i32> {
    let request = settings.invocation().validate_file(file).args(extra);
    let result = client
        .stream_process(&request, |line| println!("{line}"))
        .with_context(|| format!("validating {}", file.display()))?;

    let label = file.to_string_lossy();
    let saved = save_if_requested(settings, &label, |dir, label| {
        save_transcript(dir, label, &result)
    })?;
    print_process_summary(&request.display_command(), result.exit_code, saved.as_deref());
    Ok(result.exit_code)
}

fn save_if_requested<F>(settings: &Settings, label: &str, save: F) -> Result<Option<PathBuf>>
where
    F: FnOnce(&Path, &str) -> Result<PathBuf>,
{
    settings
        .output_dir
        .as_deref()
        .map(|dir| save(dir, label))
        .transpose()
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_relative_joins_when_needed() {
        let base = Path::new("/tmp/base");
        let relative = Path::new("filings/report.xbrl");
        assert_eq!(resolve_relative(base, relative), base.join(relative));

        let absolute = Path::new("/var/data/report.xbrl");
        assert_eq!(resolve_relative(base, absolute), absolute);
    }

    #[test]
    fn run_accepts_trailing_arguments() {
        let cli = Cli::try_parse_from([
            "arelle-client",
            "run",
            "report.xbrl",
            "--plugins",
            "EdgarRenderer|xule",
            "--",
            "--disclosureSystem",
            "efm-pragmatic",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { plugins, extra, .. } => {
                assert_eq!(plugins, vec!["EdgarRenderer", "xule"]);
                assert_eq!(extra, vec!["--disclosureSystem", "efm-pragmatic"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn get_parses_media_and_flavor() {
        let cli = Cli::try_parse_from([
            "arelle-client",
            "--port",
            "8090",
            "get",
            "c:/filings/report.xbrl",
            "--media",
            "xml",
            "--flavor",
            "sec",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(8090));
        match cli.command {
            Commands::Get { media, flavor, .. } => {
                assert_eq!(media, Media::Xml);
                assert_eq!(flavor, Some(Flavor::Sec));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn post_accepts_content_type_and_stop_parses() {
        let cli = Cli::try_parse_from([
            "arelle-client",
            "post",
            "filing.zip",
            "--content-type",
            "application/x-zip-compressed",
        ])
        .unwrap();
        match cli.command {
            Commands::Post { content_type, .. } => {
                assert_eq!(content_type, "application/x-zip-compressed");
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["arelle-client", "stop"]).unwrap();
        assert!(matches!(cli.command, Commands::Stop));
    }
}
