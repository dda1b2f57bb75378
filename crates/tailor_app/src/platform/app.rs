use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tailor_core::SubmissionOutcome;
use tailor_engine::{ReqwestSubmissionClient, SubmissionController};
use tailor_logging::{tailor_error, tailor_info};

use super::config::{AppConfig, DEFAULT_CONFIG_FILENAME};
use super::form::FormInput;
use super::{logging, ui};

/// Submit a target role and job description to the resume tailor service.
#[derive(Debug, Parser)]
#[command(name = "tailor_app", version)]
struct Cli {
    /// Target job role, e.g. "Software Engineer".
    #[arg(long)]
    role: String,

    /// Job description text.
    #[arg(long, required_unless_present = "description_file", conflicts_with = "description_file")]
    description: Option<String>,

    /// Read the job description from a file (`-` for stdin).
    #[arg(long, value_name = "PATH")]
    description_file: Option<PathBuf>,

    /// RON config file; ignored when missing.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILENAME)]
    config: PathBuf,

    /// Overrides `base_url` from the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Save the generated resume into this directory after a success.
    #[arg(long, value_name = "DIR")]
    download: Option<PathBuf>,
}

/// How a run ended, before it becomes a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Success,
    Failed,
    InvalidInput,
}

impl RunStatus {
    fn from_outcome(outcome: &SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Success { .. } => RunStatus::Success,
            SubmissionOutcome::Failure { .. } | SubmissionOutcome::None => RunStatus::Failed,
        }
    }

    fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failed | RunStatus::InvalidInput => 1,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

pub fn run_app() -> Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(&cli.config)?;
    let from_file = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(base_url) = cli.base_url.clone() {
        config.base_url = base_url;
    }

    logging::initialize(config.log_destination, config.level());
    if from_file {
        tailor_info!("Loaded config from {:?}", cli.config);
    } else {
        tailor_info!("No config at {:?}; using defaults", cli.config);
    }

    let description = read_description(&cli, io::stdin().lock())?;
    let form = match FormInput::validate(&cli.role, &description) {
        Ok(form) => form,
        Err(err) => {
            eprintln!("{err}");
            return Ok(RunStatus::InvalidInput.into());
        }
    };

    let client = Arc::new(ReqwestSubmissionClient::new(config.client_settings())?);
    tailor_info!("Tailor endpoint is {}", client.endpoint());
    let renderer = Arc::new(ui::render::TerminalRenderer::new(&config.base_url));
    let controller = SubmissionController::new(client.clone()).with_sink(renderer);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    let status = runtime.block_on(complete_submission(
        &controller,
        &client,
        form,
        cli.download.as_deref(),
        &mut io::stdout(),
    ));
    Ok(status.into())
}

/// Submits the form and, after a success, optionally saves the document and
/// reports where it went.
async fn complete_submission(
    controller: &SubmissionController,
    client: &ReqwestSubmissionClient,
    form: FormInput,
    download_dir: Option<&Path>,
    out: &mut impl Write,
) -> RunStatus {
    controller.submit(form.role, form.description).await;

    let outcome = controller.outcome();
    let status = RunStatus::from_outcome(&outcome);
    let (Some(download_url), Some(dir)) = (outcome.download_url(), download_dir) else {
        return status;
    };
    match client.download(download_url, dir).await {
        Ok(artifact) => {
            let _ = writeln!(out, "Saved {}", artifact.path.display());
            RunStatus::Success
        }
        Err(err) => {
            tailor_error!("Download of {} failed: {}", download_url, err);
            eprintln!("Download failed: {err}");
            RunStatus::Failed
        }
    }
}

fn read_description(cli: &Cli, mut stdin: impl Read) -> Result<String> {
    if let Some(text) = &cli.description {
        return Ok(text.clone());
    }
    match cli.description_file.as_deref() {
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read job description from stdin")?;
            Ok(text)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read job description from {path:?}")),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use clap::error::ErrorKind;
    use clap::Parser;
    use tailor_core::SubmissionOutcome;
    use tailor_engine::{ClientSettings, ReqwestSubmissionClient, SubmissionController};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{complete_submission, read_description, Cli, RunStatus};
    use crate::platform::form::{FormError, FormInput};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("tailor_app").chain(args.iter().copied()))
    }

    #[test]
    fn description_flags_are_mutually_exclusive() {
        let err = parse(&[
            "--role",
            "Engineer",
            "--description",
            "text",
            "--description-file",
            "jd.txt",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn one_description_source_is_required() {
        let err = parse(&["--role", "Engineer"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn role_is_required() {
        let err = parse(&["--description", "text"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn dash_reads_description_from_stdin() {
        let cli = parse(&["--role", "Engineer", "--description-file", "-"]).unwrap();
        let text = read_description(&cli, Cursor::new("Rust and tokio\n")).unwrap();
        assert_eq!(text, "Rust and tokio\n");
    }

    #[test]
    fn description_file_is_read() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("jd.txt");
        std::fs::write(&file, "Build services").unwrap();
        let cli = parse(&[
            "--role",
            "Engineer",
            "--description-file",
            file.to_str().unwrap(),
        ])
        .unwrap();

        let text = read_description(&cli, Cursor::new("ignored")).unwrap();
        assert_eq!(text, "Build services");
    }

    #[test]
    fn blank_stdin_description_is_invalid_input() {
        let cli = parse(&["--role", "Engineer", "--description-file", "-"]).unwrap();
        let text = read_description(&cli, Cursor::new("  \n")).unwrap();
        assert_eq!(
            FormInput::validate(&cli.role, &text),
            Err(FormError::MissingDescription)
        );
        assert_eq!(RunStatus::InvalidInput.code(), 1);
    }

    #[test]
    fn outcome_maps_to_exit_code() {
        let success = RunStatus::from_outcome(&SubmissionOutcome::success("/api/py/a.pdf"));
        let failure = RunStatus::from_outcome(&SubmissionOutcome::failure("Role is required"));
        assert_eq!((success, success.code()), (RunStatus::Success, 0));
        assert_eq!((failure, failure.code()), (RunStatus::Failed, 1));
        assert_eq!(RunStatus::from_outcome(&SubmissionOutcome::None).code(), 1);
    }

    fn client_for(server: &MockServer) -> Arc<ReqwestSubmissionClient> {
        Arc::new(ReqwestSubmissionClient::new(ClientSettings::with_base_url(server.uri())).unwrap())
    }

    fn form() -> FormInput {
        FormInput::validate("Engineer", "Build services").unwrap()
    }

    async fn mount_tailor_reply(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/api/py/tailor_resume/"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn download_prints_saved_path() {
        let server = MockServer::start().await;
        mount_tailor_reply(
            &server,
            ResponseTemplate::new(200).set_body_raw(
                r#"{"download_link": "/download_resume/resume.pdf"}"#,
                "application/json",
            ),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/api/py/download_resume/resume.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.7", "application/pdf"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let controller = SubmissionController::new(client.clone());
        let temp = TempDir::new().unwrap();
        let mut out = Vec::new();

        let status =
            complete_submission(&controller, &client, form(), Some(temp.path()), &mut out).await;

        let saved = temp.path().join("resume.pdf");
        assert_eq!(status, RunStatus::Success);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Saved {}\n", saved.display())
        );
        assert_eq!(std::fs::read(saved).unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn server_failure_ends_as_failed_without_download() {
        let server = MockServer::start().await;
        mount_tailor_reply(
            &server,
            ResponseTemplate::new(500).set_body_raw("{}", "application/json"),
        )
        .await;

        let client = client_for(&server);
        let controller = SubmissionController::new(client.clone());
        let temp = TempDir::new().unwrap();
        let mut out = Vec::new();

        let status =
            complete_submission(&controller, &client, form(), Some(temp.path()), &mut out).await;

        assert_eq!(status, RunStatus::Failed);
        assert!(out.is_empty());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failed_download_ends_as_failed() {
        let server = MockServer::start().await;
        mount_tailor_reply(
            &server,
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"download_link": "/download_resume/gone.pdf"}"#, "application/json"),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/api/py/download_resume/gone.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"error": "File not found"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let controller = SubmissionController::new(client.clone());
        let temp = TempDir::new().unwrap();
        let mut out = Vec::new();

        let status =
            complete_submission(&controller, &client, form(), Some(temp.path()), &mut out).await;

        assert_eq!(status, RunStatus::Failed);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn success_without_download_dir_is_success() {
        let server = MockServer::start().await;
        mount_tailor_reply(
            &server,
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"download_link": "/x.pdf"}"#, "application/json"),
        )
        .await;

        let client = client_for(&server);
        let controller = SubmissionController::new(client.clone());
        let mut out = Vec::new();

        let status = complete_submission(&controller, &client, form(), None, &mut out).await;

        assert_eq!(status, RunStatus::Success);
        assert_eq!(controller.outcome().download_url(), Some("/api/py/x.pdf"));
    }
}
