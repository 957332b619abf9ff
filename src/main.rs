//! Yoto Creator - 命令行入口
//!
//! 子命令:
//! - publish: 读取清单，生成缺失图片，发布内容（Ctrl-C 在下一步之前取消）
//! - resume:  对已存在的容器从失败步骤续传
//! - get / delete: 查看或删除远端内容
//! - login / logout: 保存或删除 API key

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio_util::sync::CancellationToken;

use yoto_creator::application::{
    Authenticate, AuthenticateHandler, DeleteContent, DeleteContentHandler, ForgetCredential,
    ForgetCredentialHandler, GenerateArtworkHandler, GetContent, GetContentHandler,
    ImageGeneratorPort, ImportTracksHandler, Provider, PublishContent, PublishContentHandler,
    PublishError, RemoteContentPort, ResumePublish, ResumePublishHandler, SecretStorePort,
    UploadOrchestrator,
};
use yoto_creator::config::{load_config, load_config_from_path, print_config, AppConfig};
use yoto_creator::domain::content::{ContainerId, Content, UploadStep};
use yoto_creator::domain::{format_duration, humanize_size};
use yoto_creator::infrastructure::adapters::{
    FakeImageClient, FileAudioSource, FileSecretStore, HttpContentClient,
    HttpContentClientConfig, HttpImageClient, HttpImageClientConfig, RecordingContentClient,
};
use yoto_creator::infrastructure::{assemble, assemble_for_resume, ContentManifest};

const CONFIG_ARG: &str = "config";
const MANIFEST_ARG: &str = "manifest";
const DRY_RUN_ARG: &str = "dry-run";
const CONTAINER_ARG: &str = "container";
const FROM_STEP_ARG: &str = "from";
const PROVIDER_ARG: &str = "provider";
const KEY_ARG: &str = "key";
const NO_REMEMBER_ARG: &str = "no-remember";

/// 运行时依赖
struct Services {
    remote: Arc<dyn RemoteContentPort>,
    generator: Arc<dyn ImageGeneratorPort>,
    secrets: Arc<dyn SecretStorePort>,
    /// 仅 --dry-run 时存在，用于打印记录的调用
    recorder: Option<Arc<RecordingContentClient>>,
}

impl Services {
    fn http(config: &AppConfig, secrets: Arc<dyn SecretStorePort>) -> anyhow::Result<Self> {
        let remote = HttpContentClient::new(
            HttpContentClientConfig::new(&config.remote.base_url)
                .with_timeout(config.remote.timeout_secs),
        )?;
        let generator = HttpImageClient::new(HttpImageClientConfig {
            base_url: config.generation.base_url.clone(),
            model: config.generation.model.clone(),
            quality: config.generation.quality.clone(),
            timeout_secs: config.generation.timeout_secs,
        })?;

        Ok(Self {
            remote: Arc::new(remote),
            generator: Arc::new(generator),
            secrets,
            recorder: None,
        })
    }

    fn dry_run(secrets: Arc<dyn SecretStorePort>) -> Self {
        let recorder = Arc::new(RecordingContentClient::new());
        Self {
            remote: recorder.clone(),
            generator: Arc::new(FakeImageClient::new()),
            secrets,
            recorder: Some(recorder),
        }
    }

    /// 使用配置中的 key（或密钥存储中的 key）认证；已认证时直接返回
    async fn authenticate(&self, config: &AppConfig, provider: Provider) -> anyhow::Result<()> {
        let already = match provider {
            Provider::Content => self.remote.is_authenticated(),
            Provider::Generation => self.generator.is_authenticated(),
        };
        if already {
            return Ok(());
        }

        let api_key = match provider {
            Provider::Content => config.remote.api_key.clone(),
            Provider::Generation => config.generation.api_key.clone(),
        };

        AuthenticateHandler::new(
            self.remote.clone(),
            self.generator.clone(),
            self.secrets.clone(),
        )
        .handle(Authenticate {
            provider,
            api_key,
            remember: false,
        })
        .await?;
        Ok(())
    }
}

fn cli() -> Command {
    let manifest_arg = Arg::new(MANIFEST_ARG)
        .help("Path of the TOML publish manifest")
        .num_args(1)
        .required(true);
    let container_arg = Arg::new(CONTAINER_ARG)
        .help("Remote content id")
        .num_args(1)
        .required(true);
    let provider_arg = Arg::new(PROVIDER_ARG)
        .help("Which service the key belongs to")
        .value_parser(["content", "generation"])
        .required(true);

    Command::new("yoto-creator")
        .about("Assemble audio playlists and publish them to the content service")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg(
            Arg::new(CONFIG_ARG)
                .long(CONFIG_ARG)
                .help("Configuration file (defaults to config.toml / config.local.toml)")
                .num_args(1)
                .global(true),
        )
        .subcommand(
            Command::new("publish")
                .about("Publish the content described by a manifest")
                .arg(manifest_arg.clone())
                .arg(
                    Arg::new(DRY_RUN_ARG)
                        .long(DRY_RUN_ARG)
                        .help("Record the remote calls instead of sending them")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("resume")
                .about("Continue a partially published content from a failed step (artwork for earlier steps is not regenerated)")
                .arg(manifest_arg)
                .arg(
                    Arg::new(CONTAINER_ARG)
                        .long(CONTAINER_ARG)
                        .help("Id of the already created content")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new(FROM_STEP_ARG)
                        .long(FROM_STEP_ARG)
                        .help("Step to start from, e.g. \"chapter 1 track 0\"")
                        .num_args(1)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Show a published content")
                .arg(container_arg.clone()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a published content")
                .arg(container_arg),
        )
        .subcommand(
            Command::new("login")
                .about("Verify an API key and remember it")
                .arg(provider_arg.clone())
                .arg(
                    Arg::new(KEY_ARG)
                        .long(KEY_ARG)
                        .help("API key (defaults to the configured or stored key)")
                        .num_args(1),
                )
                .arg(
                    Arg::new(NO_REMEMBER_ARG)
                        .long(NO_REMEMBER_ARG)
                        .help("Do not store the key")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("logout")
                .about("Forget a stored API key")
                .arg(provider_arg),
        )
}

fn provider_from(matches: &ArgMatches) -> anyhow::Result<Provider> {
    match matches.get_one::<String>(PROVIDER_ARG).map(String::as_str) {
        Some("content") => Ok(Provider::Content),
        Some("generation") => Ok(Provider::Generation),
        other => bail!("Unknown provider: {:?}", other),
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> anyhow::Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing argument: {}", id))
}

/// 在清单基础上组装 Content，需要时先认证生成服务
///
/// 续传时 resume_from 之前的图片已上传，不再生成。
async fn load_content(
    services: &Services,
    config: &AppConfig,
    manifest_path: &Path,
    resume_from: Option<&UploadStep>,
) -> anyhow::Result<Content> {
    let manifest = ContentManifest::load(manifest_path).await?;

    let artwork = if manifest.needs_generation() {
        match services.authenticate(config, Provider::Generation).await {
            Ok(()) => Some(GenerateArtworkHandler::new(services.generator.clone())),
            Err(e) => {
                tracing::warn!(error = %e, "Image generation unavailable, prompts will be skipped");
                None
            }
        }
    } else {
        None
    };

    let import = ImportTracksHandler::new(Arc::new(FileAudioSource::new()));
    let content = match resume_from {
        Some(from) => assemble_for_resume(&manifest, &import, artwork.as_ref(), from).await?,
        None => assemble(&manifest, &import, artwork.as_ref()).await?,
    };

    tracing::info!(
        title = %content.title(),
        chapters = content.chapters().len(),
        tracks = content.track_count(),
        duration = %format_duration(content.total_duration()),
        size = %humanize_size(content.total_size()),
        "Content assembled"
    );

    Ok(content)
}

/// Ctrl-C 触发取消；正在进行的上传会完成，下一步不再开始
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            return;
        }
        tracing::info!("Received Ctrl-C, stopping before the next upload");
        token.cancel();
    });
    cancel
}

fn report_publish_error(error: &PublishError, manifest_path: &Path) {
    match (error.container_id(), error.failed_step()) {
        (Some(container_id), Some(step)) => {
            tracing::error!(container_id = %container_id, step = %step, error = %error, "Publish failed");
            eprintln!(
                "Retry the missing part with:\n  yoto-creator resume {} --container {} --from \"{}\"",
                manifest_path.display(),
                container_id,
                step
            );
        }
        (Some(container_id), None) => {
            tracing::warn!(container_id = %container_id, error = %error, "Publish stopped");
        }
        _ => {
            tracing::error!(error = %error, "Publish failed");
        }
    }
}

async fn run_publish(config: &AppConfig, services: Services, matches: &ArgMatches) -> anyhow::Result<()> {
    let manifest_path = PathBuf::from(required(matches, MANIFEST_ARG)?);
    services.authenticate(config, Provider::Content).await?;

    let content = load_content(&services, config, &manifest_path, None).await?;

    let orchestrator = UploadOrchestrator::new(services.remote.clone(), Arc::new(FileAudioSource::new()))
        .with_language(config.remote.language.as_str());
    let handler = PublishContentHandler::new(Arc::new(orchestrator));

    let result = handler
        .handle(PublishContent {
            content,
            cancel: cancel_on_ctrl_c(),
        })
        .await;

    if let Some(recorder) = &services.recorder {
        for call in recorder.calls() {
            tracing::info!(call = ?call, "Dry run");
        }
    }

    match result {
        Ok(response) => {
            tracing::info!(
                container_id = %response.container_id,
                assets = response.uploaded_assets,
                tracks = response.track_count,
                duration = %response.total_duration,
                size = %response.total_size,
                "Published"
            );
            println!("{}", response.container_id);
            Ok(())
        }
        Err(e) => {
            report_publish_error(&e, &manifest_path);
            Err(e.into())
        }
    }
}

async fn run_resume(config: &AppConfig, services: Services, matches: &ArgMatches) -> anyhow::Result<()> {
    let manifest_path = PathBuf::from(required(matches, MANIFEST_ARG)?);
    let container_id = ContainerId::new(required(matches, CONTAINER_ARG)?);
    let from_step: UploadStep = required(matches, FROM_STEP_ARG)?
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    services.authenticate(config, Provider::Content).await?;
    let content = load_content(&services, config, &manifest_path, Some(&from_step)).await?;

    let orchestrator = UploadOrchestrator::new(services.remote.clone(), Arc::new(FileAudioSource::new()))
        .with_language(config.remote.language.as_str());

    let result = ResumePublishHandler::new(Arc::new(orchestrator))
        .handle(ResumePublish {
            container_id,
            content,
            from_step,
            cancel: cancel_on_ctrl_c(),
        })
        .await;

    match result {
        Ok(response) => {
            println!("{}", response.container_id);
            Ok(())
        }
        Err(e) => {
            report_publish_error(&e, &manifest_path);
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match matches.get_one::<String>(CONFIG_ARG) {
        Some(path) => load_config_from_path(Some(Path::new(path))),
        None => load_config(),
    }
    .map_err(|e| anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},yoto_creator={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    print_config(&config);

    let secrets: Arc<dyn SecretStorePort> = Arc::new(FileSecretStore::new(&config.secrets.path));

    match matches.subcommand() {
        Some(("publish", sub)) => {
            let services = if sub.get_flag(DRY_RUN_ARG) {
                tracing::info!("Dry run: no network calls will be made");
                Services::dry_run(secrets)
            } else {
                Services::http(&config, secrets)?
            };
            run_publish(&config, services, sub).await
        }
        Some(("resume", sub)) => {
            let services = Services::http(&config, secrets)?;
            run_resume(&config, services, sub).await
        }
        Some(("get", sub)) => {
            let services = Services::http(&config, secrets)?;
            services.authenticate(&config, Provider::Content).await?;
            let content = GetContentHandler::new(services.remote.clone())
                .handle(GetContent {
                    container_id: ContainerId::new(required(sub, CONTAINER_ARG)?),
                })
                .await?;
            println!("id:          {}", content.id);
            println!("title:       {}", content.title);
            if let Some(description) = &content.description {
                println!("description: {}", description);
            }
            if let Some(created_at) = content.created_at {
                println!("created:     {}", created_at.to_rfc3339());
            }
            if let Some(updated_at) = content.updated_at {
                println!("updated:     {}", updated_at.to_rfc3339());
            }
            Ok(())
        }
        Some(("delete", sub)) => {
            let services = Services::http(&config, secrets)?;
            services.authenticate(&config, Provider::Content).await?;
            DeleteContentHandler::new(services.remote.clone())
                .handle(DeleteContent {
                    container_id: ContainerId::new(required(sub, CONTAINER_ARG)?),
                })
                .await?;
            Ok(())
        }
        Some(("login", sub)) => {
            let services = Services::http(&config, secrets)?;
            let provider = provider_from(sub)?;
            let response = AuthenticateHandler::new(
                services.remote.clone(),
                services.generator.clone(),
                services.secrets.clone(),
            )
            .handle(Authenticate {
                provider,
                api_key: sub.get_one::<String>(KEY_ARG).cloned(),
                remember: !sub.get_flag(NO_REMEMBER_ARG),
            })
            .await?;
            println!(
                "{} key verified{}",
                response.provider,
                if response.remembered { " and stored" } else { "" }
            );
            Ok(())
        }
        Some(("logout", sub)) => {
            ForgetCredentialHandler::new(secrets)
                .handle(ForgetCredential {
                    provider: provider_from(sub)?,
                })
                .await?;
            Ok(())
        }
        _ => bail!("Unknown command"),
    }
}
