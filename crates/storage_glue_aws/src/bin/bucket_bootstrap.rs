use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use storage_glue_aws::adapters::s3::S3ObjectStore;
use storage_glue_aws::config::{AwsSettings, ConfigError, CredentialSource};
use storage_glue_aws::handlers::bootstrap::{run_bootstrap, BootstrapConfig};
use storage_glue_aws::telemetry;
use storage_glue_core::storage_keys::KeyStrategy;

#[derive(Parser)]
#[command(
    name = "bucket_bootstrap",
    about = "Create a bucket if missing, upload a sample object, and list the bucket"
)]
struct Cli {
    /// Bucket to create, upload into, and list
    #[arg(long, env = "SAMPLE_BUCKET")]
    bucket: String,

    /// Region for the storage client; falls back to the SDK's region chain
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Access key id for explicit credentials (overrides the profile)
    #[arg(long, env = "GLUE_ACCESS_KEY_ID")]
    access_key: Option<String>,

    /// Secret access key paired with --access-key
    #[arg(long, env = "GLUE_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Session token for temporary credentials
    #[arg(long, env = "GLUE_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    /// Custom S3 endpoint, e.g. a local S3-compatible server
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, env = "S3_FORCE_PATH_STYLE")]
    path_style: bool,

    /// How the sample object key is generated (timestamp or uuid)
    #[arg(long, default_value_t = KeyStrategy::Timestamp)]
    key_strategy: KeyStrategy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GLUE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn aws_settings(&self) -> Result<AwsSettings, ConfigError> {
        Ok(AwsSettings {
            region: self.region.clone(),
            credentials: CredentialSource::resolve(
                self.access_key.clone(),
                self.secret_key.clone(),
                self.session_token.clone(),
                self.profile.clone(),
            )?,
            endpoint_url: self.endpoint_url.clone(),
            force_path_style: self.path_style,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    telemetry::init_cli(&cli.log_level);

    let settings = cli
        .aws_settings()
        .context("invalid AWS client settings")?;
    let sdk_config = settings.load().await;
    let store = S3ObjectStore::new(&sdk_config, &settings);
    let config = BootstrapConfig {
        bucket: cli.bucket,
        key_strategy: cli.key_strategy,
    };

    let mut stdout = std::io::stdout().lock();
    run_bootstrap(
        &store,
        &config,
        Utc::now(),
        &mut rand::thread_rng(),
        &mut stdout,
    )
    .await
    .with_context(|| format!("bucket bootstrap failed for '{}'", config.bucket))?;

    Ok(())
}
