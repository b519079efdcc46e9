use lambda_runtime::{service_fn, Error, LambdaEvent};
use storage_glue_aws::adapters::s3::S3ObjectStore;
use storage_glue_aws::adapters::sns::SnsNotifier;
use storage_glue_aws::config::NotifierConfig;
use storage_glue_aws::handlers::notifier::handle_storage_event;
use storage_glue_aws::telemetry;
use storage_glue_core::contract::StorageEvent;

struct RuntimeDependencies {
    config: NotifierConfig,
    store: S3ObjectStore,
    notifier: SnsNotifier,
}

async fn handle_request(
    event: LambdaEvent<StorageEvent>,
    deps: &RuntimeDependencies,
) -> Result<Option<String>, Error> {
    handle_storage_event(
        &event.payload,
        &deps.config.destination,
        &deps.store,
        &deps.notifier,
    )
    .await
    .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_lambda("info");

    let config = NotifierConfig::from_env()?;
    let sdk_config = config.aws.load().await;
    let deps = RuntimeDependencies {
        store: S3ObjectStore::new(&sdk_config, &config.aws),
        notifier: SnsNotifier::new(&sdk_config),
        config,
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
