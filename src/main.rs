use clap::Parser;
use tracing_subscriber::EnvFilter;

use botkit::{
    bot,
    config::{
        cli::{validate_sharding, Args},
        ConfigHandle,
    },
    error::fatal,
    extension::{builtin::CoreExtension, ExtensionRegistry},
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let shards = validate_sharding(args.shard_count, args.min, args.max).unwrap_or_else(|e| fatal(e));
    let config = ConfigHandle::load(&args.config_file).unwrap_or_else(|e| fatal(e));

    let extensions = ExtensionRegistry::new().register(CoreExtension);

    bot::start::run(config, shards, extensions)
        .await
        .unwrap_or_else(|e| fatal(e));
}
