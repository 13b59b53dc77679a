use cloudstack_metadata::Error;
use cloudstack_metadata::config::Config;
use cloudstack_metadata::logging::setup_tracing;
use cloudstack_metadata::metadata::MetadataClient;
use cloudstack_metadata::utils::get_version_string;
use std::env;
use tracing::info;

async fn run(args: &[String]) -> Result<String, Error> {
    let config = Config::from_args(args, |key| env::var(key).ok())?;
    info!("fetching metadata from {}", config.endpoint);

    let client = MetadataClient::with_timeout(config.endpoint.clone(), config.timeout)?;
    let record = if config.fields.is_empty() {
        client.fetch_all().await?
    } else {
        client.fetch_batch(&config.fields).await?
    };
    config.format.render(&record)
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.contains(&String::from("--version")) {
        println!("{}", get_version_string());
        return;
    }

    let provider = setup_tracing().unwrap_or_else(|e| {
        eprintln!("failed to set up tracing: {e}");
        None
    });

    let outcome = run(&args).await;
    // Flushes any pending spans
    drop(provider);

    match outcome {
        Ok(rendered) => println!("{}", rendered.trim_end()),
        Err(e) => {
            eprintln!("error occurred: {e}");
            std::process::exit(1);
        }
    }
}
