use std::io::Read;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod cli;

use dify_provider_core::{Headers, LanguageModelV3, ModelV3, ProviderV3};
use dify_provider_impl::{DifyChatSettings, DifyProvider, create_dify_provider};

use crate::cli::{Cli, Command};

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("dify-probe failed: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.provider_settings()?;
    info!(?settings, "provider settings resolved");

    // The default provider lives here, not in a global.
    let provider = create_dify_provider(settings);

    match cli.command {
        Command::Headers {
            model_id,
            model_api_key,
        } => print_request(&provider, &model_id, model_api_key),
        Command::Usage { input } => {
            let text = if input.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("read usage from stdin")?;
                buf
            } else {
                std::fs::read_to_string(&input)
                    .with_context(|| format!("read usage {}", input.display()))?
            };
            let value: serde_json::Value =
                serde_json::from_str(&text).context("usage input is not JSON")?;
            // Accept a whole chat response as well as a bare usage block.
            let fragment = value.pointer("/metadata/usage").unwrap_or(&value);
            let model = provider.language_model_default("probe");
            let usage = model.usage_from_raw(fragment);
            println!("{}", serde_json::to_string_pretty(&usage)?);
            Ok(())
        }
    }
}

fn print_request(
    provider: &DifyProvider,
    model_id: &str,
    model_api_key: Option<String>,
) -> anyhow::Result<()> {
    let settings = DifyChatSettings {
        api_key: model_api_key,
    };
    let model = provider.language_model(model_id, settings);
    let request = model.build_request(&serde_json::json!({}), false)?;
    info!(
        provider = model.provider(),
        model_id = model.model_id(),
        version = %model.specification_version(),
        "request built"
    );
    println!("{} {}", request.method.as_str(), request.url);
    for (name, value) in redact(request.headers) {
        println!("{name}: {value}");
    }
    Ok(())
}

fn redact(headers: Headers) -> Headers {
    headers
        .into_iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                (name, "Bearer <redacted>".to_string())
            } else {
                (name, value)
            }
        })
        .collect()
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("dify_probe=info,dify_provider_impl=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
