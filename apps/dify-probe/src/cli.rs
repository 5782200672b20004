use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use dify_provider_core::header_set;
use dify_provider_impl::DifyProviderSettings;

#[derive(Parser)]
#[command(name = "dify-probe", about = "Inspect Dify provider wiring")]
pub(crate) struct Cli {
    /// JSON file with provider settings (`base_url`, `api_key`, `headers`).
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    #[arg(long)]
    pub(crate) api_key: Option<String>,
    /// Extra header as `Name: value`; repeatable.
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub(crate) headers: Vec<String>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the request line and headers a chat model would send.
    Headers {
        model_id: String,
        /// Per-model key, overriding the provider key.
        #[arg(long)]
        model_api_key: Option<String>,
    },
    /// Normalize a Dify usage record read from a file (`-` for stdin).
    Usage { input: PathBuf },
}

impl Cli {
    /// Merge order: CLI > settings file > defaults.
    pub(crate) fn provider_settings(&self) -> anyhow::Result<DifyProviderSettings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read settings {}", path.display()))?;
                serde_json::from_str::<DifyProviderSettings>(&text)
                    .with_context(|| format!("parse settings {}", path.display()))?
            }
            None => DifyProviderSettings::default(),
        };
        if self.base_url.is_some() {
            settings.base_url = self.base_url.clone();
        }
        if self.api_key.is_some() {
            settings.api_key = self.api_key.clone();
        }
        for raw in &self.headers {
            let (name, value) = parse_header(raw)?;
            header_set(&mut settings.headers, name, value);
        }
        Ok(settings)
    }
}

fn parse_header(raw: &str) -> anyhow::Result<(&str, &str)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("header `{raw}` must look like NAME:VALUE");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("header `{raw}` has an empty name");
    }
    Ok((name, value.trim()))
}
