#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;

use anyhow::Context;
use args::{Args, Command, EmbedArgs, PromptArgs};
use clap::Parser;
use conduit_config::{Config, ProviderParams};
use conduit_embeddings::{EmbeddingsClient, EmbeddingsProvider};
use conduit_llm::{PromptRequest, Provider, ProviderAdapter};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    conduit_telemetry::init(config.telemetry.as_ref(), &args.log)?;

    let (name, params) = select_provider(&config, args.provider.as_deref())?;
    tracing::info!(
        config_path = %args.config.display(),
        provider = %name,
        vendor = %params.vendor(),
        "provider selected"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        interrupt_signal().await;
        on_signal.cancel();
    });

    match args.command {
        Command::Prompt(prompt) => run_prompt(prompt, params.clone(), cancel).await,
        Command::Embed(embed) => run_embed(embed, params, &cancel).await,
        Command::Models => run_models(params, &cancel).await,
    }
}

fn select_provider<'a>(config: &'a Config, name: Option<&str>) -> anyhow::Result<(&'a str, &'a ProviderParams)> {
    match name {
        Some(name) => config
            .providers
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .with_context(|| format!("provider '{name}' is not configured")),
        None => config
            .providers
            .first()
            .map(|(k, v)| (k.as_str(), v))
            .context("no providers configured"),
    }
}

async fn run_prompt(args: PromptArgs, params: ProviderParams, cancel: CancellationToken) -> anyhow::Result<()> {
    let adapter = ProviderAdapter::new(params.vendor());

    let mut request = PromptRequest::new(args.model, params)
        .system(args.system)
        .prompt(args.prompt)
        .cancellation(cancel);
    for image in args.images {
        request = request.image(image);
    }
    if args.json {
        request = request.json_valid();
    }
    if args.stream {
        request = request.on_chunk(|chunk| {
            let mut stdout = std::io::stdout().lock();
            // display only, the full reply is returned regardless
            let _ = stdout.write_all(chunk.as_bytes());
            let _ = stdout.flush();
        });
    }

    let result = adapter.prompt(request).await?;

    if args.stream {
        println!();
    } else {
        println!("{}", result.content);
    }

    if let Some(calls) = &result.tool_calls {
        println!("{}", serde_json::to_string_pretty(calls)?);
    }

    if let Some(usage) = result.usage {
        tracing::info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "token usage"
        );
    }

    Ok(())
}

async fn run_embed(args: EmbedArgs, params: &ProviderParams, cancel: &CancellationToken) -> anyhow::Result<()> {
    let client = EmbeddingsClient::default();
    let result = client
        .embeddings_get(&args.inputs, &args.model, cancel, params)
        .await?;

    for (input, embedding) in args.inputs.iter().zip(&result.results) {
        println!("{:>6}  {input}", embedding.embedding.len());
    }

    Ok(())
}

async fn run_models(params: &ProviderParams, cancel: &CancellationToken) -> anyhow::Result<()> {
    let adapter = ProviderAdapter::new(params.vendor());
    let models = adapter.list_models(params, cancel).await?;

    for model in models {
        let context = model.context_length.map_or_else(|| "-".to_owned(), |n| n.to_string());
        let mut flags = Vec::new();
        if model.supports_tools {
            flags.push("tools");
        }
        if model.supports_vision {
            flags.push("vision");
        }
        if model.supports_json_output {
            flags.push("json");
        }
        println!("{:<48} {context:>9}  {}", model.id, flags.join(","));
    }

    Ok(())
}

/// Wait for `SIGINT` or `SIGTERM`
async fn interrupt_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("interrupt received, cancelling");
}
