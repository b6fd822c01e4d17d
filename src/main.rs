// Entrypoint for the CLI application.
// - Keeps `main` small: set up diagnostics, create an API client and
//   hand it to the chat loop.

use makecloud_cli::{api::ApiClient, ui::run_chat};

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never interleave with the chat
    // transcript. Enable with e.g. RUST_LOG=makecloud_cli=debug.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "makecloud_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Backend address comes from `MAKECLOUD_API_URL` or defaults to the
    // local development server. See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    // Start the chat. This call blocks until the conversation is over.
    run_chat(api)?;
    Ok(())
}
