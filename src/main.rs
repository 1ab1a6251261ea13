use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = shipbot::Config::parse();
    shipbot::tracing::Config::from_env()?
        .with_verbose(config.verbose)
        .install()?;

    let res = match config.build() {
        Ok(app) => app.run().await.map(|_| ()),
        Err(err) => Err(err),
    };

    Ok(match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err.display_chain(), details = ?err, "release failed");
            ExitCode::FAILURE
        }
    })
}
