// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dreamshot serve`: run the image proxy until SIGINT/SIGTERM.

use dreamshot_config::model::DreamshotConfig;
use dreamshot_core::DreamshotError;
use tracing::info;

use crate::shutdown::install_signal_handler;

pub async fn run_serve(config: &DreamshotConfig) -> Result<(), DreamshotError> {
    info!(
        name = %config.app.name,
        origin = %config.app.origin,
        "starting image proxy"
    );
    let cancel = install_signal_handler();
    dreamshot_gateway::serve(&config.proxy, cancel).await?;
    info!("dreamshot serve shutdown complete");
    Ok(())
}
