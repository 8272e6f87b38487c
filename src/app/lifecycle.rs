//! Process lifecycle: wiring the tasks together, the boot banner and the
//! graceful shutdown on SIGINT/SIGTERM.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::app::config::Config;
use crate::app::mpd::{MpdQuery, Subscription};
use crate::app::now_playing::{NowPlaying, report_errors};
use crate::display::{CharacterDisplay, DisplayController, TerminalDisplay};
use crate::text::center;

/// Run until a termination signal arrives.
///
/// Only a display that fails to initialize ends the process with an error.
pub async fn run(config: Config) -> color_eyre::Result<()> {
    let width = config.display.width;
    let messages = &config.messages;

    let (controller, worker) = start_display(TerminalDisplay::new(width), &config).await?;

    let subscription =
        Subscription::start(config.mpd.address.clone(), config.mpd.reconnect_delay());
    let pipeline = NowPlaying::new(
        controller.clone(),
        MpdQuery::new(config.mpd.address.clone()),
        width,
        &messages.error_title,
    );
    let pipeline = tokio::spawn(pipeline.run(subscription.events));
    let reporter = tokio::spawn(report_errors(
        controller.clone(),
        subscription.errors,
        messages.error_title.clone(),
        width,
    ));

    if let Err(e) = wait_for_shutdown_signal().await {
        log::error!("Failed to listen for termination signals: {}", e);
    }

    // Stopping the watcher closes the event source the pipeline reads from.
    subscription.task.abort();
    pipeline.abort();
    reporter.abort();

    shut_down(
        &controller,
        &messages.farewell,
        width,
        config.display.farewell_hold(),
    )
    .await;

    drop(controller);
    if let Err(e) = worker.await {
        log::warn!("Display worker ended abnormally: {}", e);
    }

    Ok(())
}

/// Spawn the display worker for `device`, initialize it, then show the boot
/// banner and, after `boot_hold_ms`, the greeting.
///
/// A display that fails to initialize is released before the error is
/// returned.
pub async fn start_display<D: CharacterDisplay>(
    device: D,
    config: &Config,
) -> color_eyre::Result<(DisplayController, JoinHandle<()>)> {
    let width = config.display.width;
    let messages = &config.messages;

    let (controller, worker) = DisplayController::spawn(device, config.display.frame_delay());

    if let Err(e) = controller.initialize().await {
        log::error!("Display initialization failed: {}", e);
        drop(controller);
        let _ = worker.await;
        return Err(color_eyre::eyre::eyre!("Display initialization failed: {}", e));
    }
    log::info!("Display initialized, {} characters per line", width);

    match controller
        .write_lines(
            center(&messages.boot_line1, width),
            center(&messages.boot_line2, width),
        )
        .await
    {
        Ok(()) => tokio::time::sleep(config.display.boot_hold()).await,
        Err(e) => log::warn!("Could not show boot banner: {}", e),
    }

    if let Err(e) = controller
        .write_lines(center(&messages.greeting, width), "")
        .await
    {
        log::warn!("Could not show greeting: {}", e);
    }

    Ok((controller, worker))
}

/// Queue the farewell behind anything still drawing, leave it up for
/// `hold`, then clear and close the display.
pub async fn shut_down(controller: &DisplayController, farewell: &str, width: usize, hold: Duration) {
    match controller.write_lines(center(farewell, width), "").await {
        Ok(()) => tokio::time::sleep(hold).await,
        Err(e) => log::warn!("Could not show farewell: {}", e),
    }

    if let Err(e) = controller.clear().await {
        log::warn!("Could not clear display: {}", e);
    }
    if let Err(e) = controller.close().await {
        log::warn!("Could not close display: {}", e);
    }
}

async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => log::info!("Received SIGINT, shutting down gracefully"),
            _ = sigterm.recv() => log::info!("Received SIGTERM, shutting down gracefully"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        log::info!("Received Ctrl-C, shutting down gracefully");
    }

    Ok(())
}
