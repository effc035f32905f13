//! Headless Chrome rasterizer
//!
//! Chrome is driven synchronously by `headless_chrome`, so the browser lives on
//! a dedicated worker thread. Async callers send a capture command and await
//! the result on a oneshot channel.

use std::ffi::OsString;
use std::sync::mpsc::{self, Sender};
use std::thread;

use async_trait::async_trait;
use base64::Engine as _;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use tokio::sync::oneshot;

use super::{RasterOptions, Rasterizer};
use crate::{Error, Result};

/// Selector of the element that is captured.
pub const CARD_SELECTOR: &str = "#birthday-card";

enum Command {
    Capture(String, String, oneshot::Sender<Result<Vec<u8>>>),
}

/// Rasterizer backed by a headless Chrome instance.
///
/// Scale and cross-origin policy are fixed at launch; the background color is
/// applied per capture.
pub struct CdpRasterizer {
    cmd_tx: Sender<Command>,
    launch_options: RasterOptions,
}

impl CdpRasterizer {
    /// Launch Chrome on a background thread.
    pub async fn launch(options: RasterOptions) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();
        let worker_options = options.clone();

        thread::spawn(move || {
            let browser = match launch_browser(&worker_options) {
                Ok(b) => b,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Capture(html, background, resp) => {
                        let res = capture(&browser, &html, &background);
                        let _ = resp.send(res);
                    }
                }
            }
            debug!("rasterizer worker shutting down");
        });

        init_rx
            .await
            .map_err(|e| Error::RasterError(format!("Worker init canceled: {}", e)))??;

        Ok(Self {
            cmd_tx,
            launch_options: options,
        })
    }
}

#[async_trait]
impl Rasterizer for CdpRasterizer {
    async fn rasterize(&self, html: &str, options: &RasterOptions) -> Result<Vec<u8>> {
        if options.scale != self.launch_options.scale {
            warn!(
                "Requested scale {} differs from launch scale {}; using launch scale",
                options.scale, self.launch_options.scale
            );
        }

        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Capture(html.to_string(), options.background.clone(), tx))
            .map_err(|_| Error::RasterError("Rasterizer worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::RasterError(format!("Capture canceled: {}", e)))?
    }
}

fn launch_browser(options: &RasterOptions) -> Result<Browser> {
    let scale_arg = OsString::from(format!("--force-device-scale-factor={}", options.scale));
    let cors_arg = OsString::from("--disable-web-security");
    let mut args = vec![scale_arg.as_os_str()];
    if options.allow_cross_origin {
        args.push(cors_arg.as_os_str());
    }

    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some((800, 900)))
        .args(args)
        .build()
        .map_err(|e| Error::RasterError(format!("Failed to build launch options: {}", e)))?;

    Browser::new(launch_options).map_err(|e| Error::RasterError(format!("Failed to launch browser: {}", e)))
}

/// Capture the card in a fresh tab. The tab is closed whether or not the
/// capture succeeds.
fn capture(browser: &Browser, html: &str, background: &str) -> Result<Vec<u8>> {
    let tab = browser
        .new_tab()
        .map_err(|e| Error::RasterError(format!("Failed to create tab: {}", e)))?;

    let res = capture_in_tab(&tab, html, background);
    if let Err(e) = tab.close(true) {
        warn!("Failed to close capture tab: {}", e);
    }
    debug!("capture finished, {} tabs open", open_tab_count(browser));
    res
}

fn capture_in_tab(tab: &Tab, html: &str, background: &str) -> Result<Vec<u8>> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(html);
    let url = format!("data:text/html;base64,{}", encoded);
    tab.navigate_to(&url)
        .map_err(|e| Error::RasterError(format!("Navigation failed: {}", e)))?;
    tab.wait_until_navigated()
        .map_err(|e| Error::RasterError(format!("Wait for navigation failed: {}", e)))?;

    let element = tab
        .wait_for_element(CARD_SELECTOR)
        .map_err(|e| Error::RasterError(format!("Card element not found: {}", e)))?;

    let style = serde_json::to_string(background).unwrap_or_else(|_| "\"#ffffff\"".to_string());
    tab.evaluate(
        &format!("document.getElementById('birthday-card').style.background = {};", style),
        false,
    )
    .map_err(|e| Error::RasterError(format!("Failed to set background: {}", e)))?;

    element
        .capture_screenshot(Page::CaptureScreenshotFormatOption::Png)
        .map_err(|e| Error::RasterError(format!("Screenshot failed: {}", e)))
}

fn open_tab_count(browser: &Browser) -> usize {
    browser.get_tabs().lock().map(|tabs| tabs.len()).unwrap_or_default()
}
