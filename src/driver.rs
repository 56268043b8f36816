use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{debug, info};

/// Manages the chromedriver process backing a browser session.
///
/// Owned by the session factory; the child process is killed when the
/// manager is dropped.
pub struct DriverManager {
    process: Mutex<Option<DriverProcess>>,
}

struct DriverProcess {
    child: Child,
    port: u16,
    url: String,
}

impl Default for DriverManager {
    fn default() -> Self {
        Self {
            process: Mutex::new(None),
        }
    }
}

impl DriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure chromedriver is running and return the URL to connect to.
    ///
    /// Prefers a driver this manager already started, then an externally
    /// managed one on the standard port, and finally starts a fresh one.
    pub async fn ensure_driver(&self) -> Result<String> {
        let managed_url = {
            let process = self.process.lock().unwrap();
            process.as_ref().map(|p| p.url.clone())
        };

        if let Some(url) = managed_url {
            if Self::is_driver_running(&url).await {
                debug!("Using existing managed chromedriver at {}", url);
                return Ok(url);
            }
        }

        let standard_url = "http://localhost:9515";
        if Self::is_driver_running(standard_url).await {
            debug!("Found external chromedriver at {}", standard_url);
            return Ok(standard_url.to_string());
        }

        info!("chromedriver not detected, attempting to start automatically...");
        self.start_driver().await
    }

    async fn start_driver(&self) -> Result<String> {
        if !Self::command_exists("chromedriver") {
            anyhow::bail!(
                "chromedriver not found in PATH. Please install it:\n\
                  macOS: brew install chromedriver\n\
                  Linux: Download from https://googlechromelabs.github.io/chrome-for-testing/"
            );
        }

        let port = Self::find_free_port()?;
        info!("Starting chromedriver on port {}", port);

        let child = Command::new("chromedriver")
            .arg(format!("--port={}", port))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to start chromedriver")?;

        let url = format!("http://localhost:{}", port);
        {
            let mut process = self.process.lock().unwrap();
            *process = Some(DriverProcess {
                child,
                port,
                url: url.clone(),
            });
        }

        // Wait for the driver to come up (3 seconds total)
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            if Self::is_driver_running(&url).await {
                info!("chromedriver started successfully on port {}", port);
                return Ok(url);
            }
            if attempt < max_attempts {
                sleep(Duration::from_millis(100)).await;
            }
        }

        self.stop_all();
        anyhow::bail!("chromedriver failed to start within timeout")
    }

    /// Check if a command exists in PATH
    fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        {
            Command::new("which")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }

        #[cfg(windows)]
        {
            Command::new("where")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }
    }

    fn find_free_port() -> Result<u16> {
        // Standard chromedriver ports first
        for port in [9515u16, 9516, 9517] {
            if std::net::TcpListener::bind(("127.0.0.1", port)).is_ok() {
                debug!("Found free port {}", port);
                return Ok(port);
            }
        }

        // Fall back to letting the OS assign one
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(port)
    }

    /// Check if a WebDriver is responding at the given URL
    pub async fn is_driver_running(url: &str) -> bool {
        let status_url = format!("{}/status", url);

        match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Stop the managed chromedriver process, if any.
    pub fn stop_all(&self) {
        let mut process = self.process.lock().unwrap();
        if let Some(mut p) = process.take() {
            debug!("Stopping chromedriver on port {}", p.port);
            let _ = p.child.kill();
            let _ = p.child.wait();
        }
    }
}

impl Drop for DriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}
