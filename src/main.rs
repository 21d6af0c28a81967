//! Host-side helper: builds the WASM package into the site directory, serves
//! it over HTTP, and (if requested) exposes it through ngrok.

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::{Path, PathBuf};
    use std::process::{Child, Command, Stdio};

    use anyhow::{bail, Context, Result};
    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    #[derive(Debug, Parser)]
    #[command(name = "parallax-dev", about = "Build and serve the parallax landing page locally")]
    struct Args {
        /// Port for the local HTTP server.
        #[arg(long, env = "PARALLAX_PORT", default_value_t = 8000)]
        port: u16,

        /// Directory served as the site root; the wasm package lands in `<site>/pkg`.
        #[arg(long, default_value = "static")]
        site: PathBuf,

        /// Serve whatever is already built instead of running wasm-pack.
        #[arg(long)]
        skip_build: bool,

        /// Start an ngrok tunnel to the local server.
        #[arg(long)]
        tunnel: bool,
    }

    pub fn run() -> Result<()> {
        initialise_tracing();
        let args = Args::parse();

        if args.skip_build {
            tracing::info!("skipping wasm build (--skip-build)");
        } else {
            build_package(&args.site)?;
        }

        let mut server = serve(&args.site, args.port)?;
        tracing::info!(port = args.port, "serving at http://127.0.0.1:{}", args.port);

        let _tunnel = if args.tunnel {
            start_tunnel(args.port)
        } else {
            None
        };

        let status = server.wait().context("http server terminated abnormally")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }

    fn initialise_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    fn build_package(site: &Path) -> Result<()> {
        let out_dir = site.join("pkg");
        tracing::info!(out = %out_dir.display(), "building wasm package");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir"])
            .arg(&out_dir)
            .status()
            .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
        if !status.success() {
            bail!("wasm-pack finished with {status}");
        }
        Ok(())
    }

    fn serve(site: &Path, port: u16) -> Result<Child> {
        let port = port.to_string();
        Command::new("python3")
            .args(["-m", "http.server", port.as_str(), "--directory"])
            .arg(site)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start python3 http.server")
    }

    fn start_tunnel(port: u16) -> Option<Child> {
        let port = port.to_string();
        match Command::new("ngrok")
            .args(["http", port.as_str()])
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => {
                tracing::info!("ngrok tunnel starting");
                Some(child)
            }
            Err(err) => {
                tracing::warn!(%err, "ngrok not available; install it to expose the site");
                None
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
