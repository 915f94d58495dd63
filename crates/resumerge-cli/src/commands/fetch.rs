//! Fetch command - download resumes from shared-drive links.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use futures_util::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use resumerge_core::drive;

use super::config::load_config;
use super::update;

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Share links or file ids
    links: Vec<String>,

    /// Read links from a file, one per line
    #[arg(short, long)]
    from_file: Option<PathBuf>,

    /// Download directory (default from config)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Update the sheet with the downloaded resumes
    #[arg(long)]
    update: bool,
}

pub async fn run(args: FetchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let download_dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.fetch.download_dir.clone());

    let mut links = args.links.clone();
    if let Some(list) = &args.from_file {
        let content = fs::read_to_string(list)?;
        links.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from),
        );
    }

    if links.is_empty() {
        println!("{} No links given.", style("ℹ").blue());
        return Ok(());
    }

    fs::create_dir_all(&download_dir)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch.timeout_secs))
        .build()?;

    println!(
        "{} Downloading {} resumes to {}",
        style("↓").cyan(),
        links.len(),
        download_dir.display()
    );
    println!();

    let multi_progress = MultiProgress::new();
    let mut downloaded = Vec::new();
    let mut failed = Vec::new();

    for link in &links {
        let Some(id) = drive::file_id(link) else {
            warn!("Not a drive link: {}", link);
            failed.push((link.clone(), "not a drive link".to_string()));
            continue;
        };

        let pb = multi_progress.add(ProgressBar::new(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} {msg:<28} [{bar:23.cyan/blue}] {bytes}")?
                .progress_chars("=>-"),
        );
        pb.set_message(id.clone());

        match download_file(&client, &id, &download_dir, &pb).await {
            Ok(path) => {
                pb.finish_with_message(format!("{} {}", style("✓").green(), id));
                downloaded.push(path);
            }
            Err(e) => {
                pb.finish_with_message(format!("{} {} - {}", style("✗").red(), id, e));
                failed.push((link.clone(), e.to_string()));
            }
        }
    }

    println!();
    println!(
        "{} {} downloaded, {} failed",
        style("✓").green(),
        style(downloaded.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed links:").red());
        for (link, reason) in &failed {
            println!("  - {}: {}", link, reason);
        }
    }

    if args.update {
        println!();
        update::apply(&downloaded, &config, false)?;
    }

    Ok(())
}

/// Download one file into `dir`, naming it after the file id and the
/// extension its first bytes suggest.
///
/// Web pages are never saved: the virus-scan warning for large files is
/// confirmed once, any other page fails the link.
async fn download_file(
    client: &reqwest::Client,
    id: &str,
    dir: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<PathBuf> {
    let mut response = send(client, &drive::download_url(id)).await?;

    if is_html_response(&response) {
        let page = response.text().await?;
        let url = drive::confirm_url(id, &page).ok_or_else(|| {
            anyhow::anyhow!("got a web page instead of the file (is it shared?)")
        })?;
        debug!("Confirming download of {}", id);

        response = send(client, &url).await?;
        if is_html_response(&response) {
            anyhow::bail!("got a web page instead of the file after confirmation");
        }
    }

    if let Some(content_length) = response.content_length() {
        pb.set_length(content_length);
    }

    let temp_path = dir.join(format!("{}.tmp", id));
    let (head, downloaded) =
        discard_on_error(&temp_path, stream_to_file(response, &temp_path, pb).await)?;

    if downloaded == 0 {
        fs::remove_file(&temp_path)?;
        anyhow::bail!("empty response");
    }

    let extension = drive::guess_extension(&head);
    if extension == "html" {
        fs::remove_file(&temp_path)?;
        anyhow::bail!("got a web page instead of the file");
    }

    let path = dir.join(format!("{}.{}", id, extension));
    fs::rename(&temp_path, &path)?;
    debug!("Saved {} ({})", path.display(), format_size(downloaded));

    Ok(path)
}

async fn send(client: &reqwest::Client, url: &str) -> anyhow::Result<reqwest::Response> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    Ok(response)
}

fn is_html_response(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html"))
}

/// Stream the body to `path`, returning its first bytes and total size.
async fn stream_to_file(
    response: reqwest::Response,
    path: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<(Vec<u8>, u64)> {
    let mut file = File::create(path)?;

    let mut stream = response.bytes_stream();
    let mut head = Vec::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if head.len() < 512 {
            let take = (512 - head.len()).min(chunk.len());
            head.extend_from_slice(&chunk[..take]);
        }
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    Ok((head, downloaded))
}

/// Remove a partial download when writing it failed.
fn discard_on_error<T>(path: &Path, result: anyhow::Result<T>) -> anyhow::Result<T> {
    if result.is_err() && path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
    result
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_download_is_removed_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let temp_path = dir.path().join("1AbC.tmp");
        fs::write(&temp_path, b"%PDF-1.4 half").unwrap();

        let result: anyhow::Result<()> =
            discard_on_error(&temp_path, Err(anyhow::anyhow!("connection reset")));

        assert_eq!(result.unwrap_err().to_string(), "connection reset");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_completed_download_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let temp_path = dir.path().join("1AbC.tmp");
        fs::write(&temp_path, b"Name: Jane").unwrap();

        let size = discard_on_error(&temp_path, Ok(10u64)).unwrap();

        assert_eq!(size, 10);
        assert!(temp_path.exists());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(2_500), "2.5KB");
        assert_eq!(format_size(3_200_000), "3.2MB");
    }
}
