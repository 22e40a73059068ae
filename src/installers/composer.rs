//! installers::composer
//!
//! Composer, installed the way getcomposer.org documents it: fetch the
//! installer and its published SHA-384 signature, verify, run the installer
//! with PHP, then move `composer.phar` into place as `composer`.
//!
//! The installer is written to a temporary directory that is removed on
//! every exit path, including failures and interrupts.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use sha2::{Digest, Sha384};
use tracing::debug;

use super::InstallError;
use crate::cancel::{CancellationToken, Interrupted};
use crate::context::Context;
use crate::exec::{installed, ShellCommand};

pub const SIGNATURE_URL: &str = "https://composer.github.io/installer.sig";
pub const INSTALLER_URL: &str = "https://getcomposer.org/installer";

const SETUP_FILE: &str = "composer-setup.php";
const PHAR_FILE: &str = "composer.phar";
const CANCEL_POLL: Duration = Duration::from_millis(100);

/// Lower-case hex SHA-384 of `data`.
pub fn sha384_hex(data: &[u8]) -> String {
    hex::encode(Sha384::digest(data))
}

/// Whether `installer` hashes to the published `signature`.
pub fn signature_matches(installer: &[u8], signature: &str) -> bool {
    sha384_hex(installer).eq_ignore_ascii_case(signature.trim())
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, InstallError> {
    let failed = |e: reqwest::Error| InstallError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };
    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(failed)?;
    let body = response.bytes().await.map_err(failed)?;
    Ok(body.to_vec())
}

async fn cancelled(token: &CancellationToken) {
    while !token.is_cancelled() {
        tokio::time::sleep(CANCEL_POLL).await;
    }
}

/// Download the signature and the installer, in that order.
fn download(cancel: &CancellationToken) -> Result<(String, Vec<u8>)> {
    let _hold = cancel.hold();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the download runtime")?;

    let downloads = async {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dotfiles/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InstallError::Download {
                url: SIGNATURE_URL.to_string(),
                message: e.to_string(),
            })?;
        let signature = fetch(&client, SIGNATURE_URL).await?;
        let installer = fetch(&client, INSTALLER_URL).await?;
        Ok::<_, InstallError>((String::from_utf8_lossy(&signature).into_owned(), installer))
    };

    let result = rt.block_on(async {
        tokio::select! {
            biased;
            _ = cancelled(cancel) => None,
            result = downloads => Some(result),
        }
    });

    match result {
        Some(result) => Ok(result?),
        None => Err(Interrupted.into()),
    }
}

/// Install Composer as `<dir>/composer`.
pub fn install(ctx: &Context, dir: &Path) -> Result<()> {
    if !installed(ctx.shell(), "php") {
        bail!(InstallError::PhpMissing);
    }

    ctx.console.info("Downloading the Composer installer...");
    let (signature, installer) = download(&ctx.cancel)?;
    install_verified(ctx, dir, &installer, &signature)
}

/// Verify a downloaded installer against its signature, run it and move the
/// result into `dir`.
pub fn install_verified(ctx: &Context, dir: &Path, installer: &[u8], signature: &str) -> Result<()> {
    if !signature_matches(installer, signature) {
        bail!(InstallError::SignatureMismatch);
    }

    let workdir = tempfile::Builder::new()
        .prefix("composer-setup")
        .tempdir()
        .context("failed to create a temporary directory")?;
    let setup = workdir.path().join(SETUP_FILE);
    fs::write(&setup, installer)
        .with_context(|| format!("failed to write '{}'", setup.display()))?;
    debug!(path = %setup.display(), "wrote composer installer");

    ctx.shell().run(
        &ShellCommand::line(format!("php \"{}\"", setup.display())).current_dir(workdir.path()),
    )?;

    let phar = workdir.path().join(PHAR_FILE);
    let target = dir.join("composer");
    ctx.shell().run(
        &ShellCommand::line(format!("mv \"{}\" \"{}\"", phar.display(), target.display())).root(),
    )?;

    ctx.console.info(format!("Composer installed to {}", target.display()));
    Ok(())
}

/// Remove `<dir>/composer`.
pub fn uninstall(ctx: &Context, dir: &Path) -> Result<()> {
    let target = dir.join("composer");
    if !target.exists() {
        ctx.console.info(format!("Composer is not installed in {}", dir.display()));
        return Ok(());
    }

    ctx.shell()
        .run(&ShellCommand::line(format!("rm \"{}\"", target.display())).root())?;
    ctx.console.info(format!("Removed {}", target.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha384_of_empty_input() {
        assert_eq!(
            sha384_hex(b""),
            "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da274edebfe76f65fbd51ad2f14898b95b"
        );
    }

    #[test]
    fn signature_ignores_case_and_newline() {
        let installer = b"<?php echo 'hi';";
        let signature = format!("{}\n", sha384_hex(installer).to_uppercase());
        assert!(signature_matches(installer, &signature));
        assert!(!signature_matches(b"tampered", &signature));
    }

    #[test]
    fn cancelled_token_interrupts_download() {
        let token = CancellationToken::new();
        token.cancel();
        let err = download(&token).unwrap_err();
        assert!(err.downcast_ref::<Interrupted>().is_some());
        assert!(!token.is_held());
    }
}
