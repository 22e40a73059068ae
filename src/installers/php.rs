//! installers::php
//!
//! PHP from the Ondřej Surý repositories: the `ondrej/php` PPA on Ubuntu,
//! `packages.sury.org` on Debian and Raspbian.
//!
//! # Package sets
//!
//! Every install is `php<version>` plus one `php<version>-<ext>` package per
//! extension of the chosen [`Environment`]. The server set is a superset of
//! the desktop set.
//!
//! # Example
//!
//! ```
//! use dotfiles::installers::php::{packages, Environment};
//!
//! let pkgs = packages("8.3", Environment::Desktop);
//! assert_eq!(pkgs[0], "php8.3");
//! assert!(pkgs.contains(&"php8.3-intl".to_string()));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use tracing::debug;

use super::{composer, is_supported, InstallError};
use crate::context::Context;
use crate::core::version::VersionTuple;
use crate::exec::{ExecError, ShellCommand};
use crate::ui::output::format_list;

/// Versions offered when the package index cannot be asked.
pub const VERSIONS: [&str; 12] = [
    "5.4", "5.5", "5.6", "7.0", "7.1", "7.2", "7.3", "7.4", "8.0", "8.1", "8.2", "8.3",
];

pub const DESKTOP_EXTENSIONS: [&str; 10] = [
    "bcmath", "cli", "common", "curl", "intl", "mbstring", "opcache", "readline", "xml", "zip",
];

/// Installed on servers in addition to [`DESKTOP_EXTENSIONS`].
pub const SERVER_EXTENSIONS: [&str; 8] = [
    "fpm", "gd", "igbinary", "memcached", "mysql", "pgsql", "redis", "sqlite3",
];

const SURY_LIST: &str = "/etc/apt/sources.list.d/sury-php.list";
const SURY_KEY_URL: &str = "https://packages.sury.org/php/apt.gpg";
const SURY_KEYRING: &str = "/etc/apt/trusted.gpg.d/php.gpg";

/// Which package set to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Desktop,
    Server,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Desktop, Environment::Server];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Desktop => "desktop",
            Environment::Server => "server",
        }
    }

    pub fn extensions(self) -> Vec<&'static str> {
        match self {
            Environment::Desktop => DESKTOP_EXTENSIONS.to_vec(),
            Environment::Server => DESKTOP_EXTENSIONS
                .iter()
                .chain(SERVER_EXTENSIONS.iter())
                .copied()
                .collect(),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| format!("unknown environment '{s}'"))
    }
}

/// The packages making up one PHP install.
pub fn packages(version: &str, env: Environment) -> Vec<String> {
    std::iter::once(format!("php{version}"))
        .chain(env.extensions().into_iter().map(|ext| format!("php{version}-{ext}")))
        .collect()
}

/// Versions strictly newer than `minimum`; unparsable entries are dropped.
pub fn installable_versions(available: &[String], minimum: &VersionTuple) -> Vec<String> {
    available
        .iter()
        .filter(|v| {
            VersionTuple::parse(v)
                .map(|t| t.greater_than(minimum))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// The distinct `X.Y` versions found in installed package names, in order.
pub fn uninstallable_versions(packages: &[String]) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();
    for package in packages {
        if let Some(version) = version_in_package(package) {
            if !versions.contains(&version) {
                versions.push(version);
            }
        }
    }
    versions
}

/// `8.1` from `php8.1-intl`; `None` for `php-common`.
fn version_in_package(package: &str) -> Option<String> {
    let rest = &package[package.find("php")? + 3..];
    let mut chars = rest.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(major), Some('.'), Some(minor)) if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Some(format!("{major}.{minor}"))
        }
        _ => None,
    }
}

/// Where the PHP repository is configured, per distribution.
fn source_list(ctx: &Context) -> Option<(PathBuf, &'static str)> {
    match ctx.os.id().as_str() {
        "debian" | "raspbian" => Some((PathBuf::from(SURY_LIST), "sury")),
        "ubuntu" => Some((
            PathBuf::from(format!(
                "/etc/apt/sources.list.d/ondrej-ubuntu-php-{}.list",
                ctx.os.codename()
            )),
            "ondrej",
        )),
        _ => None,
    }
}

/// Whether apt already knows the PHP repository.
pub fn sources_installed(ctx: &Context) -> bool {
    let Some((list, vendor)) = source_list(ctx) else {
        return false;
    };
    if list.exists() {
        return true;
    }

    let line = format!(
        "find /etc/apt/ -name '*.list' | xargs cat | grep '^[[:space:]]*deb' | grep '{vendor}' | grep 'php'"
    );
    ctx.shell()
        .run(&ShellCommand::line(line).unchecked().suppress_output())
        .map(|out| out.success())
        .unwrap_or(false)
}

/// Add the PHP repository and its signing key.
pub fn install_sources(ctx: &Context) -> Result<()> {
    let shell = ctx.shell();
    match ctx.os.id().as_str() {
        "debian" | "raspbian" => {
            shell.run(
                &ShellCommand::line("apt install -y")
                    .args([
                        "apt-transport-https",
                        "ca-certificates",
                        "software-properties-common",
                        "lsb-release",
                        "gnupg2",
                    ])
                    .root(),
            )?;
            shell.run(&ShellCommand::line(format!("wget -O {SURY_KEYRING} {SURY_KEY_URL}")).root())?;
            shell.run(&ShellCommand::line(format!(
                "echo \"deb https://packages.sury.org/php/ $(lsb_release -sc) main\" | sudo tee \"{SURY_LIST}\""
            )))?;
        }
        "ubuntu" => {
            shell.run(
                &ShellCommand::line("apt install -y")
                    .args(["software-properties-common", "lsb-release"])
                    .root(),
            )?;
            shell.run(&ShellCommand::line("add-apt-repository ppa:ondrej/php -y").root())?;
        }
        _ => bail!(InstallError::UnsupportedOs),
    }
    Ok(())
}

/// Versions the package index offers, or the built-in list.
pub fn available_versions(ctx: &Context) -> Result<Vec<String>> {
    let builtin = || VERSIONS.iter().map(|v| v.to_string()).collect::<Vec<_>>();
    if !sources_installed(ctx) {
        return Ok(builtin());
    }

    let line = r"apt-cache search php | grep -oP '^php[0-9]?[0-9]\.[0-9]' | awk -F'php' '{print $2}' | sort -u";
    match ctx.shell().run(&ShellCommand::line(line).capture()) {
        Ok(out) => {
            let versions: Vec<String> = out
                .output
                .lines()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            Ok(if versions.is_empty() { builtin() } else { versions })
        }
        Err(ExecError::Interrupted(e)) => Err(e.into()),
        Err(e) => {
            debug!(error = %e, "apt-cache search failed, using built-in versions");
            Ok(builtin())
        }
    }
}

/// Installed PHP packages, optionally only those of one version.
pub fn installed_packages(ctx: &Context, version: Option<&str>) -> Result<Vec<String>> {
    let pattern = version.unwrap_or("*");
    let line = format!(
        r"dpkg -l | grep -E '^[a-zA-Z]*\s*php{pattern}' | sed 's/^[a-zA-Z]*\s*//' | sed 's/\s\{{3,\}}.*$//' | tr '\n' ' '"
    );
    let out = ctx.shell().run(&ShellCommand::line(line).capture())?;
    Ok(out.output.split_whitespace().map(str::to_string).collect())
}

fn show_packages(ctx: &Context, heading: &str, packages: &[String]) {
    ctx.console.blank();
    ctx.console.info(heading);
    ctx.console.info(format_list(packages, "  "));
    ctx.console.blank();
}

/// What `install php` was asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallRequest {
    pub version: Option<VersionTuple>,
    pub env: Option<Environment>,
    /// Also install Composer into this directory.
    pub composer_dir: Option<PathBuf>,
}

pub fn install(ctx: &Context, request: &InstallRequest) -> Result<()> {
    if !is_supported(&ctx.os) {
        bail!(InstallError::UnsupportedOs);
    }

    let available = available_versions(ctx)?;
    let installable = installable_versions(&available, &ctx.config.php_minimum_version());
    let matching = |wanted: &VersionTuple| {
        installable
            .iter()
            .position(|v| VersionTuple::parse(v).ok().as_ref() == Some(wanted))
    };

    let index = match request.version.as_ref().and_then(matching) {
        Some(index) => Some(index),
        None => ctx.prompter().choice(
            "Which version would you like to install?",
            &installable,
            matching(&ctx.config.php_current_version()),
        )?,
    };
    let version = index
        .and_then(|i| installable.get(i))
        .ok_or_else(|| anyhow!("Invalid php version"))?
        .clone();

    let env = match request.env {
        Some(env) => env,
        None => {
            let options: Vec<String> = Environment::ALL.iter().map(|e| e.to_string()).collect();
            let default = options.iter().position(|e| e == ctx.config.php_default_env());
            ctx.prompter()
                .choice("What kind of environment is this for?", &options, default)?
                .and_then(|i| Environment::ALL.get(i).copied())
                .ok_or_else(|| anyhow!("Environment not supported"))?
        }
    };

    let packages = packages(&version, env);
    show_packages(ctx, "Packages to be installed:", &packages);

    if !ctx.prompter().confirm("Proceed?")? {
        ctx.console.info("Exiting...");
        ctx.console.blank();
        return Ok(());
    }

    if !sources_installed(ctx) {
        install_sources(ctx)?;
    }
    ctx.shell().run(&ShellCommand::line("apt update").root())?;
    ctx.shell()
        .run(&ShellCommand::line("apt install -y").args(packages).root())?;
    ctx.console.blank();

    if let Some(dir) = &request.composer_dir {
        composer::install(ctx, dir)?;
    }
    Ok(())
}

/// Remove one installed PHP version, optionally Composer from `composer_dir`.
pub fn uninstall(ctx: &Context, version: Option<&VersionTuple>, composer_dir: Option<&Path>) -> Result<()> {
    if !is_supported(&ctx.os) {
        bail!(InstallError::UnsupportedOs);
    }

    let versions = uninstallable_versions(&installed_packages(ctx, None)?);
    if versions.is_empty() {
        ctx.console.blank();
        ctx.console.info("No php packages found");
        ctx.console.blank();
        return remove_composer(ctx, composer_dir);
    }

    let requested = version.and_then(|wanted| {
        versions
            .iter()
            .position(|v| VersionTuple::parse(v).ok().as_ref() == Some(wanted))
    });
    let index = match requested {
        Some(index) => Some(index),
        None => ctx
            .prompter()
            .choice("Which version would you like to uninstall?", &versions, Some(0))?,
    };
    let version = index
        .and_then(|i| versions.get(i))
        .ok_or_else(|| anyhow!("Invalid php version"))?
        .clone();

    let packages = installed_packages(ctx, Some(&version))?;
    if packages.is_empty() {
        ctx.console.blank();
        ctx.console.info(format!("No packages found for php{version}"));
        ctx.console.blank();
        return remove_composer(ctx, composer_dir);
    }

    show_packages(ctx, "Packages to be uninstalled:", &packages);

    if !ctx.prompter().confirm("Proceed?")? {
        ctx.console.info("Exiting...");
        ctx.console.blank();
        return Ok(());
    }

    ctx.shell()
        .run(&ShellCommand::line("apt purge -y").args(packages).root())?;
    ctx.shell()
        .run(&ShellCommand::line("apt autoremove -y").root())?;
    ctx.console.blank();

    remove_composer(ctx, composer_dir)
}

fn remove_composer(ctx: &Context, composer_dir: Option<&Path>) -> Result<()> {
    match composer_dir {
        Some(dir) => composer::uninstall(ctx, dir),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn server_is_desktop_plus_server_extensions() {
        let server = Environment::Server.extensions();
        assert_eq!(server.len(), DESKTOP_EXTENSIONS.len() + SERVER_EXTENSIONS.len());
        assert_eq!(&server[..DESKTOP_EXTENSIONS.len()], &DESKTOP_EXTENSIONS[..]);
    }

    #[test]
    fn packages_are_prefixed_with_version() {
        let pkgs = packages("8.2", Environment::Server);
        assert_eq!(pkgs[0], "php8.2");
        assert!(pkgs.contains(&"php8.2-fpm".to_string()));
        assert!(pkgs[1..].iter().all(|p| p.starts_with("php8.2-")));
    }

    #[test]
    fn environment_parses() {
        assert_eq!("server".parse::<Environment>(), Ok(Environment::Server));
        assert!("laptop".parse::<Environment>().is_err());
    }

    #[test]
    fn installable_is_strictly_above_minimum() {
        let available = strings(&["7.3", "7.4", "8.0", "8.3", "junk"]);
        let installable = installable_versions(&available, &VersionTuple::new(7, 4, 0));
        assert_eq!(installable, strings(&["8.0", "8.3"]));
    }

    #[test]
    fn uninstallable_versions_are_unique() {
        let installed = strings(&["php-common", "php8.1", "php8.1-cli", "php8.3-intl", "php8.1-xml"]);
        assert_eq!(uninstallable_versions(&installed), strings(&["8.1", "8.3"]));
    }

    #[test]
    fn version_needs_digit_dot_digit() {
        assert_eq!(version_in_package("php7.4-fpm"), Some("7.4".into()));
        assert_eq!(version_in_package("php-pear"), None);
        assert_eq!(version_in_package("libapache2-mod-php8.2"), Some("8.2".into()));
        assert_eq!(version_in_package("nginx"), None);
    }
}
