//! php commands - `install php` and `uninstall php`

use std::path::PathBuf;

use anyhow::Result;

use super::{require_supported_os, Command, CommandError};
use crate::cli::arguments::Arguments;
use crate::context::Context;
use crate::core::paths;
use crate::core::version::VersionTuple;
use crate::installers::php::{self, Environment, InstallRequest, VERSIONS};

fn parse_version(command: &str, version: Option<&str>) -> Result<Option<VersionTuple>, CommandError> {
    version
        .map(|v| {
            VersionTuple::parse(v)
                .map_err(|_| CommandError::validation(command, "Invalid php version"))
        })
        .transpose()
}

/// `dotfiles install php`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhpInstall {
    pub version: Option<String>,
    pub env: Option<String>,
    /// `Some("")` installs Composer into the configured directory.
    pub composer: Option<String>,
    completion: bool,
}

impl PhpInstall {
    fn request(&self, ctx: &Context) -> Result<InstallRequest, CommandError> {
        let env = self
            .env
            .as_deref()
            .map(str::parse::<Environment>)
            .transpose()
            .map_err(|_| CommandError::validation(Self::NAME, "Environment not supported"))?;
        let composer_dir = self.composer.as_deref().map(|dir| {
            if dir.is_empty() {
                ctx.config.composer_install_dir()
            } else {
                paths::expand_tilde(dir)
            }
        });

        Ok(InstallRequest {
            version: parse_version(Self::NAME, self.version.as_deref())?,
            env,
            composer_dir,
        })
    }
}

impl Command for PhpInstall {
    const NAME: &'static str = "php";
    const DESCRIPTION: &'static str = "Install php";

    fn from_arguments(arguments: &Arguments) -> Self {
        Self {
            version: arguments.get_str("version").map(str::to_string),
            env: arguments.get_str("env").map(str::to_string),
            composer: arguments.get_str("composer").map(str::to_string),
            completion: false,
        }
    }

    fn completion(&self) -> bool {
        self.completion
    }

    fn set_completion(&mut self, completion: bool) {
        self.completion = completion;
    }

    fn validate(&self, ctx: &Context) -> Result<(), CommandError> {
        require_supported_os(Self::NAME, ctx)?;
        self.request(ctx).map(|_| ())
    }

    fn completion_tokens(&self, ctx: &Context) -> Result<Vec<String>> {
        let builtin: Vec<String> = VERSIONS.iter().map(|v| v.to_string()).collect();
        Ok(php::installable_versions(
            &builtin,
            &ctx.config.php_minimum_version(),
        ))
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        let request = self.request(ctx)?;
        php::install(ctx, &request)
    }
}

/// `dotfiles uninstall php`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhpUninstall {
    pub version: Option<String>,
    pub composer: bool,
    completion: bool,
}

impl Command for PhpUninstall {
    const NAME: &'static str = "php";
    const DESCRIPTION: &'static str = "Uninstall php";

    fn from_arguments(arguments: &Arguments) -> Self {
        Self {
            version: arguments.get_str("version").map(str::to_string),
            composer: arguments.get_bool("composer"),
            completion: false,
        }
    }

    fn completion(&self) -> bool {
        self.completion
    }

    fn set_completion(&mut self, completion: bool) {
        self.completion = completion;
    }

    fn validate(&self, ctx: &Context) -> Result<(), CommandError> {
        require_supported_os(Self::NAME, ctx)?;
        parse_version(Self::NAME, self.version.as_deref()).map(|_| ())
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        let version = parse_version(Self::NAME, self.version.as_deref())?;
        let composer_dir: Option<PathBuf> = self.composer.then(|| ctx.config.composer_install_dir());
        php::uninstall(ctx, version.as_ref(), composer_dir.as_deref())
    }
}
