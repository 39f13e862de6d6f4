//! The default provisioning plan.
//!
//! List order is dependency order: the package index is refreshed before any
//! install, zsh is installed before oh-my-zsh, and oh-my-zsh (which replaces
//! `~/.zshrc`) runs before profile lines are appended.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::config::{ProvisionConfig, expand_home};
use crate::domain::step::{Action, Check, Step};

pub const OH_MY_ZSH_INSTALLER: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";
pub const TAILSCALE_INSTALLER: &str = "https://tailscale.com/install.sh";
pub const RUSTUP_INSTALLER: &str = "https://sh.rustup.rs";

/// Stamp written under the home directory after a successful refresh and
/// upgrade. apt's own caches are not reliably rewritten by `apt-get update`.
pub const APT_STAMP: &str = ".cache/pisetup/apt-refreshed";

pub const ZSH_PATH: &str = "/usr/bin/zsh";

/// Names of every step in the default plan, in order.
pub const STEP_NAMES: &[&str] = &[
    "system-update",
    "utilities",
    "zsh",
    "oh-my-zsh",
    "neovim",
    "tailscale",
    "rustup",
    "shell-profile",
    "login-shell",
];

/// Editor configuration written when Neovim is freshly installed.
pub const NVIM_INIT: &str = "\
set number
set relativenumber
set expandtab
set shiftwidth=4
set tabstop=4
set smartindent
set ignorecase
set smartcase
set mouse=a
syntax on
filetype plugin indent on
";

/// The user the plan provisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Login name, as printed by `id -un`.
    pub user: String,
    /// Home directory used to expand `~`.
    pub home: PathBuf,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Build the default plan for `identity`, honoring `config.skip`.
#[must_use]
pub fn default_steps(config: &ProvisionConfig, identity: &Identity) -> Vec<Step> {
    let home: &Path = &identity.home;
    let profile = expand_home(&config.shell_profile, home);
    let nvim_init = home.join(".config").join("nvim").join("init.vim");
    let apt_stamp = home.join(APT_STAMP);

    let steps = vec![
        Step::new(
            "system-update",
            "Refresh the package index and upgrade installed packages",
            Check::FreshWithin {
                path: apt_stamp.clone(),
                max_age: Duration::from_secs(config.apt_max_age_hours.saturating_mul(3600)),
            },
            vec![
                Action::RefreshPackageIndex,
                Action::UpgradePackages,
                Action::WriteFile {
                    path: apt_stamp,
                    contents: "refreshed by pisetup\n".to_string(),
                },
            ],
        ),
        Step::new(
            "utilities",
            "Install utility packages and Python tooling",
            Check::PackagesInstalled(config.packages.clone()),
            vec![Action::InstallPackages(config.packages.clone())],
        ),
        Step::new(
            "zsh",
            "Install the zsh shell",
            Check::ToolOnPath("zsh".to_string()),
            vec![Action::InstallPackages(owned(&["zsh"]))],
        ),
        Step::new(
            "oh-my-zsh",
            "Install the oh-my-zsh shell framework",
            Check::PathExists(home.join(".oh-my-zsh")),
            vec![Action::RunInstaller {
                url: OH_MY_ZSH_INSTALLER.to_string(),
                args: owned(&["--unattended"]),
                elevate: false,
            }],
        ),
        Step::new(
            "neovim",
            "Install Neovim and write its configuration",
            Check::ToolOnPath("nvim".to_string()),
            vec![
                Action::InstallPackages(owned(&["neovim"])),
                Action::WriteFile {
                    path: nvim_init,
                    contents: NVIM_INIT.to_string(),
                },
            ],
        ),
        Step::new(
            "tailscale",
            "Install the Tailscale VPN client",
            Check::ToolOnPath("tailscale".to_string()),
            vec![Action::RunInstaller {
                url: TAILSCALE_INSTALLER.to_string(),
                args: Vec::new(),
                elevate: true,
            }],
        ),
        Step::new(
            "rustup",
            "Install the Rust toolchain via rustup",
            Check::AnyOf(vec![
                Check::ToolOnPath("rustup".to_string()),
                Check::PathExists(home.join(".cargo").join("bin").join("rustup")),
            ]),
            vec![Action::RunInstaller {
                url: RUSTUP_INSTALLER.to_string(),
                args: owned(&["-y", "--no-modify-path"]),
                elevate: false,
            }],
        ),
        Step::new(
            "shell-profile",
            "Append environment and aliases to the shell profile",
            Check::FileContainsLines {
                path: profile.clone(),
                lines: config.profile_lines.clone(),
            },
            vec![Action::AppendLines {
                path: profile,
                lines: config.profile_lines.clone(),
            }],
        ),
        Step::new(
            "login-shell",
            "Make zsh the login shell",
            Check::LoginShell {
                user: identity.user.clone(),
                shell: ZSH_PATH.to_string(),
            },
            vec![Action::Exec {
                program: "chsh".to_string(),
                args: vec!["-s".to_string(), ZSH_PATH.to_string(), identity.user.clone()],
                elevate: true,
            }],
        ),
    ];

    steps
        .into_iter()
        .filter(|s| !config.skip.contains(&s.name))
        .collect()
}
