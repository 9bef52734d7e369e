use std::path::PathBuf;

use adsi::{AuthFlags, Credentials};
use clap::{ArgAction, Parser, Subcommand};

/// Browse Active Directory through ADSI.
#[derive(Debug, Parser)]
#[command(name = "adsi", version, about)]
pub struct Cli {
    /// Create the LDAP provider on this machine through DCOM.
    #[arg(long, global = true, env = "ADSI_SERVER")]
    pub server: Option<String>,

    /// Bind as this account instead of the current user.
    #[arg(long, global = true, env = "ADSI_USER")]
    pub user: Option<String>,

    #[arg(long, global = true, env = "ADSI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Bind without ADS_SECURE_AUTHENTICATION.
    #[arg(long, global = true)]
    pub no_secure: bool,

    /// Increase stderr log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write a daily-rotated log file into this directory.
    #[arg(long, global = true, env = "ADSI_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the children of a container.
    Ls {
        /// ADsPath, e.g. LDAP://OU=Staff,DC=example,DC=com
        path: String,
        /// Only show objects of this class (repeatable).
        #[arg(long = "class")]
        classes: Vec<String>,
    },
    /// Walk a container recursively.
    Tree {
        path: String,
        #[arg(long, default_value_t = 2)]
        depth: usize,
        #[arg(long = "class")]
        classes: Vec<String>,
    },
    /// List the members of a group.
    Members { group: String },
    /// Print an object's attributes.
    Show {
        path: String,
        /// Extra property to read (repeatable).
        #[arg(short, long = "property")]
        properties: Vec<String>,
    },
    /// List the installed ADSI providers.
    Namespaces,
}

impl Cli {
    pub fn credentials(&self) -> Credentials {
        let flags = if self.no_secure {
            AuthFlags::NONE
        } else {
            AuthFlags::SECURE
        };
        let credentials = match &self.user {
            Some(user) => Credentials::new(user.as_str(), self.password.clone().unwrap_or_default()),
            None => Credentials::current_user(),
        };
        credentials.with_flags(flags)
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
