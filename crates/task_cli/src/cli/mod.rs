use clap::{Parser, Subcommand};
use task_core::config::{
    Config, ConfigOverrides, Palette, load_config_with_fallback, merge_overrides,
    palette_for_theme,
};
use task_core::{AppError, OwnerId, StatusFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for the task board", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the task API
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// User id sent to the API
    #[arg(long, value_name = "ID", global = true)]
    pub user: Option<String>,

    /// Colour theme (default, noir, solarized)
    #[arg(long, global = true)]
    pub theme: Option<String>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: task_cli add "Buy milk" -d "two liters"
    Add {
        title: Option<String>,
        #[arg(short = 'd', long)]
        description: Option<String>,
    },
    /// List tasks, newest first
    ///
    /// Example: task_cli list --filter active
    List {
        #[arg(long, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
    },
    /// Flip a task between active and completed
    ///
    /// Example: task_cli toggle 1
    Toggle { task: String },
    /// Edit a task's title or description
    ///
    /// Example: task_cli edit 1 --title "Buy oat milk"
    /// Example: task_cli edit 1 --description ""
    Edit {
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short = 'd', long)]
        description: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: task_cli delete 1
    Delete { task: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub user: OwnerId,
    pub palette: Palette,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self, AppError> {
        let loaded = load_config_with_fallback();
        if let Some(err) = loaded.error {
            tracing::warn!("ignoring configuration file: {err}");
        }
        let overrides = ConfigOverrides::parse_all(&cli.config_override)?;
        let config = merge_overrides(&loaded.config.with_env(), &overrides);
        Self::from_config(cli, &config)
    }

    fn from_config(cli: &Cli, config: &Config) -> Result<Self, AppError> {
        let api_url = cli
            .api_url
            .clone()
            .unwrap_or_else(|| config.api_url().to_string());
        let user = cli
            .user
            .as_deref()
            .or(config.user.as_deref())
            .ok_or_else(|| {
                AppError::validation("user is required (pass --user or set TASKBOARD_USER)")
            })
            .and_then(OwnerId::parse)?;
        let theme = cli.theme.as_deref().or(config.theme.as_deref());

        Ok(Self {
            api_url,
            user,
            palette: palette_for_theme(theme),
        })
    }
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

/// Splits a REPL line into arguments. Double quotes group words and `\"`
/// escapes a quote inside them.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::validation("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
