//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

use super::types::{Res, RoleId, UserId};

/// Default delay between the close acknowledgment and the channel deletion.
fn default_close_delay_secs() -> u64 {
    3
}

/// Default name of the grouping that holds new tickets.
fn default_unclaimed_category() -> String {
    "unclaimed-tickets".to_string()
}

/// Default prefix of the per-claimant grouping.
fn default_claimed_category_prefix() -> String {
    "claimed-".to_string()
}

/// Default `strftime` format for the "time of request" line.
fn default_time_format() -> String {
    "%-m/%-d/%Y, %-I:%M:%S %p".to_string()
}

/// Configuration for the ticket-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Discord bot token (`TICKET_BOT_DISCORD_TOKEN`).
    pub discord_token: String,
    /// Guild the tickets are created in (`TICKET_BOT_GUILD_ID`).
    pub guild_id: u64,
    /// Role allowed to see and handle tickets (`TICKET_BOT_STAFF_ROLE_ID`).
    pub staff_role_id: RoleId,
    /// Admin role, same rights as staff (`TICKET_BOT_ADMIN_ROLE_ID`).
    pub admin_role_id: RoleId,
    /// A single user that is always authorized (`TICKET_BOT_ADMIN_USER_ID`).
    pub admin_user_id: UserId,
    /// Seconds between "closing" and the channel deletion (`TICKET_BOT_CLOSE_DELAY_SECS`).
    #[serde(default = "default_close_delay_secs")]
    pub close_delay_secs: u64,
    /// Name of the grouping that holds new tickets (`TICKET_BOT_UNCLAIMED_CATEGORY`).
    #[serde(default = "default_unclaimed_category")]
    pub unclaimed_category: String,
    /// Prefix of the per-claimant grouping (`TICKET_BOT_CLAIMED_CATEGORY_PREFIX`).
    #[serde(default = "default_claimed_category_prefix")]
    pub claimed_category_prefix: String,
    /// `strftime` format of the request time, rendered in local time (`TICKET_BOT_TIME_FORMAT`).
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl ConfigInner {
    /// A configuration with the given credentials and ids, and defaults for the rest.
    pub fn new(discord_token: impl Into<String>, guild_id: u64, staff_role_id: RoleId, admin_role_id: RoleId, admin_user_id: UserId) -> Self {
        Self {
            discord_token: discord_token.into(),
            guild_id,
            staff_role_id,
            admin_role_id,
            admin_user_id,
            close_delay_secs: default_close_delay_secs(),
            unclaimed_category: default_unclaimed_category(),
            claimed_category_prefix: default_claimed_category_prefix(),
            time_format: default_time_format(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TICKET_BOT").try_parsing(true));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks values the deserializer cannot.
    pub fn validate(&self) -> Res<()> {
        if self.discord_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Discord token must not be empty."));
        }

        if self.guild_id == 0 {
            return Err(anyhow::anyhow!("Guild ID must be set."));
        }

        if self.staff_role_id == 0 || self.admin_role_id == 0 {
            return Err(anyhow::anyhow!("Staff and admin role IDs must be set."));
        }

        if self.close_delay_secs > 300 {
            return Err(anyhow::anyhow!("Close delay must be between 0 and 300 seconds."));
        }

        if self.unclaimed_category.trim().is_empty() {
            return Err(anyhow::anyhow!("Unclaimed category name must not be empty."));
        }

        if StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(anyhow::anyhow!("Time format `{}` is not a valid strftime string.", self.time_format));
        }

        Ok(())
    }

    /// Name of the grouping a claimant's tickets are moved into.
    pub fn claimed_category(&self, claimant_name: &str) -> String {
        format!("{}{}", self.claimed_category_prefix, claimant_name.to_lowercase())
    }
}
