use clap::Parser;

use crate::avatar::{AvatarSize, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Print a GitHub user's received events with inline avatars.
#[derive(Debug, Clone, Parser)]
#[command(name = "ghfeed", version)]
pub struct Options {
    /// GitHub login whose received events are shown (falls back to GHFEED_USER)
    pub user: Option<String>,

    /// Number of feed pages to fetch
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,

    /// Only print events whose text matches this wildcard pattern
    #[arg(short, long)]
    pub include: Option<String>,

    /// Skip events whose text matches this wildcard pattern
    #[arg(short, long)]
    pub exclude: Option<String>,

    /// Avatar display width
    #[arg(long, default_value = DEFAULT_WIDTH)]
    pub width: String,

    /// Avatar display height
    #[arg(long, default_value = DEFAULT_HEIGHT)]
    pub height: String,

    /// Avatar size as `W,H`, overrides --width and --height
    #[arg(short, long)]
    pub size: Option<String>,
}

impl Options {
    pub fn avatar_size(&self) -> AvatarSize {
        let size = AvatarSize::new(&self.width, &self.height);
        match &self.size {
            Some(combined) => size.with_size(combined),
            None => size,
        }
    }
}
