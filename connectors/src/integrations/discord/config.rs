pub const BASE_URL: &str = "https://discord.com/api/v10";
pub const DOCS_URL: &str = "https://discord.com/developers/docs/resources/channel";

/// `GUILD_TEXT` channel type.
pub const TEXT_CHANNEL: u64 = 0;

pub const CHANNEL_TYPES: &[(&str, &str)] = &[("0", "Text"), ("2", "Voice"), ("4", "Category")];
