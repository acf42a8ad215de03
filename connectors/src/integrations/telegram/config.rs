/// Bot API root; the bot token is appended as `/bot<token>`.
pub const BASE_URL: &str = "https://api.telegram.org";
pub const DOCS_URL: &str = "https://core.telegram.org/bots/api";

pub const PARSE_MODES: &[(&str, &str)] = &[
    ("MarkdownV2", "Markdown V2"),
    ("HTML", "HTML"),
];
