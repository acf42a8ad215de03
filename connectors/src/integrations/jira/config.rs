pub const API_PATH: &str = "/rest/api/3";
pub const DOCS_URL: &str = "https://developer.atlassian.com/cloud/jira/platform/rest/v3/";

/// JQL date-time literal format (`"2026/02/18 09:30"`).
pub const JQL_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// JQL literals are read in the account's profile time zone, which can sit
/// up to 14 hours from UTC. The server-side bound is moved back by this much.
pub const JQL_ZONE_SLACK_HOURS: i64 = 14;
