use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    /// Fixed administrator set; always privileged
    pub admins: Vec<i64>,
    /// Chats the engine moderates; events elsewhere are ignored
    pub chats: Vec<i64>,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable not set")?;

        let admins = env::var("ADMIN_IDS")
            .map_err(|_| "ADMIN_IDS environment variable not set")
            .and_then(|raw| parse_id_list(&raw))?;

        let chats = env::var("CHAT_IDS")
            .map_err(|_| "CHAT_IDS environment variable not set")
            .and_then(|raw| parse_id_list(&raw))?;

        Ok(Self {
            database_url,
            admins,
            chats,
        })
    }
}

/// Parse a comma-separated list of numeric ids
fn parse_id_list(raw: &str) -> Result<Vec<i64>, &'static str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().map_err(|_| "id lists must be comma-separated integers"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list(" 42 , -7 ").unwrap(), vec![42, -7]);
        assert_eq!(parse_id_list("").unwrap(), Vec::<i64>::new());
        assert!(parse_id_list("1,abc").is_err());
    }
}
