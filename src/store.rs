use std::collections::HashSet;
use std::fs;

/// Durable set of comment ids the bot has already replied to. Loaded once at
/// startup, flushed once at shutdown; there is no concurrent access.
pub struct SeenStore;

impl SeenStore {
    /// A missing or corrupt file is treated as "nothing seen yet" rather than
    /// an error, so a fresh deployment starts clean.
    pub fn load(path: &str) -> HashSet<String> {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(ids) => ids.into_iter().collect(),
                Err(_) => HashSet::new(),
            },
            Err(_) => HashSet::new(),
        }
    }

    /// Overwrites the file wholesale. Failures propagate: losing the seen-set
    /// means duplicate replies on the next restart, and the operator should
    /// know about that.
    pub fn save(seen: &HashSet<String>, path: &str) -> Result<(), anyhow::Error> {
        let ids: Vec<&String> = seen.iter().collect();
        let data = serde_json::to_string(&ids)?;
        fs::write(path, data)?;
        Ok(())
    }
}
