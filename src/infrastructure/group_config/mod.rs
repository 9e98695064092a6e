//! Per-group settings: disabled commands and helper members

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use crate::domain::traits::GroupConfigService;
use crate::infrastructure::config::GroupConfig;

#[derive(Debug, Default, Clone)]
struct GroupSettings {
    disabled_commands: HashSet<String>,
    helpers: HashSet<String>,
}

/// In-memory group settings, seeded from the config file
#[derive(Debug, Default)]
pub struct GroupSettingsStore {
    groups: RwLock<HashMap<String, GroupSettings>>,
}

impl GroupSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(groups: &BTreeMap<String, GroupConfig>) -> Self {
        let groups = groups
            .iter()
            .map(|(id, cfg)| {
                let settings = GroupSettings {
                    disabled_commands: cfg.disabled_commands.iter().cloned().collect(),
                    helpers: cfg.helpers.iter().cloned().collect(),
                };
                (id.clone(), settings)
            })
            .collect();
        Self {
            groups: RwLock::new(groups),
        }
    }

    pub fn disable_command(&self, group_id: &str, command: &str) {
        if let Ok(mut groups) = self.groups.write() {
            groups
                .entry(group_id.to_string())
                .or_default()
                .disabled_commands
                .insert(command.to_string());
        }
    }

    pub fn enable_command(&self, group_id: &str, command: &str) -> bool {
        self.groups
            .write()
            .map(|mut groups| {
                groups
                    .get_mut(group_id)
                    .map_or(false, |g| g.disabled_commands.remove(command))
            })
            .unwrap_or(false)
    }

    pub fn add_helper(&self, group_id: &str, user_id: &str) {
        if let Ok(mut groups) = self.groups.write() {
            groups
                .entry(group_id.to_string())
                .or_default()
                .helpers
                .insert(user_id.to_string());
        }
    }

    /// Helpers may run moderation commands without bot-level permission
    pub fn is_helper(&self, group_id: &str, user_id: &str) -> bool {
        self.groups
            .read()
            .map(|groups| groups.get(group_id).map_or(false, |g| g.helpers.contains(user_id)))
            .unwrap_or(false)
    }
}

impl GroupConfigService for GroupSettingsStore {
    fn is_command_disabled(&self, group_id: &str, command: &str) -> bool {
        self.groups
            .read()
            .map(|groups| {
                groups
                    .get(group_id)
                    .map_or(false, |g| g.disabled_commands.contains(command))
            })
            .unwrap_or(false)
    }
}
