/// Name fragments that keep a directory from being deleted.
pub const DEFAULT_PROTECTED: [&str; 3] = ["chocolatey", "system", "windows"];

#[derive(Debug, Clone)]
pub struct ProtectionRules {
    rules: Vec<String>,
}

impl Default for ProtectionRules {
    fn default() -> Self {
        Self {
            rules: DEFAULT_PROTECTED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProtectionRules {
    /// Built-in rules plus `extra`, lower-cased. Blank fragments are dropped,
    /// since an empty substring would protect every directory.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut protection = Self::default();
        for rule in extra {
            let rule = rule.as_ref().trim().to_lowercase();
            if rule.is_empty() || protection.rules.contains(&rule) {
                continue;
            }
            protection.rules.push(rule);
        }
        protection
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Case-insensitive substring match of a bare directory name.
    pub fn is_protected(&self, dir_name: &str) -> bool {
        let name = dir_name.to_lowercase();
        self.rules.iter().any(|rule| name.contains(rule.as_str()))
    }
}
