/// Keyword that starts a title request ("give me a title")
pub const TITLE_KEYWORD: &str = "给我头衔";

/// Extract the requested title from a raw message.
///
/// Returns `None` unless the message starts with [`TITLE_KEYWORD`]. The
/// title is everything after the keyword with surrounding whitespace
/// trimmed; an empty title is still a match.
pub fn extract_title(raw_message: &str) -> Option<&str> {
    raw_message.strip_prefix(TITLE_KEYWORD).map(str::trim)
}

/// Command that flips a group's feature switch
#[derive(Debug, Clone)]
pub struct SwitchCommand {
    pub name: String,
}

impl SwitchCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn matches(&self, raw_message: &str) -> bool {
        let name = self.name.trim();
        !name.is_empty() && raw_message.trim().to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_but_inner_content_kept() {
        assert_eq!(extract_title("给我头衔  Captain "), Some("Captain"));
        assert_eq!(extract_title("给我头衔 Big Boss"), Some("Big Boss"));
    }

    #[test]
    fn empty_title_still_matches() {
        assert_eq!(extract_title("给我头衔"), Some(""));
        assert_eq!(extract_title("给我头衔   "), Some(""));
    }

    #[test]
    fn keyword_must_lead_the_message() {
        assert_eq!(extract_title("请给我头衔 x"), None);
        assert_eq!(extract_title(" 给我头衔 x"), None);
        assert_eq!(extract_title("hello"), None);
    }

    #[test]
    fn switch_matches_whole_message_case_insensitively() {
        let cmd = SwitchCommand::new("gmt");
        assert!(cmd.matches("gmt"));
        assert!(cmd.matches("  GMT "));
        assert!(!cmd.matches("gmt please"));
        assert!(!SwitchCommand::new("").matches(""));
    }
}
