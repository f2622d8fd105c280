use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonalInfo {
    pub id: u64,
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// A headline figure such as "5+ Years". Stored in the `number` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AboutStat {
    pub id: u64,
    #[sqlx(rename = "number")]
    pub value: String,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
}

impl AboutStat {
    /// Leading integer of the value, used as the counter animation target.
    pub fn numeric_target(&self) -> u64 {
        self.value
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0)
    }

    /// Whatever follows the leading digits, e.g. `+` in `50+`.
    pub fn suffix(&self) -> &str {
        let trimmed = self.value.trim();
        let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
        &trimmed[digits..]
    }
}

/// A markdown content block of the about page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AboutSection {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub icon: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutPayload {
    pub personal_info: Option<PersonalInfo>,
    pub stats: Vec<AboutStat>,
    pub sections: Vec<AboutSection>,
}

impl AboutPayload {
    pub fn is_empty(&self) -> bool {
        self.personal_info.is_none() && self.stats.is_empty() && self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(value: &str) -> AboutStat {
        AboutStat {
            id: 1,
            value: value.into(),
            label: "Projects".into(),
            description: None,
            icon: None,
            display_order: 1,
        }
    }

    #[test]
    fn stat_value_splits_into_target_and_suffix() {
        assert_eq!(stat("50+").numeric_target(), 50);
        assert_eq!(stat("50+").suffix(), "+");
        assert_eq!(stat(" 12 ").numeric_target(), 12);
        assert_eq!(stat("many").numeric_target(), 0);
        assert_eq!(stat("many").suffix(), "many");
    }

    #[test]
    fn stats_serialize_number_as_value() {
        let json = serde_json::to_value(stat("7")).unwrap();
        assert_eq!(json["value"], "7");
        assert!(json.get("number").is_none());
    }

    #[test]
    fn empty_payload() {
        assert!(AboutPayload::default().is_empty());
    }
}
