use std::str::FromStr;

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    HttpRequest,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const PREFERENCES_COOKIE: &str = "portfolio_preferences";
pub const CONSENT_COOKIE: &str = "cookieConsent";
pub const MAX_VISITS: usize = 20;
const PREFERENCES_DAYS: i64 = 365;
const CONSENT_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn body_class(&self) -> String {
        format!("theme-{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub page: String,
    pub timestamp: DateTime<Utc>,
}

/// Visitor settings kept in the `portfolio_preferences` cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
    pub visited: bool,
    pub last_visit: Option<DateTime<Utc>>,
    pub visit_count: u64,
    pub visits: Vec<Visit>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_string(),
            visited: false,
            last_visit: None,
            visit_count: 0,
            visits: Vec::new(),
        }
    }
}

impl Preferences {
    /// Parses a cookie value, URL-encoded or not. Anything unreadable yields the defaults.
    pub fn from_cookie_value(raw: &str) -> Self {
        if let Ok(prefs) = serde_json::from_str(raw) {
            return prefs;
        }
        urlencoding::decode(raw)
            .ok()
            .and_then(|decoded| serde_json::from_str(&decoded).ok())
            .unwrap_or_else(|| {
                warn!("Ignoring unreadable preferences cookie");
                Self::default()
            })
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        req.cookie(PREFERENCES_COOKIE)
            .map(|cookie| Self::from_cookie_value(cookie.value()))
            .unwrap_or_default()
    }

    /// Records a page view. Returns true when this is the visitor's first one.
    pub fn record_visit(&mut self, page: &str, now: DateTime<Utc>) -> bool {
        let page = if page.is_empty() { "home" } else { page };
        self.visits.push(Visit {
            page: page.to_string(),
            timestamp: now,
        });
        if self.visits.len() > MAX_VISITS {
            let excess = self.visits.len() - MAX_VISITS;
            self.visits.drain(..excess);
        }
        self.visit_count += 1;
        self.last_visit = Some(now);

        let first_visit = !self.visited;
        self.visited = true;
        first_visit
    }

    pub fn to_cookie(&self) -> Cookie<'static> {
        // Serializing plain data cannot fail; fall back to an empty object regardless.
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        Cookie::build(PREFERENCES_COOKIE, urlencoding::encode(&json).into_owned())
            .path("/")
            .max_age(CookieDuration::days(PREFERENCES_DAYS))
            .same_site(SameSite::Lax)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Accepted,
    Declined,
}

impl Consent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consent::Accepted => "accepted",
            Consent::Declined => "declined",
        }
    }

    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        req.cookie(CONSENT_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
    }

    pub fn to_cookie(&self) -> Cookie<'static> {
        Cookie::build(CONSENT_COOKIE, self.as_str())
            .path("/")
            .max_age(CookieDuration::hours(CONSENT_HOURS))
            .same_site(SameSite::Lax)
            .finish()
    }
}

impl FromStr for Consent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Consent::Accepted),
            "declined" => Ok(Consent::Declined),
            _ => Err(()),
        }
    }
}
