//! Robots.txt rule evaluation
//!
//! Allow/Disallow matching is delegated to the robotstxt crate; the
//! Crawl-delay directive is parsed here since that crate only handles
//! permission rules.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt rules for one host
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content; empty means no restrictions
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content for rule evaluation
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules that allow every path, used when no robots.txt is present
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the Crawl-delay (seconds) applying to the given user agent.
    ///
    /// A delay declared for a matching specific agent group wins over one
    /// declared for `*`.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let wanted = user_agent.to_lowercase();

        let mut group_agents: Vec<String> = Vec::new();
        let mut wildcard_delay: Option<f64> = None;
        let mut agent_delay: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => group_agents.push(value.to_lowercase()),
                "crawl-delay" => {
                    if let Ok(delay) = value.parse::<f64>() {
                        if group_agents.iter().any(|ua| ua != "*" && wanted.contains(ua.as_str())) {
                            agent_delay = Some(delay);
                        } else if group_agents.iter().any(|ua| ua == "*") {
                            wildcard_delay = Some(delay);
                        }
                    }
                    // A group's delay seen; the next User-agent starts a new group
                    group_agents.clear();
                }
                _ => {}
            }
        }

        agent_delay.or(wildcard_delay)
    }
}
