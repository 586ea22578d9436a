//! Fixed debate topic catalog.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: &'static str,
    pub title: &'static str,
    pub desc: &'static str,
    pub level: &'static str,
    pub participants: &'static str,
    pub category: &'static str,
    pub color: &'static str,
}

static CATALOG: [Topic; 6] = [
    Topic {
        id: "1",
        title: "Social Media Impact",
        desc: "Does social media do more harm than good?",
        level: "intermediate",
        participants: "2.1k",
        category: "technology",
        color: "blue",
    },
    Topic {
        id: "2",
        title: "Climate Change Solutions",
        desc: "Should individual actions or government policies be prioritized?",
        level: "advanced",
        participants: "1.8k",
        category: "environment",
        color: "green",
    },
    Topic {
        id: "3",
        title: "Remote Work Future",
        desc: "Is remote work better than office work?",
        level: "beginner",
        participants: "3.2k",
        category: "business",
        color: "purple",
    },
    Topic {
        id: "4",
        title: "AI in Education",
        desc: "Will AI replace human teachers?",
        level: "intermediate",
        participants: "1.5k",
        category: "education",
        color: "orange",
    },
    Topic {
        id: "5",
        title: "Universal Basic Income",
        desc: "Should governments provide universal basic income?",
        level: "advanced",
        participants: "900",
        category: "politics",
        color: "red",
    },
    Topic {
        id: "6",
        title: "Space Exploration",
        desc: "Should we prioritize space exploration or Earth’s problems?",
        level: "intermediate",
        participants: "1.2k",
        category: "ethics",
        color: "cyan",
    },
];

pub fn catalog() -> &'static [Topic] {
    &CATALOG
}

/// Find a topic by id or (case-insensitive) title.
pub fn find(key: &str) -> Option<&'static Topic> {
    let key = key.trim();
    CATALOG
        .iter()
        .find(|t| t.id == key || t.title.eq_ignore_ascii_case(key))
}
