use std::collections::BTreeMap;

// 2014 season ids on the stats server.
const KNOWN_TEAMS: &[(&str, u32)] = &[
    ("Minnesota Wind Chill", 210001),
    ("New York Empire", 208003),
    ("DC Breeze", 206001),
    ("Cincinnati Revolution", 183001),
    ("Rochester Dragons", 208005),
    ("Windy City Wildfire", 207003),
    ("Toronto Rush", 195002),
    ("Madison Radicals", 224002),
    ("New Jersey Hammerheads", 230001),
    ("Philadelphia Phoenix", 208004),
    ("Detroit Mechanix", 219001),
    ("Indianapolis Alley Cats", 253001),
];

/// Name to id lookup. Loaded teams take precedence over the built-in season list.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    by_name: BTreeMap<String, u32>,
}

impl TeamDirectory {
    pub fn builtin() -> Self {
        let mut dir = Self::default();
        for (name, id) in KNOWN_TEAMS {
            dir.insert(name, *id);
        }
        dir
    }

    pub fn insert(&mut self, name: &str, id: u32) {
        self.by_name.insert(name.to_string(), id);
    }

    /// `None` is the "unknown team" answer, never an error.
    pub fn id_for(&self, name: &str) -> Option<u32> {
        self.by_name.get(name.trim()).copied()
    }
}
