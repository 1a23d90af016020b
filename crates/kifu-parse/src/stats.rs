//! Counts gathered across many parsed files.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub games: usize,
    pub first_game: String,
    pub first_rank: String,
    pub last_game: String,
    pub last_rank: String,
}

#[derive(Clone, Debug, Default)]
pub struct Statistics {
    pub files: usize,
    pub properties: FxHashMap<String, usize>,
    pub unknown_properties: usize,
    pub handicaps: FxHashMap<String, usize>,
    pub old_handicaps: FxHashMap<String, usize>,
    pub results: FxHashMap<String, usize>,
    pub result_comments: FxHashMap<String, usize>,
    pub rules: FxHashMap<String, usize>,
    pub ranks: FxHashMap<String, usize>,
    pub players: FxHashMap<String, PlayerInfo>,
}

/// The file name without directories and without a `.sgf` extension.
pub fn game_name(file_name: &str) -> &str {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    name.strip_suffix(".sgf").unwrap_or(name)
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count(map: &mut FxHashMap<String, usize>, key: &str) {
        *map.entry(key.to_owned()).or_default() += 1;
    }

    pub(crate) fn player(&mut self, name: &str, rank: &str, file_name: &str) {
        let game = game_name(file_name);
        let info = self.players.entry(name.to_owned()).or_default();
        info.games += 1;
        if info.first_game.is_empty() {
            info.first_game = game.to_owned();
            info.first_rank = rank.to_owned();
        }
        info.last_game = game.to_owned();
        info.last_rank = rank.to_owned();
    }

    /// A plain-text summary, most frequent values first.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} files", self.files);
        for (title, map) in [
            ("Property", &self.properties),
            ("HA", &self.handicaps),
            ("OH", &self.old_handicaps),
            ("RE", &self.results),
            ("RE comment", &self.result_comments),
            ("RU", &self.rules),
            ("Rank", &self.ranks),
        ] {
            for (key, count) in sorted(map) {
                let _ = writeln!(out, "{title} {key}: {count}");
            }
        }
        if self.unknown_properties > 0 {
            let _ = writeln!(out, "Unknown properties: {}", self.unknown_properties);
        }
        let mut players = self.players.iter().collect::<Vec<_>>();
        players.sort_by(|a, b| b.1.games.cmp(&a.1.games).then_with(|| a.0.cmp(b.0)));
        for (name, info) in players {
            let _ = writeln!(
                out,
                "Player {name}: {}, first: {}, {}, last: {}, {}",
                info.games, info.first_game, info.first_rank, info.last_game, info.last_rank
            );
        }
        out
    }
}

fn sorted(map: &FxHashMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries = map.iter().map(|(key, &count)| (key.as_str(), count)).collect::<Vec<_>>();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}
