use kifu_board::{BoardSize, Point};

use crate::properties::PropId;

/// `KM`: `set` once the property was seen, `known` unless it was `?`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Komi {
    pub value: f32,
    pub set: bool,
    pub known: bool,
}

/// `RE`, split into the outcome and a trailing free-text comment.
///
/// The first number in the comment is taken out and replaced by `%`.
/// `separator` is the bracket the comment opened with, and `both_brackets`
/// is set when it was closed as well.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameResult {
    pub value: String,
    pub comment: String,
    pub number: Option<u32>,
    pub separator: Option<char>,
    pub both_brackets: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeLimit {
    pub seconds: u32,
    pub rest: String,
}

/// Game-info fields of the record being parsed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameInfo {
    pub file_format: u8,
    pub game: u8,
    pub style: u8,
    pub size: BoardSize,
    pub komi: Komi,
    pub result: GameResult,
    pub time: Option<TimeLimit>,
    pub rules: String,
    pub handicap: u8,
    pub handicap_stones: Vec<Point>,
    pub black_setup: Vec<Point>,
    pub white_setup: Vec<Point>,
    pub black_player: String,
    pub white_player: String,
    pub black_rank: String,
    pub white_rank: String,
    pub black_team: String,
    pub white_team: String,
    pub date: String,
    pub place: String,
    pub game_comment: String,
    pub user: String,
    pub event: String,
    pub round: String,
    pub source: String,
    pub application: String,
    pub annotator: String,
    pub copyright: String,
    pub old_handicap: String,
    pub charset: String,
    pub game_name: String,
    pub opening: String,
    pub overtime: String,
}

impl GameInfo {
    pub fn is_ff4(&self) -> bool {
        self.file_format == 4
    }

    /// The plain text field filled by `id`, if it is one.
    pub fn text_field_mut(&mut self, id: PropId) -> Option<&mut String> {
        let field = match id {
            PropId::PB => &mut self.black_player,
            PropId::PW => &mut self.white_player,
            PropId::BR => &mut self.black_rank,
            PropId::WR => &mut self.white_rank,
            PropId::BT => &mut self.black_team,
            PropId::WT => &mut self.white_team,
            PropId::DT => &mut self.date,
            PropId::PC => &mut self.place,
            PropId::GC => &mut self.game_comment,
            PropId::US => &mut self.user,
            PropId::EV => &mut self.event,
            PropId::RO => &mut self.round,
            PropId::SO => &mut self.source,
            PropId::AP => &mut self.application,
            PropId::AN => &mut self.annotator,
            PropId::CP => &mut self.copyright,
            PropId::OH => &mut self.old_handicap,
            PropId::CA => &mut self.charset,
            PropId::GN => &mut self.game_name,
            PropId::ON => &mut self.opening,
            PropId::OT => &mut self.overtime,
            PropId::RU => &mut self.rules,
            _ => return None,
        };
        Some(field)
    }

    /// Problems spotted once a record has been read.
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let stones = self.black_setup.len() + self.handicap_stones.len();
        if self.handicap >= 2 && stones != usize::from(self.handicap) {
            problems.push(format!("HA[{}] but {stones} black setup stones", self.handicap));
        }
        problems
    }

    /// Clears everything for the next record.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
