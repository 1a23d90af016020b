use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use expect_test::expect_file;
use kifu_board::coord::encode_point;
use kifu_board::{BoardEngine, Goban, Point};
use kifu_tree::printer::{PrintOptions, to_sgf_string};

use crate::{Parse, ParseOptions, Statistics, parse, parse_with};

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "sgf" {
                    let expected = path.with_extension("tree");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

fn render<B: BoardEngine>(parse: &Parse<B>) -> String {
    let mut out = parse.tree.debug_dump();
    out.push_str("Errors:\n");
    for diagnostic in &parse.diagnostics {
        let _ = writeln!(out, "  {}: {}", diagnostic.severity(), diagnostic.message());
    }
    out
}

#[test]
fn parse_test_data() {
    for case in TestCase::list() {
        let parse = parse(&case.text, &ParseOptions::default());
        expect_file![&case.expected].assert_eq(&render(&parse));
    }
}

const GAME: &str = "(;FF[4]SZ[19]PB[Honinbo Shusaku]PW[Gennan Inseki]RE[B+2 (after 325 moves)]
;B[qd];W[dc];B[pq];W[oc]
(;B[cp])
(;B[dp]C[Joseki \\] done])
)";

#[test]
fn printed_records_parse_back_the_same() {
    let options = ParseOptions::default();
    let first = parse(GAME, &options);
    assert!(first.diagnostics.is_empty());

    let printed = to_sgf_string(&first.tree, &PrintOptions::default()).unwrap();
    let second = parse(&printed, &options);
    assert!(second.diagnostics.is_empty(), "{printed}");
    assert_eq!(first.tree.debug_dump(), second.tree.debug_dump());
}

#[test]
fn passes_large_boards_and_collections_print_back() {
    let options = ParseOptions::default();
    for text in [
        "(;FF[3]SZ[19];B[pd];W[tt];B[dd];W[tt])",
        "(;FF[4]SZ[25];B[tt];W[yy];B[])",
        "(;SZ[19];B[pd];W[dp])(;SZ[9];B[cc](;W[gg])(;W[gc]))(;SZ[13];B[jd])",
    ] {
        let first = parse(text, &options);
        assert!(!first.diagnostics.has_errors(), "{text}");

        let printed = to_sgf_string(&first.tree, &PrintOptions::default()).unwrap();
        let second = parse(&printed, &options);
        assert_eq!(first.diagnostics.len(), second.diagnostics.len(), "{printed}");
        assert_eq!(first.tree.debug_dump(), second.tree.debug_dump(), "{printed}");
    }
}

#[test]
fn variations_restore_the_board() {
    let parse = parse(GAME, &ParseOptions::default());
    // Both variations are taken back once closed.
    assert_eq!(parse.tree.board().move_number(), 4);
    assert_eq!(parse.tree.board().occupied(), 4);
}

#[test]
fn move_limit_stops_the_file() {
    let options = ParseOptions { move_limit: Some(2), ..ParseOptions::default() };
    let parse = parse("(;SZ[19];B[aa];W[bb];B[cc];W[dd])(;B[ee])", &options);
    assert!(parse.limit_reached);
    assert!(!parse.aborted);
    assert!(parse.diagnostics.is_empty());
    // Root, collection, game info and the two moves.
    assert_eq!(parse.tree.len(), 5);
}

#[test]
fn move_limit_on_a_long_record() {
    let moves = (0..50u8)
        .map(|i| {
            let color = if i % 2 == 0 { 'B' } else { 'W' };
            format!(";{color}[{}]", encode_point(Point::new(i % 19, i / 19)))
        })
        .collect::<String>();
    let text = format!("(;SZ[19]{moves})");

    let options = ParseOptions { move_limit: Some(10), ..ParseOptions::default() };
    let limited = parse(&text, &options);
    assert!(limited.limit_reached);
    let tree = &limited.tree;
    assert_eq!(tree.node_indices().filter(|&node| tree.get_move(node).is_ok()).count(), 10);
    assert_eq!(tree.board().move_number(), 10);

    let whole = parse(&text, &ParseOptions::default());
    assert!(!whole.limit_reached);
    assert_eq!(whole.tree.board().move_number(), 50);
}

#[test]
fn comments_can_be_dropped() {
    let options = ParseOptions { comments: false, ..ParseOptions::default() };
    let parse = parse("(;;B[pd]C[first move])", &options);
    assert!(parse.tree.debug_dump().ends_with("3 BlackMove pd\n"));
}

#[test]
fn tracking_mode_counts_without_stones() {
    let options = ParseOptions { play: false, ..ParseOptions::default() };
    let parse = parse("(;AB[aa][bb];B[cc];W[cc])", &options);
    assert!(parse.diagnostics.is_empty());
    assert_eq!(parse.tree.board().occupied(), 0);
    assert_eq!(parse.tree.board().move_number(), 2);
    assert_eq!(parse.tree.board().depth(), 4);
}

#[test]
fn empty_input_has_no_games() {
    let parse = parse("", &ParseOptions::default());
    let messages = parse.diagnostics.iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["file contains no games"]);
}

#[test]
fn node_capacity_is_fatal() {
    let text = format!("(;{})", ";".repeat(70_000));
    let parse = parse(&text, &ParseOptions::default());
    assert!(parse.aborted);
    assert!(parse.diagnostics.is_fatal());
    assert_eq!(parse.tree.len(), kifu_tree::MAX_ENTRIES);
}

#[test]
fn deep_nesting_is_fatal() {
    let text = format!("(;{}{})", "(;".repeat(1_100), ")".repeat(1_100));
    let parse = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(move || parse(&text, &ParseOptions::default()))
        .unwrap()
        .join()
        .unwrap();
    assert!(parse.aborted);
    let fatal = parse.diagnostics.errors().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(fatal, ["variations nested deeper than 1000"]);
}

#[test]
fn statistics_collect_players_and_results() {
    let mut stats = Statistics::new();
    let options =
        ParseOptions { file_name: "games/1846-09-11.sgf".to_owned(), ..ParseOptions::default() };
    let parse = parse_with(GAME, &options, Goban::default(), Some(&mut stats));
    assert!(parse.diagnostics.is_empty());

    assert_eq!(stats.files, 1);
    assert_eq!(stats.properties["B"], 4);
    assert_eq!(stats.results["B+2"], 1);
    assert_eq!(stats.result_comments["after % moves"], 1);
    let player = &stats.players["Honinbo Shusaku"];
    assert_eq!((player.games, player.first_game.as_str()), (1, "1846-09-11"));
}

#[test]
fn game_info_is_filled_in() {
    let parse = parse(GAME, &ParseOptions::default());
    let info = &parse.tree.info;
    assert_eq!(info.black_player, "Honinbo Shusaku");
    assert_eq!(info.result.value, "B+2");
    assert_eq!(info.result.number, Some(325));
    assert!(info.is_ff4());
}
