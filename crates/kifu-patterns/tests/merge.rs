use expect_test::expect;
use kifu_board::coord::encode_loc;
use kifu_board::{BoardEngine as _, BoardSize, Color, Loc, Point, Symmetry};
use kifu_parse::{ParseOptions, parse};
use kifu_patterns::{GAME_INFO, MergeOptions, MergePolicy, PatternError, PatternTree};
use kifu_tree::{GameTree, NodeIdx};

const NINETEEN: BoardSize = BoardSize::square(19);

fn record(text: &str) -> GameTree {
    let parse = parse(text, &ParseOptions::default());
    assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
    parse.tree
}

/// Every line of the pattern tree, each node written with its markers.
fn lines(tree: &GameTree) -> Vec<String> {
    fn walk(tree: &GameTree, node: NodeIdx, prefix: String, out: &mut Vec<String>) {
        let children = tree.children(node).collect::<Vec<_>>();
        if children.is_empty() {
            out.push(prefix);
            return;
        }
        for child in children {
            let (loc, color) = tree.get_move(child).unwrap();
            let mut markers = tree
                .properties(child)
                .filter(|(_, value)| value.move_color().is_none())
                .map(|(_, value)| format!("{}[{}]", value.prop().ident(), value.text()))
                .collect::<Vec<_>>();
            markers.sort();
            let step = format!(";{}[{}]{}", color.letter(), encode_loc(loc, true), markers.concat());
            walk(tree, child, prefix.clone() + &step, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, GAME_INFO, String::new(), &mut out);
    out.sort();
    out
}

#[test]
fn variations_are_marked_as_bad_moves() {
    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let game = record("(;SZ[19];B[qd];W[dc](;B[pq];W[oc])(;B[dp]))");

    let report = patterns.merge(&game, &MergeOptions::default());
    assert!(report.is_clean());
    assert_eq!(report.symmetry, Some(Symmetry::Identity));
    assert_eq!((report.nodes_added, report.lines_expanded), (5, 2));

    let expected = expect![[r#"
        0 Root
          1 Collection
            2 GameInfo FF[4] GM[1] CA[UTF-8] AP[kifu:0.1.0] ST[1] SZ[19] HA[0]
              3 BlackMove qd
                4 WhiteMove dc
                  5 BlackMove pq
                    6 WhiteMove oc
                  7 Interior B[dp] BM[1] TR[dp]
    "#]];
    expected.assert_eq(&patterns.tree().debug_dump());

    // Merging again finds every node and adds no second marker.
    let report = patterns.merge(&game, &MergeOptions::default());
    assert_eq!(report.nodes_added, 0);
    expected.assert_eq(&patterns.tree().debug_dump());
}

#[test]
fn merge_order_does_not_matter() {
    let first = record("(;SZ[19];B[pd];W[dc](;B[pp];W[qf])(;B[dp]))");
    let second = record("(;SZ[19];B[dd];W[pc];B[dp](;W[pp])(;W[pq];B[qq]))");

    let mut forward = PatternTree::new(NINETEEN, 0).unwrap();
    forward.merge(&first, &MergeOptions::default());
    forward.merge(&second, &MergeOptions::default());

    let mut backward = PatternTree::new(NINETEEN, 0).unwrap();
    backward.merge(&second, &MergeOptions::default());
    backward.merge(&first, &MergeOptions::default());

    assert_eq!(lines(forward.tree()), lines(backward.tree()));
}

#[test]
fn four_stone_handicap() {
    let text = "(;SZ[19]HA[4]AB[dd][pd][dp][pp];W[qd];B[dc];W[oc];B[qf])";
    let options = ParseOptions { move_limit: Some(2), ..ParseOptions::default() };
    let parse = parse(text, &options);
    assert!(parse.limit_reached);
    assert!(parse.diagnostics.is_empty());
    assert_eq!(parse.tree.board().occupied(), 6);

    let mut patterns = PatternTree::new(NINETEEN, 4).unwrap();
    let report = patterns.merge(&parse.tree, &MergeOptions::default());
    assert!(report.is_clean());
    assert_eq!(report.symmetry, Some(Symmetry::Identity));
    assert_eq!(report.nodes_added, 2);

    // The same opening played in the lower left corner joins the same line.
    let turned = record("(;SZ[19]HA[4]AB[dd][pd][dp][pp];W[cp])");
    let report = patterns.merge(&turned, &MergeOptions::default());
    assert_eq!(report.symmetry, Some(Symmetry::Rotate180));
    assert_eq!(report.nodes_added, 0);

    let tree = patterns.tree();
    let first = tree.first_child(GAME_INFO).unwrap();
    assert_eq!(tree.children(GAME_INFO).count(), 1);
    assert_eq!(tree.get_move(first).unwrap(), (Loc::Point(Point::new(16, 3)), Color::White));
}

#[test]
fn wrong_first_color_merges_nothing() {
    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&record("(;SZ[19];W[pd];B[dd])"), &MergeOptions::default());
    assert_eq!(
        report.errors,
        [PatternError::WrongFirstColor { expected: Color::Black, found: Color::White }]
    );
    assert_eq!(report.symmetry, None);
    assert_eq!(patterns.tree().len(), 3);
}

#[test]
fn sequences_are_not_supported() {
    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&record("(;SZ[19];B[qd];S[ddpp])"), &MergeOptions::default());
    assert_eq!(report.errors.len(), 2);
    assert!(matches!(report.errors[0], PatternError::UnsupportedNode { .. }));
    assert_eq!(patterns.tree().len(), 3);
}

#[test]
fn sizes_must_match() {
    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&record("(;SZ[9];B[cc])"), &MergeOptions::default());
    assert_eq!(
        report.errors,
        [PatternError::SizeMismatch { expected: NINETEEN, found: BoardSize::square(9) }]
    );
}

#[test]
fn limits() {
    let game = record("(;SZ[19];B[qd];W[dc](;B[pq];W[oc];B[po])(;B[dp];W[fq]))");

    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let options = MergeOptions { move_limit: Some(3), ..MergeOptions::default() };
    let report = patterns.merge(&game, &options);
    // qd, dc, pq on the main line and dp from the variation.
    assert_eq!(report.nodes_added, 4);

    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let options = MergeOptions { node_limit: Some(2), ..MergeOptions::default() };
    let report = patterns.merge(&game, &options);
    // Only qd and dc on the main line. Its variation starts in the third
    // move, which the main line never reached.
    assert_eq!(report.nodes_added, 2);
    assert_eq!(report.lines_expanded, 1);
}

#[test]
fn marked_moves_are_good() {
    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    patterns.mark_next_good(Color::Black);
    patterns.merge(&record("(;SZ[19];B[qd];W[dc])"), &MergeOptions::default());
    patterns.merge(&record("(;SZ[19];B[qd];W[dc])"), &MergeOptions::default());

    let first = patterns.tree().first_child(GAME_INFO).unwrap();
    assert_eq!(lines(patterns.tree()), [";B[qd]GB[1]SQ[qd];W[dc]"]);
    assert_eq!(patterns.tree().properties(first).count(), 3);
}

#[test]
fn all_or_nothing_restores_the_tree() {
    let game = record("(;SZ[19];B[qd](;W[dc])(;C[no move here]))");

    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&game, &MergeOptions::default());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.nodes_added, 2);
    assert_eq!(patterns.tree().len(), 5);

    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let options = MergeOptions { policy: MergePolicy::AllOrNothing, ..MergeOptions::default() };
    let report = patterns.merge(&game, &options);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.nodes_added, 0);
    assert_eq!(patterns.tree().len(), 3);
}

#[test]
fn a_failing_variation_does_not_stop_its_siblings() {
    let game = record("(;SZ[19];B[qd](;W[dc])(;C[no move here])(;W[dp]))");

    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&game, &MergeOptions::default());
    assert!(matches!(report.errors[..], [PatternError::Move { .. }]), "{:?}", report.errors);
    assert_eq!((report.nodes_added, report.lines_expanded), (3, 2));
    assert_eq!(lines(patterns.tree()), [";B[qd];W[dc]", ";B[qd];W[dp]BM[1]TR[dp]"]);
}

#[test]
fn off_board_moves_are_errors() {
    let zz = Point::new(25, 25);
    let parse = parse("(;SZ[19];B[dp];W[zz])", &ParseOptions::default());
    assert!(!parse.diagnostics.has_errors());

    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&parse.tree, &MergeOptions::default());
    assert!(
        matches!(report.errors[..], [PatternError::OffBoard { point, .. }] if point == zz),
        "{:?}",
        report.errors
    );
    assert_eq!(report.nodes_added, 1);
    assert_eq!(lines(patterns.tree()), [";B[pd]"]);

    let parse = kifu_parse::parse("(;SZ[19];B[zz])", &ParseOptions::default());
    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&parse.tree, &MergeOptions::default());
    assert!(matches!(report.errors[..], [PatternError::OffBoard { point, .. }] if point == zz));
    assert_eq!(report.symmetry, None);
    assert_eq!(patterns.tree().len(), 3);
}

#[test]
fn only_the_first_record_is_merged() {
    let games = record("(;SZ[19];B[qd];W[dc])(;SZ[19];B[pd];W[dp])");

    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&games, &MergeOptions::default());
    assert!(report.is_clean(), "{:?}", report.errors);
    assert_eq!(report.records_skipped, 1);
    assert_eq!(lines(patterns.tree()), [";B[qd];W[dc]"]);

    // The size comes from the first record too.
    let games = record("(;SZ[19];B[qd])(;SZ[9];B[cc])(;SZ[13];B[dd])");
    let mut patterns = PatternTree::new(NINETEEN, 0).unwrap();
    let report = patterns.merge(&games, &MergeOptions::default());
    assert!(report.is_clean(), "{:?}", report.errors);
    assert_eq!((report.nodes_added, report.records_skipped), (1, 2));
}
