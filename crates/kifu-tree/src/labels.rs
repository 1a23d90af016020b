use kifu_board::{BoardEngine, Loc};

use crate::properties::{PropId, ValueKind};
use crate::{GameTree, NodeIdx, NodeKind, PropertyValue, ROOT, TreeError};

const LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

impl<B: BoardEngine> GameTree<B> {
    /// Marks each child's move on `node` with a letter, in child order.
    /// Returns how many labels were written.
    pub fn add_labels(&mut self, node: NodeIdx) -> Result<usize, TreeError> {
        let points = self
            .children(node)
            .filter_map(|child| match self.get_move(child) {
                Ok((Loc::Point(point), _)) => Some(point),
                _ => None,
            })
            .collect::<Vec<_>>();
        let text = points
            .iter()
            .zip(LABELS)
            .map(|(point, &label)| format!("{point}:{}", char::from(label)))
            .collect::<Vec<_>>()
            .join("][");
        if text.is_empty() {
            return Ok(0);
        }
        let count = points.len().min(LABELS.len());
        let value = PropertyValue::new(PropId::LB, ValueKind::ListOfComposedPointText, text);
        self.add_property(node, value)?;
        Ok(count)
    }

    pub fn remove_labels(&mut self, node: NodeIdx) -> usize {
        self.remove_properties(node, PropId::LB)
    }

    /// Replaces the labels of every node that branches.
    pub fn relabel(&mut self) -> Result<usize, TreeError> {
        let branching = self
            .breadth_first(ROOT)
            .filter(|&idx| self.node(idx).kind() != NodeKind::Sequence)
            .filter(|&idx| self.children(idx).nth(1).is_some())
            .collect::<Vec<_>>();
        let mut written = 0;
        for node in branching {
            self.remove_labels(node);
            written += self.add_labels(node)?;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use kifu_board::{Color, Goban, Point};

    use super::*;

    #[test]
    fn branches_get_letters() {
        let mut tree = GameTree::new(Goban::default());
        let info = tree.add_child(ROOT, NodeKind::GameInfo, 0).unwrap();
        tree.add_move_child(info, Color::Black, Loc::Point(Point::new(15, 3)), 0).unwrap();
        tree.add_move_child(info, Color::Black, Loc::Pass, 0).unwrap();
        tree.add_move_child(info, Color::Black, Loc::Point(Point::new(16, 2)), 0).unwrap();

        assert_eq!(tree.relabel(), Ok(2));
        let label = tree.find_property(info, PropId::LB).map(PropertyValue::text);
        assert_eq!(label, Some("pd:A][qc:B"));

        assert_eq!(tree.relabel(), Ok(2));
        assert_eq!(tree.properties(info).filter(|(_, v)| v.is(PropId::LB)).count(), 1);
        assert_eq!(tree.deleted_properties(), 1);
    }
}
