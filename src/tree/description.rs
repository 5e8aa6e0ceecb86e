//! Recursive branch description used to wire a tree
//!
//! Text syntax (whitespace ignored):
//!   node   := INDEX ( '(' branch ',' branch ',' branch ')' )?
//!   branch := '-' | node
//! A bare index is a leaf. Branches are listed in X, Y, Z order.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::node::Edge;
use super::TreeError;

/// `(index, [X branch, Y branch, Z branch])`, absent branches are `None`.
///
/// Dropping, cloning, comparing, printing and parsing all run on an
/// explicit stack, so chain-shaped descriptions of any depth are safe.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeDescription {
    index: usize,
    branches: [Option<Box<TreeDescription>>; 3],
}

impl TreeDescription {
    /// Node with no branches
    pub fn leaf(index: usize) -> Self {
        Self {
            index,
            branches: [None, None, None],
        }
    }

    /// Node with explicit `[X, Y, Z]` branches
    pub fn new(index: usize, branches: [Option<TreeDescription>; 3]) -> Self {
        let [x, y, z] = branches;
        Self {
            index,
            branches: [x.map(Box::new), y.map(Box::new), z.map(Box::new)],
        }
    }

    /// Replace the branch on `edge`
    pub fn with_child(mut self, edge: Edge, child: TreeDescription) -> Self {
        self.branches[edge.slot()] = Some(Box::new(child));
        self
    }

    /// Index of the node this description starts at
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sub-description on `edge`
    pub fn branch(&self, edge: Edge) -> Option<&TreeDescription> {
        self.branches[edge.slot()].as_deref()
    }

    /// Every index mentioned, in pre-order (node, then X, Y, Z subtrees)
    pub fn indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(desc) = stack.pop() {
            out.push(desc.index);
            for edge in Edge::ALL.into_iter().rev() {
                if let Some(child) = desc.branch(edge) {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Number of node references in the description
    pub fn len(&self) -> usize {
        self.indices().len()
    }

    /// Always false: a description names at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check that the description references each of `0..n_qubits` exactly once.
    ///
    /// A finite nested description that names every index once cannot
    /// produce a cycle, so this also rules cycles out.
    pub fn validate(&self, n_qubits: usize) -> Result<(), TreeError> {
        let mut seen = HashSet::with_capacity(n_qubits);
        for index in self.indices() {
            if index >= n_qubits {
                return Err(TreeError::DescriptionIndexOutOfRange { index, n_qubits });
            }
            if !seen.insert(index) {
                return Err(TreeError::DuplicateIndex(index));
            }
        }
        match (0..n_qubits).find(|index| !seen.contains(index)) {
            Some(missing) => Err(TreeError::MissingIndex(missing)),
            None => Ok(()),
        }
    }

    /// Z-chain `0 -Z-> 1 -Z-> ... -Z-> n-1`, the Jordan-Wigner layout
    pub fn jordan_wigner(n_qubits: usize) -> Option<Self> {
        Self::chain(n_qubits, Edge::Z)
    }

    /// X-chain `0 -X-> 1 -X-> ... -X-> n-1`, the parity layout
    pub fn parity(n_qubits: usize) -> Option<Self> {
        Self::chain(n_qubits, Edge::X)
    }

    fn chain(n_qubits: usize, edge: Edge) -> Option<Self> {
        let last = n_qubits.checked_sub(1)?;
        let mut desc = Self::leaf(last);
        for index in (0..last).rev() {
            desc = Self::leaf(index).with_child(edge, desc);
        }
        Some(desc)
    }

    /// Complete ternary tree filled breadth-first: node `k` has children
    /// `3k+1`, `3k+2`, `3k+3` on X, Y, Z
    pub fn balanced(n_qubits: usize) -> Option<Self> {
        fn build(index: usize, n_qubits: usize) -> TreeDescription {
            let mut desc = TreeDescription::leaf(index);
            for edge in Edge::ALL {
                let child = 3 * index + 1 + edge.slot();
                if child < n_qubits {
                    desc = desc.with_child(edge, build(child, n_qubits));
                }
            }
            desc
        }
        (n_qubits > 0).then(|| build(0, n_qubits))
    }
}

/// Pre-order node list: `(index, [X, Y, Z] child positions)`
type FlatDescription = Vec<(usize, [Option<usize>; 3])>;

impl TreeDescription {
    fn flatten(&self) -> FlatDescription {
        let mut flat: FlatDescription = Vec::new();
        let mut stack: Vec<(&TreeDescription, Option<(usize, usize)>)> = vec![(self, None)];
        while let Some((desc, link)) = stack.pop() {
            let position = flat.len();
            flat.push((desc.index, [None; 3]));
            if let Some((parent, slot)) = link {
                flat[parent].1[slot] = Some(position);
            }
            for slot in (0..3).rev() {
                if let Some(child) = desc.branches[slot].as_deref() {
                    stack.push((child, Some((position, slot))));
                }
            }
        }
        flat
    }

    /// Rebuild from a pre-order list; children always follow their parent
    fn from_flat(flat: &[(usize, [Option<usize>; 3])]) -> Option<Self> {
        let mut built: Vec<Option<TreeDescription>> = (0..flat.len()).map(|_| None).collect();
        for (position, &(index, children)) in flat.iter().enumerate().rev() {
            let mut desc = TreeDescription::leaf(index);
            for (slot, child) in children.into_iter().enumerate() {
                if let Some(child) = child {
                    desc.branches[slot] = built[child].take().map(Box::new);
                }
            }
            built[position] = Some(desc);
        }
        built.first_mut().and_then(Option::take)
    }
}

impl Drop for TreeDescription {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TreeDescription>> =
            self.branches.iter_mut().filter_map(Option::take).collect();
        while let Some(mut desc) = stack.pop() {
            stack.extend(desc.branches.iter_mut().filter_map(Option::take));
        }
    }
}

impl Clone for TreeDescription {
    fn clone(&self) -> Self {
        Self::from_flat(&self.flatten()).unwrap_or_else(|| Self::leaf(self.index))
    }
}

impl PartialEq for TreeDescription {
    fn eq(&self, other: &Self) -> bool {
        self.flatten() == other.flatten()
    }
}

impl Eq for TreeDescription {}

impl fmt::Debug for TreeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TreeDescription")
            .field(&format_args!("{self}"))
            .finish()
    }
}

enum Token<'a> {
    Node(&'a TreeDescription),
    Text(&'static str),
}

impl fmt::Display for TreeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Token::Node(self)];
        while let Some(token) = stack.pop() {
            let desc = match token {
                Token::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Token::Node(desc) => desc,
            };
            write!(f, "{}", desc.index)?;
            if desc.branches.iter().all(Option::is_none) {
                continue;
            }
            f.write_str("(")?;
            stack.push(Token::Text(")"));
            for slot in (0..3).rev() {
                stack.push(match desc.branches[slot].as_deref() {
                    Some(child) => Token::Node(child),
                    None => Token::Text("-"),
                });
                if slot > 0 {
                    stack.push(Token::Text(","));
                }
            }
        }
        Ok(())
    }
}

/// What went wrong while reading a description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionErrorKind {
    /// Input ended inside a description
    UnexpectedEnd,
    /// Character not allowed at this point
    UnexpectedChar(char),
    /// Digits that do not fit a node index
    InvalidIndex(String),
    /// Characters left over after a complete description
    TrailingInput,
}

impl fmt::Display for DescriptionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of input"),
            Self::UnexpectedChar(c) => write!(f, "unexpected character '{c}'"),
            Self::InvalidIndex(s) => write!(f, "invalid node index '{s}'"),
            Self::TrailingInput => write!(f, "trailing input after description"),
        }
    }
}

/// Parse failure with the byte offset it occurred at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tree description error at position {position}: {kind}")]
pub struct DescriptionParseError {
    /// Byte offset into the input
    pub position: usize,
    /// Failure kind
    pub kind: DescriptionErrorKind,
}

struct DescriptionParser<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> DescriptionParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            position: 0,
        }
    }

    fn error(&self, kind: DescriptionErrorKind) -> DescriptionParseError {
        DescriptionParseError {
            position: self.position,
            kind,
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .bytes
            .get(self.position)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.position += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.bytes.get(self.position).copied()
    }

    fn expect(&mut self, expected: u8) -> Result<(), DescriptionParseError> {
        match self.peek() {
            Some(b) if b == expected => {
                self.position += 1;
                Ok(())
            }
            Some(b) => Err(self.error(DescriptionErrorKind::UnexpectedChar(b as char))),
            None => Err(self.error(DescriptionErrorKind::UnexpectedEnd)),
        }
    }

    fn parse_index(&mut self) -> Result<usize, DescriptionParseError> {
        match self.peek() {
            Some(b) if b.is_ascii_digit() => {}
            Some(b) => return Err(self.error(DescriptionErrorKind::UnexpectedChar(b as char))),
            None => return Err(self.error(DescriptionErrorKind::UnexpectedEnd)),
        }
        let start = self.position;
        while self
            .bytes
            .get(self.position)
            .is_some_and(|b| b.is_ascii_digit())
        {
            self.position += 1;
        }
        let digits = String::from_utf8_lossy(&self.bytes[start..self.position]).into_owned();
        digits.parse().map_err(|_| DescriptionParseError {
            position: start,
            kind: DescriptionErrorKind::InvalidIndex(digits),
        })
    }

    /// Read one node; a `(` opens it on `open` instead of returning it
    fn node_or_open(
        &mut self,
        open: &mut Vec<(TreeDescription, usize)>,
    ) -> Result<Option<TreeDescription>, DescriptionParseError> {
        let node = TreeDescription::leaf(self.parse_index()?);
        if self.peek() == Some(b'(') {
            self.position += 1;
            open.push((node, 0));
            return Ok(None);
        }
        Ok(Some(node))
    }

    fn parse_tree(&mut self) -> Result<TreeDescription, DescriptionParseError> {
        // Open nodes with the number of branch slots read so far.
        let mut open: Vec<(TreeDescription, usize)> = Vec::new();
        let mut finished = self.node_or_open(&mut open)?;
        loop {
            if let Some(node) = finished.take() {
                match open.last_mut() {
                    Some((parent, slot)) => {
                        parent.branches[*slot] = Some(Box::new(node));
                        *slot += 1;
                    }
                    None => return Ok(node),
                }
            }
            let slot = match open.last_mut() {
                Some((_, slot)) => slot,
                None => return Err(self.error(DescriptionErrorKind::UnexpectedEnd)),
            };
            if *slot == 3 {
                self.expect(b')')?;
                finished = open.pop().map(|(node, _)| node);
                continue;
            }
            if *slot > 0 {
                self.expect(b',')?;
            }
            if self.peek() == Some(b'-') {
                self.position += 1;
                *slot += 1;
                continue;
            }
            finished = self.node_or_open(&mut open)?;
        }
    }

    fn finish(&mut self) -> Result<(), DescriptionParseError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error(DescriptionErrorKind::TrailingInput)),
        }
    }
}

impl FromStr for TreeDescription {
    type Err = DescriptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = DescriptionParser::new(s);
        let desc = parser.parse_tree()?;
        parser.finish()?;
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_node_tree() {
        let desc: TreeDescription = "0(1,-,-)".parse().unwrap();
        assert_eq!(desc.index(), 0);
        assert_eq!(desc.branch(Edge::X).map(TreeDescription::index), Some(1));
        assert!(desc.branch(Edge::Y).is_none());
        assert!(desc.branch(Edge::Z).is_none());
    }

    #[test]
    fn test_parse_with_whitespace_and_explicit_leaves() {
        let desc: TreeDescription = " 2 ( 0(-,-,-) , - , 1 ) ".parse().unwrap();
        assert_eq!(desc.to_string(), "2(0,-,1)");
    }

    #[test]
    fn test_display_round_trips() {
        let text = "0(1(-,3,-),2,4(5,-,6))";
        let desc: TreeDescription = text.parse().unwrap();
        assert_eq!(desc.to_string(), text);
    }

    #[test]
    fn test_deep_chain_round_trips_and_drops() {
        let n = 100_000;
        let desc = TreeDescription::parity(n).unwrap();
        let text = desc.to_string();
        let parsed: TreeDescription = text.parse().unwrap();
        assert_eq!(parsed, desc);
        let copy = parsed.clone();
        assert_eq!(copy.len(), n);
        drop(parsed);
        drop(desc);
        assert_eq!(copy.indices().last(), Some(&(n - 1)));
    }

    #[test]
    fn test_clone_and_eq_follow_structure() {
        let desc: TreeDescription = "0(1(-,3,-),2,-)".parse().unwrap();
        assert_eq!(desc.clone(), desc);
        let moved: TreeDescription = "0(1(-,-,3),2,-)".parse().unwrap();
        assert_ne!(moved, desc);
        assert_eq!(format!("{:?}", desc), "TreeDescription(0(1(-,3,-),2,-))");
    }

    #[test]
    fn test_parse_errors() {
        let err = "0(1,-)".parse::<TreeDescription>().unwrap_err();
        assert_eq!(err.kind, DescriptionErrorKind::UnexpectedChar(')'));
        assert_eq!(err.position, 5);

        let err = "0(1,-,".parse::<TreeDescription>().unwrap_err();
        assert_eq!(err.kind, DescriptionErrorKind::UnexpectedEnd);

        let err = "0 1".parse::<TreeDescription>().unwrap_err();
        assert_eq!(err.kind, DescriptionErrorKind::TrailingInput);

        let err = "99999999999999999999999".parse::<TreeDescription>().unwrap_err();
        assert!(matches!(err.kind, DescriptionErrorKind::InvalidIndex(_)));
    }

    #[test]
    fn test_indices_pre_order() {
        let desc: TreeDescription = "0(1(-,3,-),2,4)".parse().unwrap();
        assert_eq!(desc.indices(), vec![0, 1, 3, 2, 4]);
        assert_eq!(desc.len(), 5);
    }

    #[test]
    fn test_validate() {
        let desc: TreeDescription = "0(1,-,2)".parse().unwrap();
        assert!(desc.validate(3).is_ok());
        assert_eq!(desc.validate(4), Err(TreeError::MissingIndex(3)));
        assert_eq!(
            desc.validate(2),
            Err(TreeError::DescriptionIndexOutOfRange { index: 2, n_qubits: 2 })
        );

        let dup: TreeDescription = "0(1,1,-)".parse().unwrap();
        assert_eq!(dup.validate(2), Err(TreeError::DuplicateIndex(1)));
    }

    #[test]
    fn test_standard_layouts() {
        assert_eq!(TreeDescription::jordan_wigner(3).unwrap().to_string(), "0(-,-,1(-,-,2))");
        assert_eq!(TreeDescription::parity(3).unwrap().to_string(), "0(1(2,-,-),-,-)");
        assert_eq!(TreeDescription::balanced(5).unwrap().to_string(), "0(1(4,-,-),2,3)");
        assert!(TreeDescription::jordan_wigner(0).is_none());
        assert!(TreeDescription::balanced(0).is_none());
        for n in 1..20 {
            assert!(TreeDescription::balanced(n).unwrap().validate(n).is_ok());
        }
    }
}
