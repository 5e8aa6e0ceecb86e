//! Fermionic mode to tree node mapping

use super::TreeError;

/// How logical modes are placed on tree nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeMap {
    /// Mode `m` lives on node `m`
    #[default]
    Identity,
    /// Mode `m` lives on node `permutation[m]`
    Permutation(Vec<usize>),
}

impl ModeMap {
    /// Wrap an optional permutation
    pub fn from_option(permutation: Option<Vec<usize>>) -> Self {
        permutation.map_or(ModeMap::Identity, ModeMap::Permutation)
    }

    /// Node index for `mode`, `None` when the permutation is too short
    #[inline]
    pub fn resolve(&self, mode: usize) -> Option<usize> {
        match self {
            ModeMap::Identity => Some(mode),
            ModeMap::Permutation(permutation) => permutation.get(mode).copied(),
        }
    }

    /// Number of modes covered, `None` for identity
    pub fn len(&self) -> Option<usize> {
        match self {
            ModeMap::Identity => None,
            ModeMap::Permutation(permutation) => Some(permutation.len()),
        }
    }

    /// Whether this is the identity mapping
    pub fn is_identity(&self) -> bool {
        matches!(self, ModeMap::Identity)
    }

    /// Check targets are in `0..n_qubits` and pairwise distinct
    pub fn validate(&self, n_qubits: usize) -> Result<(), TreeError> {
        let ModeMap::Permutation(permutation) = self else {
            return Ok(());
        };
        let mut seen = vec![false; n_qubits];
        for (mode, &target) in permutation.iter().enumerate() {
            let slot = seen
                .get_mut(target)
                .ok_or(TreeError::PermutationOutOfRange { mode, target, n_qubits })?;
            if *slot {
                return Err(TreeError::DuplicateIndex(target));
            }
            *slot = true;
        }
        Ok(())
    }
}
