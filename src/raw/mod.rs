mod arena;
mod handle;
mod identity_index;
mod node;
mod ranking_tree;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use identity_index::IdentityIndex;
pub(crate) use ranking_tree::{Iter as RankingIter, RawRankingTree};
