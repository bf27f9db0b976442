use rustc_hash::FxHashMap;

use super::EnvId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub parent: Option<EnvId>,
    pub children: Vec<EnvId>,
}

/// Parent/child index over environments, kept for display and debugging.
///
/// Evaluation never consults it. Inserting an environment whose tail was
/// never inserted is skipped.
#[derive(Clone, Debug)]
pub struct EnvironmentTree {
    root: EnvId,
    nodes: FxHashMap<EnvId, TreeNode>,
}

impl EnvironmentTree {
    pub fn new(root: EnvId) -> Self {
        let mut nodes = FxHashMap::default();
        nodes.insert(root, TreeNode::default());
        EnvironmentTree { root, nodes }
    }

    pub fn root(&self) -> EnvId {
        self.root
    }

    /// Returns `false` when `tail` is unknown or missing.
    pub fn insert(&mut self, env: EnvId, tail: Option<EnvId>) -> bool {
        let Some(parent) = tail else {
            return false;
        };
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        parent_node.children.push(env);
        self.nodes.insert(
            env,
            TreeNode {
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        true
    }

    /// Forget environments for which `keep` is false. Children of a
    /// dropped environment are expected to be dropped with it.
    pub fn retain(&mut self, keep: impl Fn(EnvId) -> bool) {
        self.nodes.retain(|id, _| keep(*id));
        for node in self.nodes.values_mut() {
            node.children.retain(|id| keep(*id));
        }
    }

    pub fn contains(&self, env: EnvId) -> bool {
        self.nodes.contains_key(&env)
    }

    pub fn parent(&self, env: EnvId) -> Option<EnvId> {
        self.nodes.get(&env)?.parent
    }

    pub fn children(&self, env: EnvId) -> &[EnvId] {
        self.nodes.get(&env).map_or(&[], |node| &node.children)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
