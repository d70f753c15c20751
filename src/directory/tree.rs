//! FC → COORD → SUBCORD hierarchy built from a flat roster.

use serde::Serialize;
use tracing::warn;

use crate::core::shared::enums::{CommitteeColor, UserRole};
use crate::directory::users::User;

/// Arena-backed forest of users. Node ids are positions in the input roster.
#[derive(Debug, Clone, Default)]
pub struct UserTree {
    nodes: Vec<User>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    orphans: Vec<usize>,
}

/// Nested presentation view of one tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserNode {
    #[serde(flatten)]
    pub user: User,
    pub children: Vec<UserNode>,
}

/// Links every COORD to the first FC and every SUBCORD to the first COORD of
/// the same colour, in input order. Everyone else is a root.
///
/// A COORD with no FC, or a SUBCORD with no matching COORD (or no colour at
/// all), is attached nowhere and is not a root: it only shows up in
/// [`UserTree::orphans`]. Sub-coordinators under an orphaned coordinator stay
/// attached to it and are therefore unreachable from the roots as well.
pub fn build_user_tree(users: Vec<User>) -> UserTree {
    let mut children = vec![Vec::new(); users.len()];
    let mut roots = Vec::new();
    let mut orphans = Vec::new();

    for (idx, user) in users.iter().enumerate() {
        let parent = match user.role {
            UserRole::Subcord => Some(first_coordinator_with(&users, user.colour)),
            UserRole::Coord => Some(first_with_role(&users, UserRole::Fc)),
            _ => None,
        };

        match parent {
            None => roots.push(idx),
            Some(Some(parent_idx)) => children[parent_idx].push(idx),
            Some(None) => {
                warn!(
                    "Dropping {} {} ({}) from hierarchy: no parent found",
                    user.role, user.name, user.uid
                );
                orphans.push(idx);
            }
        }
    }

    UserTree {
        nodes: users,
        children,
        roots,
        orphans,
    }
}

fn first_with_role(users: &[User], role: UserRole) -> Option<usize> {
    users.iter().position(|u| u.role == role)
}

fn first_coordinator_with(users: &[User], colour: Option<CommitteeColor>) -> Option<usize> {
    let colour = colour?;
    users
        .iter()
        .position(|u| u.role == UserRole::Coord && u.colour == Some(colour))
}

impl UserTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: usize) -> Option<&User> {
        self.nodes.get(id)
    }

    pub fn root_ids(&self) -> &[usize] {
        &self.roots
    }

    pub fn child_ids(&self, id: usize) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn orphan_ids(&self) -> &[usize] {
        &self.orphans
    }

    pub fn roots(&self) -> impl Iterator<Item = &User> + '_ {
        self.roots.iter().map(|&id| &self.nodes[id])
    }

    pub fn children_of(&self, id: usize) -> impl Iterator<Item = &User> + '_ {
        self.child_ids(id).iter().map(|&child| &self.nodes[child])
    }

    pub fn orphans(&self) -> impl Iterator<Item = &User> + '_ {
        self.orphans.iter().map(|&id| &self.nodes[id])
    }

    /// First node with this uid; the roster itself may contain duplicates.
    pub fn find(&self, uid: &str) -> Option<usize> {
        self.nodes.iter().position(|u| u.uid == uid)
    }

    pub fn to_nested(&self) -> Vec<UserNode> {
        self.roots.iter().map(|&id| self.nested_node(id)).collect()
    }

    fn nested_node(&self, id: usize) -> UserNode {
        UserNode {
            user: self.nodes[id].clone(),
            children: self
                .child_ids(id)
                .iter()
                .map(|&child| self.nested_node(child))
                .collect(),
        }
    }
}
