// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The scene graph: drawable nodes and their breadth-first traversal.

use crate::canvas::Canvas;
use crate::control_panel::ControlPanel;
use std::collections::VecDeque;
use tessera_core::renderer::{ProgramState, RenderError};

/// A node of the scene graph.
///
/// The render loop calls [`display`](Self::display) once per frame on every node,
/// parents before children, siblings in order. A node may change the shared
/// [`ProgramState`] (camera, projection, lights) and issue draw calls through the
/// canvas. Nodes earlier in the traversal run first, so camera and light setup
/// belongs in nodes that precede the geometry that depends on it.
pub trait SceneNode {
    /// A short title, used for control-panel sections and logs.
    fn name(&self) -> &str;

    /// Updates and draws this node for the current frame.
    fn display(&mut self, canvas: &mut Canvas, state: &mut ProgramState) -> Result<(), RenderError>;

    /// The nodes below this one.
    fn children(&self) -> &[Box<dyn SceneNode>] {
        &[]
    }

    /// Mutable access to the nodes below this one.
    fn children_mut(&mut self) -> &mut [Box<dyn SceneNode>] {
        &mut []
    }

    /// Describes this node's controls.
    fn make_control_panel(&mut self, _panel: &mut dyn ControlPanel) {}

    /// Reacts to a key going down (`pressed`) or up. Returns `true` if the key was used.
    fn handle_key(&mut self, _key: &str, _pressed: bool) -> bool {
        false
    }
}

/// Lists the index path of every node reachable from `roots`, breadth first.
///
/// A path holds the root index followed by one child index per level. For roots
/// `[A(B, C), D]` the order is `A, D, B, C`.
pub fn flatten_paths(roots: &[Box<dyn SceneNode>]) -> Vec<Vec<usize>> {
    let mut order = Vec::new();
    let mut open: VecDeque<(Vec<usize>, &dyn SceneNode)> = roots
        .iter()
        .enumerate()
        .map(|(i, node)| (vec![i], node.as_ref()))
        .collect();

    while let Some((path, node)) = open.pop_front() {
        for (i, child) in node.children().iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(i);
            open.push_back((child_path, child.as_ref()));
        }
        order.push(path);
    }
    order
}

/// Follows an index path from `roots`. Returns `None` if any step is out of range.
pub fn node_at_mut<'a>(
    roots: &'a mut [Box<dyn SceneNode>],
    path: &[usize],
) -> Option<&'a mut dyn SceneNode> {
    let (first, rest) = path.split_first()?;
    let mut node: &mut dyn SceneNode = roots.get_mut(*first)?.as_mut();
    for &i in rest {
        node = node.children_mut().get_mut(i)?.as_mut();
    }
    Some(node)
}

/// Number of direct children of the node at `path`, or `None` for an invalid path.
pub(crate) fn child_count(roots: &mut [Box<dyn SceneNode>], path: &[usize]) -> Option<usize> {
    node_at_mut(roots, path).map(|node| node.children().len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A node that draws nothing and only carries children.
    pub(crate) struct Group {
        pub name: &'static str,
        pub children: Vec<Box<dyn SceneNode>>,
    }

    impl Group {
        pub fn leaf(name: &'static str) -> Box<dyn SceneNode> {
            Box::new(Self {
                name,
                children: Vec::new(),
            })
        }

        pub fn with(name: &'static str, children: Vec<Box<dyn SceneNode>>) -> Box<dyn SceneNode> {
            Box::new(Self { name, children })
        }
    }

    impl SceneNode for Group {
        fn name(&self) -> &str {
            self.name
        }

        fn display(&mut self, _: &mut Canvas, _: &mut ProgramState) -> Result<(), RenderError> {
            Ok(())
        }

        fn children(&self) -> &[Box<dyn SceneNode>] {
            &self.children
        }

        fn children_mut(&mut self) -> &mut [Box<dyn SceneNode>] {
            &mut self.children
        }
    }

    fn names(roots: &mut [Box<dyn SceneNode>]) -> Vec<String> {
        flatten_paths(roots)
            .iter()
            .filter_map(|path| node_at_mut(roots, path).map(|n| n.name().to_string()))
            .collect()
    }

    #[test]
    fn breadth_first_order() {
        let mut roots = vec![
            Group::with("A", vec![Group::leaf("B"), Group::leaf("C")]),
            Group::leaf("D"),
        ];
        assert_eq!(names(&mut roots), ["A", "D", "B", "C"]);
        assert_eq!(
            flatten_paths(&roots),
            [vec![0], vec![1], vec![0, 0], vec![0, 1]]
        );
    }

    #[test]
    fn deeper_levels_come_last() {
        let mut roots = vec![
            Group::with("A", vec![Group::with("B", vec![Group::leaf("E")])]),
            Group::with("C", vec![Group::leaf("F")]),
        ];
        assert_eq!(names(&mut roots), ["A", "C", "B", "F", "E"]);
    }

    #[test]
    fn invalid_paths_resolve_to_none() {
        let mut roots = vec![Group::leaf("A")];
        assert!(node_at_mut(&mut roots, &[]).is_none());
        assert!(node_at_mut(&mut roots, &[1]).is_none());
        assert!(node_at_mut(&mut roots, &[0, 0]).is_none());
        assert_eq!(child_count(&mut roots, &[0]), Some(0));
    }
}
