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

//! A UI-agnostic description of a node's controls.

use std::fmt;

/// The sink a [`SceneNode`](crate::SceneNode) describes its controls into.
///
/// How the description is shown (widgets, a terminal, nothing) is up to the
/// implementor. Key bindings described here are delivered back to the node via
/// [`SceneNode::handle_key`](crate::SceneNode::handle_key).
pub trait ControlPanel {
    /// Starts the section that belongs to one node.
    fn begin_section(&mut self, title: &str);

    /// Breaks the current row of controls.
    fn new_line(&mut self);

    /// Declares a button triggered by the key combination `keys`.
    fn key_triggered_button(&mut self, description: &str, keys: &[&str]);

    /// Shows a line of text that the node refreshes.
    fn live_string(&mut self, text: &str);
}

/// One recorded control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEntry {
    /// A node's section header.
    Section(String),
    /// A row break.
    NewLine,
    /// A key-triggered button.
    Button {
        /// What the button does.
        description: String,
        /// The key combination that triggers it.
        keys: Vec<String>,
    },
    /// A text line.
    LiveString(String),
}

/// A [`ControlPanel`] that records what it is told, in order.
#[derive(Debug, Clone, Default)]
pub struct PanelRecorder {
    entries: Vec<PanelEntry>,
}

impl PanelRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded entries.
    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    /// The section titles, in order.
    pub fn sections(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                PanelEntry::Section(title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl ControlPanel for PanelRecorder {
    fn begin_section(&mut self, title: &str) {
        self.entries.push(PanelEntry::Section(title.to_string()));
    }

    fn new_line(&mut self) {
        self.entries.push(PanelEntry::NewLine);
    }

    fn key_triggered_button(&mut self, description: &str, keys: &[&str]) {
        self.entries.push(PanelEntry::Button {
            description: description.to_string(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        });
    }

    fn live_string(&mut self, text: &str) {
        self.entries.push(PanelEntry::LiveString(text.to_string()));
    }
}

/// Renders the panel as plain text, one section per line group.
impl fmt::Display for PanelRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut row_open = false;
        for entry in &self.entries {
            match entry {
                PanelEntry::Section(title) => {
                    if row_open {
                        writeln!(f)?;
                    }
                    writeln!(f, "[{title}]")?;
                    row_open = false;
                }
                PanelEntry::NewLine => {
                    writeln!(f)?;
                    row_open = false;
                }
                PanelEntry::Button { description, keys } => {
                    let combo = keys
                        .iter()
                        .map(|k| if k == " " { "Space" } else { k.as_str() })
                        .collect::<Vec<_>>()
                        .join("+");
                    write!(f, "({combo}) {description} ")?;
                    row_open = true;
                }
                PanelEntry::LiveString(text) => {
                    if row_open {
                        writeln!(f)?;
                    }
                    writeln!(f, "{text}")?;
                    row_open = false;
                }
            }
        }
        if row_open {
            writeln!(f)?;
        }
        Ok(())
    }
}
