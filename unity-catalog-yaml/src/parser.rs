//! Indentation-driven tree builder
//!
//! Builds a [`Node`] tree from tokenized [`Line`]s using only relative
//! depth. Open nodes live on an explicit stack, so arbitrarily deep
//! documents never recurse. For a line at depth `d` under an open node at
//! depth `p`:
//!
//! - `d <= p` closes the open node and retries the line against its parent
//! - `d == p + 1` adds a child, opening a new list record first when the
//!   line carries a list marker
//! - `d == p + 2` under a group-repeated node reopens the last member of the
//!   current record, so `- _MainTex:` followed by deeper properties nests
//!   those properties under `_MainTex`
//! - anything else is a structural error

use crate::reader::{self, Line};
use tracing::warn;
use unity_catalog_core::{CatalogError, Node, Result};

/// How the parser reacts to a line that fits no structural pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Fail with [`CatalogError::Structure`]
    Strict,
    /// Log a warning and skip the line
    #[default]
    Lenient,
}

/// Parser configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: ParseMode,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
        }
    }

    pub fn lenient() -> Self {
        Self {
            mode: ParseMode::Lenient,
        }
    }
}

/// Structural parser for Unity YAML text
#[derive(Debug, Clone, Default)]
pub struct StructureParser {
    options: ParseOptions,
}

impl StructureParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse document text into a depth-0 root node
    pub fn parse_str(&self, text: &str) -> Result<Node> {
        self.parse_lines(&reader::read_lines(text))
    }

    /// Build the tree from already tokenized lines
    pub fn parse_lines(&self, lines: &[Line]) -> Result<Node> {
        let mut stack = vec![Node::root()];
        let mut position = 0;

        while let Some(line) = lines.get(position) {
            let Some(current) = stack.last_mut() else {
                break;
            };
            let open_depth = current.depth();

            if line.depth <= open_depth {
                // Lines are always at depth 1 or more, so only a non-root
                // frame can be closed here
                if stack.len() > 1 {
                    close_frame(&mut stack);
                } else {
                    self.reject(line, "line is not deeper than the document root")?;
                    position += 1;
                }
                continue;
            }

            if line.depth == open_depth + 1 {
                if line.list_item && !current.open_group() {
                    self.reject(line, "list entry under a node that already has plain children")?;
                    position += 1;
                    continue;
                }
                let child = Node::new(line.name.clone(), line.value.clone(), line.depth);
                if child.value().is_absent() {
                    stack.push(child);
                } else {
                    current.attach(child);
                }
                position += 1;
                continue;
            }

            if line.depth == open_depth + 2 && current.is_group_repeated() {
                let reopenable = current
                    .last_member()
                    .is_some_and(|member| !member.value().is_flow_collection());
                if reopenable && let Some(member) = current.take_last_member() {
                    // The line is retried with the member as the open node
                    stack.push(member);
                    continue;
                }
                self.reject(line, "nested content under a flow value or empty record")?;
                position += 1;
                continue;
            }

            let message = format!(
                "depth {} does not fit under a node at depth {}",
                line.depth, open_depth
            );
            self.reject(line, message)?;
            position += 1;
        }

        while stack.len() > 1 {
            close_frame(&mut stack);
        }
        let mut root = stack.pop().unwrap_or_default();
        root.collapse_scalar_groups();
        Ok(root)
    }

    fn reject<S: Into<String>>(&self, line: &Line, message: S) -> Result<()> {
        let message = message.into();
        match self.options.mode {
            ParseMode::Strict => Err(CatalogError::structure(
                line.number,
                line.content.clone(),
                message,
            )),
            ParseMode::Lenient => {
                warn!(line = line.number, content = %line.content, "skipping line: {}", message);
                Ok(())
            }
        }
    }
}

/// Pop the open node and attach it to the node below it
fn close_frame(stack: &mut Vec<Node>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(mut node) = stack.pop() {
        node.collapse_scalar_groups();
        if let Some(parent) = stack.last_mut() {
            parent.attach(node);
        }
    }
}

/// Parse with default (lenient) options
pub fn parse_str(text: &str) -> Result<Node> {
    StructureParser::new().parse_str(text)
}
