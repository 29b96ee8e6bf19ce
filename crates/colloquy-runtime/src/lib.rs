//! Dialogue Traversal Engine — cursor-based playback of branching dialogue.
//!
//! A dialogue is a directed graph of `DialogueNode`s: executable lines
//! the player sees (single- or multiple-choice) and conditional branch
//! nodes that silently route between them. A `DialogueCursor` walks the
//! graph one line at a time, resolving conditional chains through the
//! `BranchResolver` against an injected `VariableStore`, and keeps a
//! linear history for back navigation. Branch nodes never appear in the
//! history; the player only ever observes executable lines.
//!
//! The graph is compiled elsewhere and immutable here: one graph can be
//! shared read-only by any number of cursors.

pub mod cursor;
pub mod graph;
pub mod node;
pub mod resolver;

pub use cursor::DialogueCursor;
pub use graph::DialogueGraph;
pub use node::{Choice, ConditionalBranch, DialogueNode, ExecutableDialogue};
pub use resolver::BranchResolver;
