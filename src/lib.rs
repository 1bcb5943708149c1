pub mod attributes;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod table;
pub mod token;
pub mod transform;
pub mod tree;

pub use attributes::Attributes;
pub use grammar::{Grammar, Production};
pub use parser::Parser;
pub use table::Table;
pub use token::{EOF, EPSILON, Loc, NonTerminal, Terminal, Token};
pub use tree::{NodeId, ParseTree};
