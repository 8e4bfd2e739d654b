//! Stack-based parser for the FortiGate command grammar.
//!
//! ```text
//! config      = comment* block*
//! block       = "config" word+ NL (entry* | item*) "end"
//! entry       = "edit" word NL item* ("next" | "end")   ; "end" only inside `config vdom`
//! item        = "set" word word+ NL | "unset" word NL | block
//! word        = quoted-string | bare-word
//! ```
//!
//! Nesting comes only from the keywords; indentation is ignored.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::{ParseError, ParseResult};
use crate::header::ConfigHeader;
use crate::lexer::{Lexer, Line};
use crate::tree::{
    Children, ConfigNode, ConfigObject, ConfigRoot, ConfigTable, Container, SetCommand,
    UnsetCommand,
};

const VDOM: &str = "vdom";
const GLOBAL: &str = "global";

/// Parse a FortiGate configuration export.
pub fn parse(text: &str) -> ParseResult<Config> {
    let mut lexer = Lexer::new(text);
    let mut parser = Parser::default();

    for line in lexer.by_ref() {
        parser.feed(&line?)?;
    }

    let header = ConfigHeader::new(lexer.into_header());
    let config = parser.finish(header)?;
    debug!(
        sections = config.root().len(),
        vdoms = config.vdoms().len(),
        "parsed configuration"
    );
    Ok(config)
}

/// Read and parse a FortiGate configuration file.
pub fn parse_file(path: &Path) -> ParseResult<Config> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Where the parser stands, from the innermost open frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Top,
    Undetermined,
    InObject,
    InTable,
    InEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    // Opened, no statement seen yet. Closes as an empty object.
    Undetermined,
    Object,
    Table,
}

#[derive(Debug)]
struct BlockFrame {
    name: String,
    line: usize,
    kind: BlockKind,
    vdom: bool,
    children: Children,
}

impl BlockFrame {
    fn into_node(self) -> ConfigNode {
        match self.kind {
            BlockKind::Table => {
                let entries = self
                    .children
                    .into_values()
                    .filter_map(|node| match node {
                        ConfigNode::Object(entry) => Some(entry),
                        _ => None,
                    })
                    .collect();
                ConfigTable::new(self.name, entries).into()
            }
            BlockKind::Undetermined | BlockKind::Object => {
                ConfigObject::new(self.name, self.children).into()
            }
        }
    }
}

#[derive(Debug)]
struct EntryFrame {
    key: String,
    line: usize,
    children: Children,
}

#[derive(Debug)]
enum Frame {
    Block(BlockFrame),
    Entry(EntryFrame),
}

impl Frame {
    fn describe(&self) -> String {
        match self {
            Frame::Block(block) => format!("config '{}' opened at line {}", block.name, block.line),
            Frame::Entry(entry) => format!("edit '{}' opened at line {}", entry.key, entry.line),
        }
    }
}

#[derive(Debug, Default)]
struct Parser {
    stack: Vec<Frame>,
    top: Children,
    vdoms: IndexMap<String, ConfigRoot>,
    line: usize,
}

impl Parser {
    fn state(&self) -> State {
        match self.stack.last() {
            None => State::Top,
            Some(Frame::Entry(_)) => State::InEntry,
            Some(Frame::Block(block)) => match block.kind {
                BlockKind::Undetermined => State::Undetermined,
                BlockKind::Object => State::InObject,
                BlockKind::Table => State::InTable,
            },
        }
    }

    fn feed(&mut self, line: &Line) -> ParseResult<()> {
        self.line = line.number;
        let keyword = line.keyword();
        trace!(line = line.number, keyword, state = ?self.state(), "statement");

        match keyword {
            "config" => self.open_block(line),
            "edit" => self.open_entry(line),
            "next" => self.close_entry(line.number),
            "end" => self.close_block(line.number),
            "set" => match line.args() {
                [name, values @ ..] if !values.is_empty() => {
                    let node = SetCommand::new(name.text.clone(), values.to_vec());
                    self.add(line.number, keyword, node.into())
                }
                _ => Err(ParseError::syntax(
                    line.number,
                    format!("'set' expects a name and at least one value: '{line}'"),
                )),
            },
            "unset" => match line.args() {
                [name] => {
                    let node = UnsetCommand::new(name.text.clone());
                    self.add(line.number, keyword, node.into())
                }
                _ => Err(ParseError::syntax(
                    line.number,
                    format!("'unset' expects exactly one name: '{line}'"),
                )),
            },
            other => Err(ParseError::syntax(
                line.number,
                format!("unexpected keyword '{other}'"),
            )),
        }
    }

    /// Body that receives a `set`, `unset` or nested `config` statement,
    /// settling an undetermined block as an object.
    fn body(&mut self, number: usize, keyword: &str) -> ParseResult<&mut Children> {
        match self.stack.last_mut() {
            None => Err(ParseError::syntax(
                number,
                format!("'{keyword}' outside of a config block"),
            )),
            Some(Frame::Entry(entry)) => Ok(&mut entry.children),
            Some(Frame::Block(block)) => match block.kind {
                BlockKind::Table => Err(ParseError::syntax(
                    number,
                    format!(
                        "cannot mix '{keyword}' with edit entries in '{}'",
                        block.name
                    ),
                )),
                _ if block.vdom => Err(ParseError::syntax(
                    number,
                    format!("'{keyword}' in 'config vdom' must be within an edit entry"),
                )),
                BlockKind::Undetermined | BlockKind::Object => {
                    block.kind = BlockKind::Object;
                    Ok(&mut block.children)
                }
            },
        }
    }

    fn add(&mut self, number: usize, keyword: &str, node: ConfigNode) -> ParseResult<()> {
        let body = self.body(number, keyword)?;
        insert(body, node);
        Ok(())
    }

    fn attach(&mut self, node: ConfigNode) {
        let body = match self.stack.last_mut() {
            Some(Frame::Block(block)) => &mut block.children,
            Some(Frame::Entry(entry)) => &mut entry.children,
            None => &mut self.top,
        };
        insert(body, node);
    }

    fn open_block(&mut self, line: &Line) -> ParseResult<()> {
        let args = line.args();
        if args.is_empty() {
            return Err(ParseError::syntax(line.number, "'config' expects a name"));
        }
        let name = args
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let vdom = self.stack.is_empty() && name == VDOM;
        if !self.stack.is_empty() {
            self.body(line.number, "config")?;
        }

        debug!(line = line.number, block = %name, depth = self.stack.len(), "open config block");
        self.stack.push(Frame::Block(BlockFrame {
            name,
            line: line.number,
            kind: BlockKind::Undetermined,
            vdom,
            children: Children::new(),
        }));
        Ok(())
    }

    fn open_entry(&mut self, line: &Line) -> ParseResult<()> {
        let [key] = line.args() else {
            return Err(ParseError::syntax(
                line.number,
                format!("'edit' expects exactly one key: '{line}'"),
            ));
        };

        match self.stack.last_mut() {
            None => {
                return Err(ParseError::syntax(
                    line.number,
                    "'edit' outside of a config block",
                ));
            }
            Some(Frame::Entry(entry)) => {
                return Err(ParseError::syntax(
                    line.number,
                    format!("'edit' inside unclosed entry '{}' (missing 'next')", entry.key),
                ));
            }
            Some(Frame::Block(block)) => {
                if block.kind == BlockKind::Object {
                    return Err(ParseError::syntax(
                        line.number,
                        format!("cannot mix edit entries with settings in '{}'", block.name),
                    ));
                }
                block.kind = BlockKind::Table;
            }
        }

        self.stack.push(Frame::Entry(EntryFrame {
            key: key.text.clone(),
            line: line.number,
            children: Children::new(),
        }));
        Ok(())
    }

    fn close_entry(&mut self, number: usize) -> ParseResult<()> {
        match self.stack.pop() {
            Some(Frame::Entry(entry)) => {
                self.attach(ConfigObject::new(entry.key, entry.children).into());
                Ok(())
            }
            _ => Err(ParseError::syntax(number, "'next' without a matching 'edit'")),
        }
    }

    fn close_block(&mut self, number: usize) -> ParseResult<()> {
        match self.stack.pop() {
            None => Err(ParseError::syntax(number, "'end' without a matching 'config'")),
            Some(Frame::Entry(entry)) => {
                // VDOM entries are closed by the block's `end` in real exports.
                if matches!(self.stack.last(), Some(Frame::Block(block)) if block.vdom) {
                    self.attach(ConfigObject::new(entry.key, entry.children).into());
                    return self.close_block(number);
                }
                Err(ParseError::syntax(
                    number,
                    format!("'end' inside unclosed entry '{}' (missing 'next')", entry.key),
                ))
            }
            Some(Frame::Block(block)) if block.vdom => {
                for (name, node) in block.children {
                    if let ConfigNode::Object(entry) = node {
                        debug!(vdom = %name, settings = entry.len(), "vdom entry");
                        self.vdoms.insert(name, ConfigRoot::from(entry));
                    }
                }
                Ok(())
            }
            Some(Frame::Block(block)) => {
                self.attach(block.into_node());
                Ok(())
            }
        }
    }

    fn finish(self, header: ConfigHeader) -> ParseResult<Config> {
        if let Some(frame) = self.stack.last() {
            return Err(ParseError::UnexpectedEof {
                line: self.line,
                open: frame.describe(),
            });
        }

        if self.vdoms.is_empty() {
            return Ok(Config::new(
                header,
                ConfigRoot::new(GLOBAL, self.top),
                self.vdoms,
            ));
        }

        let mut top = self.top;
        let root = match top.shift_remove(GLOBAL) {
            Some(ConfigNode::Object(global)) => ConfigRoot::from(global),
            Some(other) => {
                warn!(kind = other.kind(), "'config global' is not an object block, ignoring it");
                ConfigRoot::new(GLOBAL, Children::new())
            }
            None => ConfigRoot::new(GLOBAL, Children::new()),
        };
        for key in top.keys() {
            warn!(block = %key, "ignoring top-level block outside 'config global' in a VDOM configuration");
        }

        Ok(Config::new(header, root, self.vdoms))
    }
}

// Last definition wins and keeps the first position.
fn insert(children: &mut Children, node: ConfigNode) {
    let key = node.name().to_string();
    if children.contains_key(&key) {
        trace!(key = %key, "redefined");
    }
    children.insert(key, node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn run(text: &str) -> (Parser, ParseResult<()>) {
        let mut parser = Parser::default();
        let mut result = Ok(());
        for line in tokenize(text).expect("tokenize") {
            result = parser.feed(&line);
            if result.is_err() {
                break;
            }
        }
        (parser, result)
    }

    #[test]
    fn block_kind_is_settled_by_first_statement() {
        let (parser, result) = run("config system interface\n");
        assert!(result.is_ok());
        assert_eq!(parser.state(), State::Undetermined);

        let (parser, _) = run("config system interface\nedit \"wan1\"\n");
        assert_eq!(parser.state(), State::InEntry);

        let (parser, _) = run("config system interface\nedit \"wan1\"\nnext\n");
        assert_eq!(parser.state(), State::InTable);

        let (parser, _) = run("config system global\nset a 1\n");
        assert_eq!(parser.state(), State::InObject);

        let (parser, _) = run("config a\nend\n");
        assert_eq!(parser.state(), State::Top);
    }

    #[test]
    fn edit_after_settings_is_a_mixed_body() {
        let (_, result) = run("config a\nset x 1\nedit 1\n");
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("cannot mix"));
    }

    #[test]
    fn settings_after_edit_entries_are_a_mixed_body() {
        let (_, result) = run("config a\nedit 1\nnext\nset x 1\n");
        assert!(result.unwrap_err().to_string().contains("cannot mix 'set'"));
    }

    #[test]
    fn nested_edit_without_next_is_rejected() {
        let (_, result) = run("config a\nedit 1\nedit 2\n");
        assert!(result.unwrap_err().to_string().contains("missing 'next'"));
    }

    #[test]
    fn end_inside_open_entry_is_rejected_outside_vdom() {
        let (_, result) = run("config a\nedit 1\nend\n");
        assert!(result.unwrap_err().to_string().contains("unclosed entry '1'"));
    }

    #[test]
    fn argument_counts_are_checked() {
        for text in [
            "config\n",
            "config a\nset x\n",
            "config a\nunset\n",
            "config a\nunset x y\n",
            "config a\nedit\n",
            "config a\nedit 1 2\n",
        ] {
            let (_, result) = run(text);
            assert!(result.is_err(), "expected failure for {text:?}");
        }
    }

    #[test]
    fn argument_errors_quote_the_offending_line() {
        for (text, line, needle) in [
            ("config a\nset x\n", 2, "'set x'"),
            ("config a\nunset x \"y z\"\n", 2, "'unset x \"y z\"'"),
            ("config a\nedit 1 2\n", 2, "'edit 1 2'"),
        ] {
            let (_, result) = run(text);
            let err = result.unwrap_err();
            assert_eq!(err.line(), Some(line));
            let message = err.to_string();
            assert!(message.contains(needle), "{text:?} gave {message}");
        }
    }

    #[test]
    fn statements_at_top_level_are_rejected() {
        for (text, needle) in [
            ("set a 1\n", "outside of a config block"),
            ("unset a\n", "outside of a config block"),
            ("edit 1\n", "outside of a config block"),
            ("next\n", "without a matching 'edit'"),
            ("end\n", "without a matching 'config'"),
            ("show full-configuration\n", "unexpected keyword 'show'"),
        ] {
            let (_, result) = run(text);
            let message = result.unwrap_err().to_string();
            assert!(message.contains(needle), "{text:?} gave {message}");
        }
    }

    #[test]
    fn unclosed_block_fails_at_end_of_input() {
        let err = parse("config system global\n    set a 1\n").unwrap_err();
        match err {
            ParseError::UnexpectedEof { line, open } => {
                assert_eq!(line, 2);
                assert_eq!(open, "config 'system global' opened at line 1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn vdom_block_rejects_direct_settings() {
        let err = parse("config vdom\nset a 1\nend\n").unwrap_err();
        assert!(err.to_string().contains("'config vdom'"));
    }
}
