//! 增量式的 LL(1) 预测分析引擎.
//!
//! 调用方 (词法部分) 驱动迭代, 每拿到一个终结符调用一次 [`Parser::feed`],
//! 输入结束时调用 [`Parser::input_complete`] 换取完整的分析树.
//! 引擎本身是纯同步的状态机, 每次调用都运行到消耗掉终结符, 报错或者分析完成为止.

use crate::{
    Terminal, Token,
    error::ParseError,
    table::Table,
    token::{EOF, EPSILON},
    tree::{NodeId, ParseTree},
};

/// 一次 LL(1) 分析会话.
///
/// 持有一个私有的 (符号, 树节点) 栈和正在构建的分析树, 两者只活到本次会话结束.
/// 分析完成之后实例不可复用, 再喂入任何终结符都会得到
/// [`ParseError::AlreadyCompleted`].
#[derive(Debug, Clone)]
pub struct Parser<'t, 'a> {
    table: &'t Table<'a>,
    /// 栈顶在末尾. 栈底是不带节点的 [`EOF`] 哨兵.
    stack: Vec<(Token<'a>, Option<NodeId>)>,
    tree: ParseTree<'a>,
}

impl<'t, 'a> Parser<'t, 'a> {
    #[must_use]
    pub fn new(table: &'t Table<'a>) -> Self {
        let start = table.symbol_start();
        let tree = ParseTree::new(start.into());
        let root = tree.root();
        Self {
            table,
            stack: vec![(EOF.into(), None), (start.into(), Some(root))],
            tree,
        }
    }

    /// 喂入下一个输入终结符, 驱动若干次预测, 直到它被匹配掉或者出错.
    ///
    /// 喂入 [`EOF`] 表示输入结束, 成功时返回 `Some(完整的分析树)`;
    /// 其他终结符被消耗之后返回 `None`, 控制权交还调用方.
    ///
    /// # Errors
    /// - [`ParseError::UnexpectedTerminal`] / [`ParseError::NoProduction`]:
    ///   可恢复. 栈被原样推回, 这个输入终结符相当于被丢弃,
    ///   调用方可以继续喂入后续终结符重试.
    /// - [`ParseError::AlreadyCompleted`]: 分析已经结束, 使用错误.
    pub fn feed(&mut self, terminal: Terminal<'a>) -> Result<Option<ParseTree<'a>>, ParseError> {
        loop {
            let Some((top, node)) = self.stack.pop() else {
                return Err(ParseError::AlreadyCompleted);
            };

            // 匹配: 栈顶终结符与输入一致.
            if top == Token::Terminal(terminal) {
                if let Some(node) = node {
                    // 把带位置信息的输入符号写回节点.
                    self.tree.set_symbol(node, terminal.into());
                }
                if terminal == EOF {
                    let tree = std::mem::replace(&mut self.tree, ParseTree::new(EOF.into()));
                    return Ok(Some(tree));
                }
                return Ok(None);
            }

            let variable = match top {
                Token::Terminal(expected) => {
                    // 推回栈顶再报错, 出错的输入终结符相当于被跳过,
                    // 下一次 feed 会拿后续输入重试这个符号.
                    self.stack.push((top, node));
                    return Err(ParseError::UnexpectedTerminal {
                        expected: expected.as_str().to_string(),
                        found: terminal.as_str().to_string(),
                        loc: terminal.loc(),
                    });
                }
                Token::NonTerminal(nt) => nt,
            };

            // 预测.
            let Some(production) = self.table.get(variable, terminal) else {
                self.stack.push((top, node));
                return Err(ParseError::NoProduction {
                    variable: variable.as_str().to_string(),
                    terminal: terminal.as_str().to_string(),
                    loc: terminal.loc(),
                });
            };
            // unwrap: 只有栈底的 EOF 条目不带节点, 非终结符一定带节点.
            let parent = node.unwrap();

            // 空备选: 挂一个 ε 叶子, 不压栈, 也不消耗当前输入.
            if production == [Token::Terminal(EPSILON)] {
                let leaf = self.tree.add_node(EPSILON.into());
                self.tree.add_child(parent, leaf);
                continue;
            }

            // 为右部的每个符号建节点, 按从左到右挂为子节点,
            // 逆序压栈让最左的符号处在栈顶.
            let mut entries = Vec::with_capacity(production.len());
            for symbol in production {
                let child = self.tree.add_node(*symbol);
                self.tree.add_child(parent, child);
                entries.push((*symbol, Some(child)));
            }
            self.stack.extend(entries.into_iter().rev());
        }
    }

    /// 宣告输入结束, 等价于喂入 [`EOF`], 成功时返回完整的分析树.
    ///
    /// # Errors
    /// 见 [`Parser::feed`].
    pub fn input_complete(&mut self) -> Result<ParseTree<'a>, ParseError> {
        match self.feed(EOF)? {
            Some(tree) => Ok(tree),
            // feed(EOF) 只会以完成或者报错结束.
            None => unreachable!(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        Grammar, Terminal,
        attributes::Attributes,
        error::ParseError,
        parser::Parser,
        table::Table,
        token::{EOF, Loc},
    };
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;

    fn parens_table(bump: &Bump) -> Table<'_> {
        let grammar = Grammar::from_cfg("S -> ( S ) | a", "S".into(), bump).unwrap();
        let attrs = Attributes::of(&grammar);
        Table::build_from(&grammar, &attrs).unwrap()
    }

    #[test]
    fn end_to_end_parse() {
        let bump = Bump::new();
        let table = parens_table(&bump);
        let mut parser = Parser::new(&table);

        for term in ["(", "a", ")"] {
            assert_eq!(parser.feed(term.into()), Ok(None));
        }
        let tree = parser.input_complete().unwrap();
        assert_eq!(tree.to_string(), "S -> [(, S -> [a], )]");

        // 完成之后实例不可复用.
        assert_eq!(parser.feed("a".into()), Err(ParseError::AlreadyCompleted));
        assert_eq!(parser.input_complete(), Err(ParseError::AlreadyCompleted));
    }

    #[test]
    fn matched_nodes_carry_input_locations() {
        let bump = Bump::new();
        let table = parens_table(&bump);
        let mut parser = Parser::new(&table);

        parser.feed(Terminal::from("a").at(Loc::new(2, 5))).unwrap();
        let tree = parser.input_complete().unwrap();
        let leaf = tree.children(tree.root())[0];
        let term = *tree.symbol(leaf).as_term().unwrap();
        assert_eq!(term, "a".into());
        assert_eq!(term.loc(), Some(Loc::new(2, 5)));
    }

    #[test]
    fn unexpected_terminal_is_skippable() {
        let bump = Bump::new();
        let table = parens_table(&bump);
        let mut parser = Parser::new(&table);

        parser.feed("(".into()).unwrap();
        parser.feed("a".into()).unwrap();
        // 栈顶现在期待 `)`, 喂入无关的 x 报错但不破坏栈.
        let err = parser
            .feed(Terminal::from("x").at(Loc::new(1, 9)))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedTerminal {
                expected: ")".to_string(),
                found: "x".to_string(),
                loc: Some(Loc::new(1, 9)),
            }
        );
        assert!(err.is_recoverable());
        // 后续输入重新对上, 分析正常完成.
        parser.feed(")".into()).unwrap();
        let tree = parser.input_complete().unwrap();
        assert_eq!(tree.to_string(), "S -> [(, S -> [a], )]");
    }

    #[test]
    fn single_bad_terminal_causes_single_error() {
        let bump = Bump::new();
        let grammar = Grammar::from_cfg("S -> a S | a", "S".into(), &bump)
            .unwrap()
            .left_factored()
            .unwrap();
        let attrs = Attributes::of(&grammar);
        let table = Table::build_from(&grammar, &attrs).unwrap();
        let mut parser = Parser::new(&table);

        assert_eq!(parser.feed("a".into()), Ok(None));
        let err = parser.feed("x".into()).unwrap_err();
        assert_eq!(
            err,
            ParseError::NoProduction {
                variable: "Sprime".to_string(),
                terminal: "x".to_string(),
                loc: None,
            }
        );
        // 跳过出错的 x 继续喂, 周围的合法输入照常成树.
        assert_eq!(parser.feed("a".into()), Ok(None));
        let tree = parser.input_complete().unwrap();
        assert_eq!(
            tree.to_string(),
            "S -> [a, Sprime -> [S -> [a, Sprime -> [E]]]]"
        );
    }

    #[test]
    fn eof_alone_on_nullable_start_is_an_error_free_empty_tree() {
        let bump = Bump::new();
        let grammar = Grammar::from_cfg("S -> a S | E", "S".into(), &bump).unwrap();
        let attrs = Attributes::of(&grammar);
        let table = Table::build_from(&grammar, &attrs).unwrap();
        let mut parser = Parser::new(&table);

        let tree = parser.input_complete().unwrap();
        assert_eq!(tree.to_string(), "S -> [E]");
    }

    #[test]
    fn eof_when_input_is_expected_is_recoverable_usage() {
        let bump = Bump::new();
        let table = parens_table(&bump);
        let mut parser = Parser::new(&table);

        parser.feed("(".into()).unwrap();
        // 还缺内层的 S 和 `)`, 直接宣告结束: 查表失败, 报可恢复错误.
        let err = parser.input_complete().unwrap_err();
        assert_eq!(
            err,
            ParseError::NoProduction {
                variable: "S".to_string(),
                terminal: EOF.as_str().to_string(),
                loc: None,
            }
        );
        assert!(err.is_recoverable());
    }
}
