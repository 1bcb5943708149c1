use bumpalo::Bump;
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use crate::{
    NonTerminal, Terminal, Token,
    error::{Error, ParseProductionError},
    token::EOF,
};

#[derive(Clone)]
pub struct Production<'a> {
    /// 产生式编号, 创建时单调递增分配, 仅用于打印和诊断, 不参与判等.
    id: usize,
    // 产生式 `->` 左侧内容.
    head: NonTerminal<'a>,
    // 产生式 `->` 右侧内容.
    tail: Vec<Token<'a>>,
}

impl Debug for Production<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Production")
            .field(&format_args!(
                "({}) {:?} -> {}",
                self.id,
                self.head,
                self.tail
                    .iter()
                    .map(|t| format!("{:?} ", t))
                    .collect::<String>()
                    .trim_end()
            ))
            .finish()
    }
}

impl Display for Production<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(
            "{} -> {}",
            self.head,
            self.tail
                .iter()
                .map(|t| format!("{} ", t))
                .collect::<String>()
                .trim_end()
        ))
    }
}

impl PartialEq for Production<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.tail == other.tail
    }
}

impl Eq for Production<'_> {}

impl Hash for Production<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.head.hash(state);
        self.tail.hash(state);
    }
}

impl PartialOrd for Production<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Production<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.head, &self.tail).cmp(&(other.head, &other.tail))
    }
}

impl<'a> Production<'a> {
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn head(&self) -> NonTerminal<'a> {
        self.head
    }

    #[must_use]
    pub fn tail(&self) -> &[Token<'a>] {
        &self.tail
    }
}

#[derive(Debug, Clone)]
pub struct Grammar<'a> {
    bump: &'a Bump,
    prods: Vec<&'a Production<'a>>,
    tokens: BTreeSet<Token<'a>>,
    start: NonTerminal<'a>,
    /// 下一个要分配的产生式编号.
    next_prod_id: usize,
}

impl PartialEq for Grammar<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.prods == other.prods && self.start == other.start && self.tokens == other.tokens
    }
}

impl Eq for Grammar<'_> {}

impl Display for Grammar<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = String::new();
        for nt in self.variables() {
            let alts: Vec<String> = self
                .alternatives_of(nt)
                .map(|alt| {
                    alt.iter()
                        .map(|t| format!("{t} "))
                        .collect::<String>()
                        .trim_end()
                        .to_string()
                })
                .collect();
            lines += &format!("{} -> {}\n", nt, alts.join(" | "));
        }
        f.pad(lines.trim_end())
    }
}

impl<'a> Grammar<'a> {
    /// 按产生式编号遍历产生式.
    pub fn prods(&self) -> &[&'a Production<'a>] {
        &self.prods
    }

    #[must_use]
    pub fn symbol_start(&self) -> NonTerminal<'a> {
        self.start
    }

    #[must_use]
    pub fn tokens(&self) -> &BTreeSet<Token<'a>> {
        &self.tokens
    }

    /// 文法中的非终结符, 按首次作为产生式头部出现的顺序.
    /// 左递归消除依赖这个顺序.
    pub fn variables(&self) -> impl Iterator<Item = NonTerminal<'a>> {
        let mut seen = HashSet::new();
        self.prods
            .iter()
            .filter_map(move |p| seen.insert(p.head()).then_some(p.head()))
    }

    /// 文法中的终结符, 按字典序, 始终包含 [`EOF`].
    pub fn terminals(&self) -> impl Iterator<Item = Terminal<'a>> {
        self.tokens.iter().filter_map(|t| t.as_term()).copied()
    }

    /// 获取以某个非终结符为头部的所有产生式, 保持书写顺序.
    pub fn prods_of(&self, nt: NonTerminal<'a>) -> impl Iterator<Item = &'a Production<'a>> {
        self.prods.iter().copied().filter(move |p| p.head() == nt)
    }

    /// 某个非终结符的所有备选右部, 保持书写顺序.
    pub fn alternatives_of(&self, nt: NonTerminal<'a>) -> impl Iterator<Item = &'a [Token<'a>]> {
        self.prods_of(nt).map(|p| p.tail())
    }

    pub fn from_cfg(s: &'a str, start: NonTerminal<'a>, bump: &'a Bump) -> Result<Self, Error> {
        let mut non_terminals = HashSet::new();
        let mut splitted: Vec<(&str, &str)> = Vec::new();
        // 找出所有的非终结符.
        for (line_num, line) in s
            .lines()
            .enumerate()
            .filter(|(_, s)| !s.is_empty() && s.chars().any(|c| !c.is_whitespace()))
        {
            let parts = line.split_once("->").ok_or(Error::parse_production_error(
                line_num,
                ParseProductionError::NoArrow,
            ))?;
            let head_ident = parts.0.trim();
            splitted.push((head_ident, parts.1));
            non_terminals.insert(head_ident);
        }
        // 验证是否有起始符.
        if !non_terminals.contains(&start.as_str()) {
            Err(Error::parse_production_error(
                0,
                ParseProductionError::StartSymbolNotFound,
            ))?
        }
        let mut grammar = Grammar {
            bump,
            prods: Vec::new(),
            tokens: [EOF.into()].into(),
            start,
            next_prod_id: 0,
        };
        // 解析所有产生式. 文法文本中的 `E` 解析为空串符号.
        for (head_ident, tails) in splitted {
            for tail_s in tails.split('|') {
                let tail = tail_s
                    .split_ascii_whitespace()
                    .map(|s| {
                        let s = s.trim();
                        if non_terminals.contains(&s) {
                            Token::from(NonTerminal::from(s))
                        } else {
                            Token::from(Terminal::from(s))
                        }
                    })
                    .collect();
                grammar.push_production(NonTerminal::from(head_ident), tail);
            }
        }
        Ok(grammar)
    }

    /// 创建并登记一个产生式, 编号单调递增, 右部中的符号并入字母表.
    pub(crate) fn push_production(
        &mut self,
        head: NonTerminal<'a>,
        tail: Vec<Token<'a>>,
    ) -> &'a Production<'a> {
        self.tokens.insert(head.into());
        self.tokens.extend(tail.iter().copied());
        let prod = &*self.bump.alloc(Production {
            id: self.next_prod_id,
            head,
            tail,
        });
        self.next_prod_id += 1;
        self.prods.push(prod);
        prod
    }

    /// 用新的产生式关系整体替换旧的, 变换过程用.
    /// `order` 决定新文法中各非终结符的顺序, 其必须覆盖 `relations` 的所有键.
    pub(crate) fn replace_relations(
        &mut self,
        order: &[NonTerminal<'a>],
        mut relations: HashMap<NonTerminal<'a>, Vec<Vec<Token<'a>>>>,
    ) {
        debug_assert!(relations.keys().all(|nt| order.contains(nt)));
        self.prods.clear();
        self.tokens = [EOF.into()].into();
        for nt in order {
            for tail in relations.remove(nt).unwrap_or_default() {
                self.push_production(*nt, tail);
            }
        }
    }

    /// 生成一个文法中尚未使用的新非终结符, 名字由父符号派生, 确定性且不会冲突.
    /// 名字的存储分配在 arena 中.
    pub(crate) fn fresh_non_terminal(&mut self, base: NonTerminal<'a>) -> NonTerminal<'a> {
        let mut candidate = format!("{}prime", base.as_str());
        let mut n = 1usize;
        while self
            .tokens
            .contains(&NonTerminal::from(candidate.as_str()).into())
        {
            n += 1;
            candidate = format!("{}prime{}", base.as_str(), n);
        }
        let ident = &*self.bump.alloc(candidate);
        let fresh = NonTerminal::fresh(ident.as_str());
        self.tokens.insert(fresh.into());
        fresh
    }
}
