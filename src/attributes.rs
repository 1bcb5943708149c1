//! FIRST/FOLLOW 集的不动点求解.
//!
//! 所有集合只会单调增长且都是有限终结符集合的子集, 因此迭代一定会终止.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use crate::{
    Grammar, NonTerminal, Terminal, Token,
    token::{EOF, EPSILON},
};

pub type TermSet<'a> = BTreeSet<Terminal<'a>>;
pub type AttrSets<'a> = BTreeMap<NonTerminal<'a>, TermSet<'a>>;

/// 计算一个符号序列的 FIRST 集, 只依赖当前已求得的各非终结符 FIRST 集.
///
/// 从左往右扫描: 终结符直接加入并停止; 非终结符并入其 FIRST 集去掉空串的部分,
/// 只有其可空时才继续看下一个符号. 扫描完整个序列 (或序列为空) 则结果包含 [`EPSILON`].
///
/// 序列中出现文法里未登记的非终结符时按空集处理.
#[must_use]
pub fn first_of_seq<'a>(seq: &[Token<'a>], first: &AttrSets<'a>) -> TermSet<'a> {
    let mut result = TermSet::new();
    for token in seq {
        match token {
            Token::Terminal(t) => {
                result.insert(*t);
                return result;
            }
            Token::NonTerminal(nt) => {
                let Some(fs) = first.get(nt) else {
                    return result;
                };
                result.extend(fs.iter().filter(|t| **t != EPSILON));
                if !fs.contains(&EPSILON) {
                    return result;
                }
            }
        }
    }
    // 序列为空或者所有符号都可空.
    result.insert(EPSILON);
    result
}

/// 计算文法中所有非终结符的 FIRST 集.
#[must_use]
pub fn compute_first<'a>(grammar: &Grammar<'a>) -> AttrSets<'a> {
    let mut first: AttrSets<'a> = grammar.variables().map(|nt| (nt, TermSet::new())).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for prod in grammar.prods() {
            let computed = first_of_seq(prod.tail(), &first);
            let set = first.entry(prod.head()).or_default();
            let before = set.len();
            set.extend(computed);
            changed |= set.len() != before;
        }
    }
    first
}

/// 计算文法中所有非终结符的 FOLLOW 集, 起始符号的集合以 [`EOF`] 为种子.
///
/// 对每个产生式 `A -> α B β`: FOLLOW(B) 并入 FIRST(β) 去掉空串的部分;
/// 若 β 可空 (包括 β 为空), FOLLOW(B) 再并入 FOLLOW(A). 迭代到不动点.
#[must_use]
pub fn compute_follow<'a>(grammar: &Grammar<'a>, first: &AttrSets<'a>) -> AttrSets<'a> {
    let mut follow: AttrSets<'a> = grammar.variables().map(|nt| (nt, TermSet::new())).collect();
    follow.entry(grammar.symbol_start()).or_default().insert(EOF);

    let mut changed = true;
    while changed {
        changed = false;
        for prod in grammar.prods() {
            for (index, token) in prod.tail().iter().enumerate() {
                let Token::NonTerminal(nt) = token else {
                    continue;
                };
                let start_of_rest = first_of_seq(&prod.tail()[index + 1..], first);
                let nullable_rest = start_of_rest.contains(&EPSILON);
                let mut addition: TermSet<'a> = start_of_rest
                    .into_iter()
                    .filter(|t| *t != EPSILON)
                    .collect();
                if nullable_rest {
                    addition.extend(follow.get(&prod.head()).cloned().unwrap_or_default());
                }
                let set = follow.entry(*nt).or_default();
                let before = set.len();
                set.extend(addition);
                changed |= set.len() != before;
            }
        }
    }
    follow
}

/// 一个文法的 FIRST 与 FOLLOW 集, 建表所需的全部属性.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes<'a> {
    first: AttrSets<'a>,
    follow: AttrSets<'a>,
}

impl<'a> Attributes<'a> {
    #[must_use]
    pub fn of(grammar: &Grammar<'a>) -> Self {
        let first = compute_first(grammar);
        let follow = compute_follow(grammar, &first);
        Self { first, follow }
    }

    #[must_use]
    pub fn first(&self) -> &AttrSets<'a> {
        &self.first
    }

    #[must_use]
    pub fn follow(&self) -> &AttrSets<'a> {
        &self.follow
    }

    /// 某个非终结符的 FIRST 集, 未登记时为空集.
    #[must_use]
    pub fn first_of(&self, nt: NonTerminal<'a>) -> TermSet<'a> {
        self.first.get(&nt).cloned().unwrap_or_default()
    }

    /// 某个非终结符的 FOLLOW 集, 未登记时为空集.
    #[must_use]
    pub fn follow_of(&self, nt: NonTerminal<'a>) -> TermSet<'a> {
        self.follow.get(&nt).cloned().unwrap_or_default()
    }
}

impl Display for Attributes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let render = |sets: &AttrSets<'_>| -> String {
            sets.iter()
                .map(|(nt, set)| {
                    let items: Vec<&str> = set.iter().map(|t| t.as_str()).collect();
                    format!("{}: {{{}}}\n", nt, items.join(" "))
                })
                .collect()
        };
        f.pad(&format!(
            "FIRST:\n{}FOLLOW:\n{}",
            render(&self.first),
            render(&self.follow)
        ))
    }
}
