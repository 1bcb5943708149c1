use std::collections::HashMap;

use crate::{
    Grammar, NonTerminal, Terminal, Token,
    attributes::{Attributes, first_of_seq},
    error::Error,
    token::EPSILON,
};

/// LL(1) 预测分析表.
///
/// 以 (非终结符, 终结符) 为键, 值是预测出的产生式右部.
/// 构建成功之后不可变, 在一个分析器实例的整个生命周期内共享.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<'a> {
    cells: HashMap<(NonTerminal<'a>, Terminal<'a>), Vec<Token<'a>>>,
    start: NonTerminal<'a>,
    /// 表的行顺序, 即文法中非终结符的出现顺序.
    variables: Vec<NonTerminal<'a>>,
    /// 表的列顺序, 按字典序, 含 [`crate::token::EOF`], 不含 [`EPSILON`].
    terms: Vec<Terminal<'a>>,
}

impl<'a> Table<'a> {
    /// 由文法与其 FIRST/FOLLOW 集构建预测分析表.
    ///
    /// 对每个产生式 `A -> γ`: FIRST(γ) 中除空串外的每个终结符 t 都登记
    /// `(A, t) -> γ`; 若 FIRST(γ) 含空串, 再对 FOLLOW(A) 中的每个终结符登记同一项.
    ///
    /// # Errors
    /// 任何一次登记落在已被占用的格子上, 文法就不是 LL(1),
    /// 构建中止并返回 [`Error::NotLl1`] 报告冲突的 (非终结符, 终结符) 对.
    pub fn build_from(grammar: &Grammar<'a>, attrs: &Attributes<'a>) -> Result<Self, Error> {
        let mut cells = HashMap::new();
        for prod in grammar.prods() {
            let first_tokens = first_of_seq(prod.tail(), attrs.first());
            for t in first_tokens.iter().filter(|t| **t != EPSILON) {
                Self::occupy(&mut cells, prod.head(), *t, prod.tail())?;
            }
            if first_tokens.contains(&EPSILON) {
                for t in attrs.follow_of(prod.head()) {
                    Self::occupy(&mut cells, prod.head(), t, prod.tail())?;
                }
            }
        }
        Ok(Self {
            cells,
            start: grammar.symbol_start(),
            variables: grammar.variables().collect(),
            terms: grammar.terminals().filter(|t| *t != EPSILON).collect(),
        })
    }

    fn occupy(
        cells: &mut HashMap<(NonTerminal<'a>, Terminal<'a>), Vec<Token<'a>>>,
        nt: NonTerminal<'a>,
        t: Terminal<'a>,
        tail: &[Token<'a>],
    ) -> Result<(), Error> {
        if cells.insert((nt, t), tail.to_vec()).is_some() {
            Err(Error::NotLl1 {
                variable: nt.as_str().to_string(),
                terminal: t.as_str().to_string(),
            })?
        }
        Ok(())
    }

    #[must_use]
    pub fn symbol_start(&self) -> NonTerminal<'a> {
        self.start
    }

    /// 查表: 栈顶非终结符在当前向前看终结符下预测出的产生式右部.
    #[must_use]
    pub fn get(&self, nt: NonTerminal<'a>, t: Terminal<'a>) -> Option<&[Token<'a>]> {
        self.cells.get(&(nt, t)).map(Vec::as_slice)
    }

    /// 使用 markdown 形式输出表格, 格子里是预测出的产生式右部.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let header_line = format!(
            "| |{}",
            self.terms
                .iter()
                .map(|t| format!(" `{}` |", t.as_str()))
                .collect::<String>()
        );
        let sep_line: String = String::from("| - |")
            + &std::iter::repeat_n(" - |", self.terms.len()).collect::<String>();
        let mut data_lines = String::new();
        for nt in &self.variables {
            let line = format!("| `{}` |", nt.as_str())
                + &self
                    .terms
                    .iter()
                    .map(|t| match self.get(*nt, *t) {
                        Some(tail) => {
                            let tail_s: String = tail.iter().map(|t| format!("{t} ")).collect();
                            format!(" {} |", tail_s.trim_end())
                        }
                        None => "  |".to_string(),
                    })
                    .collect::<String>();
            data_lines += &line;
            data_lines += "\n";
        }
        format!("{header_line}\n{sep_line}\n{}", data_lines.trim_end())
    }
}
