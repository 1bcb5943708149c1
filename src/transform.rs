//! 文法变换: 消除左递归与提取左公因子.
//!
//! 两趟变换都是值到值的: 消耗旧文法, 产出重写后的新文法.
//! 新生成的非终结符由 [`Grammar::fresh_non_terminal`] 派生命名, 确定性且不会冲突.

use std::collections::HashMap;

use crate::{Grammar, NonTerminal, Token, error::Error, token::EPSILON};

type Relations<'a> = HashMap<NonTerminal<'a>, Vec<Vec<Token<'a>>>>;

impl<'a> Grammar<'a> {
    fn relations(&self) -> Relations<'a> {
        self.variables()
            .map(|nt| {
                (
                    nt,
                    self.alternatives_of(nt).map(|alt| alt.to_vec()).collect(),
                )
            })
            .collect()
    }

    /// 消除文法中的 (直接与间接) 左递归.
    ///
    /// 按非终结符首次出现的顺序处理: 先把更早的非终结符的备选代入作为前缀出现的位置,
    /// 再做直接左递归消除: `A -> A α | β` 重写为 `A -> β A'` 与 `A' -> α A' | ε`.
    ///
    /// # Errors
    /// 代入之后出现形如 `A -> A` 的单位推导环时返回
    /// [`Error::UnitDerivationCycle`], 而不是无终止地循环.
    /// 经由纯空串推导形成的更隐蔽的非终结符环是本算法的前置条件, 不做检测.
    pub fn without_left_recursion(mut self) -> Result<Self, Error> {
        let order: Vec<NonTerminal<'a>> = self.variables().collect();
        let mut full_order = order.clone();
        let mut relations = self.relations();

        for (i, &ai) in order.iter().enumerate() {
            // 代入所有更早的 Aj: `Ai -> Aj γ` 展开成 `Ai -> δ γ`, δ 取遍 Aj 当前的备选.
            for &aj in &order[..i] {
                let mut new_alts = Vec::new();
                for alt in &relations[&ai] {
                    if alt.first() == Some(&aj.into()) {
                        for delta in &relations[&aj] {
                            let mut substituted = delta.clone();
                            substituted.extend_from_slice(&alt[1..]);
                            new_alts.push(substituted);
                        }
                    } else {
                        new_alts.push(alt.clone());
                    }
                }
                relations.insert(ai, new_alts);
            }

            // 直接左递归消除.
            let mut recursive = Vec::new();
            let mut plain = Vec::new();
            for alt in relations.remove(&ai).unwrap_or_default() {
                if alt.first() == Some(&ai.into()) {
                    if alt.len() == 1 {
                        Err(Error::UnitDerivationCycle(ai.as_str().to_string()))?
                    }
                    recursive.push(alt[1..].to_vec());
                } else {
                    plain.push(alt);
                }
            }
            if recursive.is_empty() {
                relations.insert(ai, plain);
                continue;
            }

            let fresh = self.fresh_non_terminal(ai);
            // A -> β1 A' | ... | βs A'
            for beta in &mut plain {
                beta.push(fresh.into());
            }
            relations.insert(ai, plain);
            // A' -> α1 A' | ... | αr A' | ε
            for alpha in &mut recursive {
                alpha.push(fresh.into());
            }
            recursive.push(vec![EPSILON.into()]);
            relations.insert(fresh, recursive);
            let at = full_order.iter().position(|nt| *nt == ai).unwrap();
            full_order.insert(at + 1, fresh);
        }

        self.replace_relations(&full_order, relations);
        Ok(self)
    }

    /// 提取左公因子, 直到没有任何非终结符的两个备选共享非空前缀.
    ///
    /// 每次找出某个非终结符的备选中被两个或更多备选共享的最长公共前缀,
    /// 把它们重写为 `A -> prefix A'`, 各自的后续部分成为 `A'` 的备选
    /// (空后续变成显式的 ε 备选), 然后从头重新扫描.
    ///
    /// # Errors
    /// 找到的"公共前缀"为空时返回 [`Error::EmptyCommonPrefix`],
    /// 这说明输入破坏了文法不变量.
    pub fn left_factored(mut self) -> Result<Self, Error> {
        let mut order: Vec<NonTerminal<'a>> = self.variables().collect();
        let mut relations = self.relations();

        'rescan: loop {
            for idx in 0..order.len() {
                let left = order[idx];
                let alts = &relations[&left];
                let Some((pivot, matches, len)) = longest_shared_prefix(alts) else {
                    continue;
                };
                if len == 0 {
                    Err(Error::EmptyCommonPrefix)?
                }

                let prefix = alts[pivot][..len].to_vec();
                // A' 的备选: pivot 与所有匹配者去掉公共前缀之后的后续部分.
                let mut continuations = Vec::new();
                for i in std::iter::once(pivot).chain(matches.iter().copied()) {
                    let rest = alts[i][len..].to_vec();
                    continuations.push(if rest.is_empty() {
                        vec![EPSILON.into()]
                    } else {
                        rest
                    });
                }
                // A 保留未参与的备选, 换上唯一的 `prefix A'`.
                let mut remaining: Vec<Vec<Token<'a>>> = alts
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != pivot && !matches.contains(i))
                    .map(|(_, alt)| alt.clone())
                    .collect();

                let fresh = self.fresh_non_terminal(left);
                let mut factored = prefix;
                factored.push(fresh.into());
                remaining.push(factored);
                relations.insert(left, remaining);
                relations.insert(fresh, continuations);
                order.insert(idx + 1, fresh);
                continue 'rescan;
            }
            break;
        }

        self.replace_relations(&order, relations);
        Ok(self)
    }
}

/// 在一组备选中寻找被至少两个备选共享的最长公共前缀.
///
/// 返回 (基准备选下标, 与之匹配的其他备选下标, 前缀长度); 没有共享前缀时返回 [`None`].
/// 前缀长度从基准备选的全长往下逐一尝试, 保证取到最长者.
fn longest_shared_prefix(alts: &[Vec<Token<'_>>]) -> Option<(usize, Vec<usize>, usize)> {
    for (pivot, alt) in alts.iter().enumerate() {
        for len in (1..=alt.len()).rev() {
            let matches: Vec<usize> = alts
                .iter()
                .enumerate()
                .filter(|(j, other)| {
                    *j != pivot && other.len() >= len && other[..len] == alt[..len]
                })
                .map(|(j, _)| j)
                .collect();
            if !matches.is_empty() {
                return Some((pivot, matches, len));
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use crate::{Grammar, NonTerminal, Token, error::Error};
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;

    fn begins_with_own_head(grammar: &Grammar<'_>) -> bool {
        grammar
            .prods()
            .iter()
            .any(|p| p.tail().first() == Some(&Token::from(p.head())))
    }

    #[test]
    fn removes_direct_left_recursion() {
        let bump = Bump::new();
        let grammar = Grammar::from_cfg("expr -> expr + term | term\nterm -> id", "expr".into(), &bump)
            .unwrap()
            .without_left_recursion()
            .unwrap();
        assert!(!begins_with_own_head(&grammar));
        assert_eq!(
            grammar.to_string(),
            "expr -> term exprprime\n\
             exprprime -> + term exprprime | E\n\
             term -> id"
        );
        let fresh: Vec<_> = grammar
            .variables()
            .filter(NonTerminal::is_synthetic)
            .collect();
        assert_eq!(fresh, vec![NonTerminal::from("exprprime")]);
    }

    #[test]
    fn removes_indirect_left_recursion() {
        let bump = Bump::new();
        let grammar = Grammar::from_cfg("S -> A a\nA -> S b | c", "S".into(), &bump)
            .unwrap()
            .without_left_recursion()
            .unwrap();
        assert!(!begins_with_own_head(&grammar));
        assert_eq!(
            grammar.to_string(),
            "S -> A a\n\
             A -> c Aprime\n\
             Aprime -> a b Aprime | E"
        );
    }

    #[test]
    fn unit_cycle_is_detected() {
        let bump = Bump::new();
        let err = Grammar::from_cfg("A -> B\nB -> A", "A".into(), &bump)
            .unwrap()
            .without_left_recursion()
            .unwrap_err();
        assert_eq!(err, Error::UnitDerivationCycle("B".to_string()));

        let err = Grammar::from_cfg("A -> A | a", "A".into(), &bump)
            .unwrap()
            .without_left_recursion()
            .unwrap_err();
        assert_eq!(err, Error::UnitDerivationCycle("A".to_string()));
    }

    #[test]
    fn factors_shared_prefix() {
        let bump = Bump::new();
        let grammar = Grammar::from_cfg("A -> a b | a c", "A".into(), &bump)
            .unwrap()
            .left_factored()
            .unwrap();
        assert_eq!(
            grammar.to_string(),
            "A -> a Aprime\n\
             Aprime -> b | c"
        );
    }

    #[test]
    fn empty_continuation_becomes_epsilon() {
        let bump = Bump::new();
        let grammar = Grammar::from_cfg("A -> a b | a", "A".into(), &bump)
            .unwrap()
            .left_factored()
            .unwrap();
        assert_eq!(
            grammar.to_string(),
            "A -> a Aprime\n\
             Aprime -> b | E"
        );
    }

    #[test]
    fn factoring_repeats_until_stable() {
        let bump = Bump::new();
        let grammar = Grammar::from_cfg("A -> a b c | a b d | a e", "A".into(), &bump)
            .unwrap()
            .left_factored()
            .unwrap();
        // 第一轮提出最长前缀 `a b`, 第二轮继续提出剩下的 `a`.
        assert_eq!(
            grammar.to_string(),
            "A -> a Aprime2\n\
             Aprime2 -> e | b Aprime\n\
             Aprime -> c | d"
        );
    }
}
