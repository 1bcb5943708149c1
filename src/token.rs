use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

/// 终结符在源代码中的位置 (行, 列), 仅用于诊断信息.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Loc {
    pub line: usize,
    pub col: usize,
}

impl Debug for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("{}:{}", self.line, self.col))
    }
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("{}:{}", self.line, self.col))
    }
}

impl Loc {
    #[must_use]
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

// 符号的相等性/哈希/排序只看字符串本身,
// 位置和合成标记只是附带的诊断信息, 不参与判等,
// 否则符号就不能作为映射的键使用.

#[derive(Clone, Copy)]
pub struct Terminal<'a> {
    ident: &'a str,
    loc: Option<Loc>,
}

impl PartialEq for Terminal<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident
    }
}

impl Eq for Terminal<'_> {}

impl Hash for Terminal<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ident.hash(state);
    }
}

impl PartialOrd for Terminal<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Terminal<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ident.cmp(other.ident)
    }
}

impl Debug for Terminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(r#"t{:?}"#, self.ident))
    }
}

impl Display for Terminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.ident)
    }
}

impl<'a> From<&'a str> for Terminal<'a> {
    fn from(ident: &'a str) -> Self {
        Terminal { ident, loc: None }
    }
}

impl<'a> Terminal<'a> {
    pub fn as_str(&self) -> &'a str {
        self.ident
    }

    /// 附带源代码位置, 由词法部分在实际匹配输入时填入.
    #[must_use]
    pub fn at(self, loc: Loc) -> Self {
        Self {
            ident: self.ident,
            loc: Some(loc),
        }
    }

    #[must_use]
    pub fn loc(&self) -> Option<Loc> {
        self.loc
    }
}

#[derive(Clone, Copy)]
pub struct NonTerminal<'a> {
    ident: &'a str,
    synthetic: bool,
}

impl PartialEq for NonTerminal<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident
    }
}

impl Eq for NonTerminal<'_> {}

impl Hash for NonTerminal<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ident.hash(state);
    }
}

impl PartialOrd for NonTerminal<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NonTerminal<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ident.cmp(other.ident)
    }
}

impl Debug for NonTerminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(r#"nt{:?}"#, self.ident))
    }
}

impl Display for NonTerminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.ident)
    }
}

/// 空串符号, 只会作为某个产生式的空备选出现, 不会出现在 FOLLOW 集中.
pub const EPSILON: Terminal<'static> = Terminal {
    ident: "E",
    loc: None,
};
/// 输入结束符号, 始终存在于文法的终结符集合中, 但是词法部分永远不会产出它.
pub const EOF: Terminal<'static> = Terminal {
    ident: "eof",
    loc: None,
};

impl<'a> From<&'a str> for NonTerminal<'a> {
    fn from(ident: &'a str) -> Self {
        Self {
            ident,
            synthetic: false,
        }
    }
}

impl<'a> NonTerminal<'a> {
    pub fn as_str(&self) -> &'a str {
        self.ident
    }

    /// 变换过程生成的新非终结符.
    #[must_use]
    pub(crate) fn fresh(ident: &'a str) -> Self {
        Self {
            ident,
            synthetic: true,
        }
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

#[derive(Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Token<'a> {
    Terminal(Terminal<'a>),
    NonTerminal(NonTerminal<'a>),
}

impl Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(arg0) => f.pad(&format!("{:?}", arg0)),
            Self::NonTerminal(arg0) => f.pad(&format!("{:?}", arg0)),
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(arg0) => f.pad(&format!("{}", arg0)),
            Self::NonTerminal(arg0) => f.pad(&format!("{}", arg0)),
        }
    }
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Terminal(l0), Self::Terminal(r0)) => l0 == r0,
            (Self::NonTerminal(l0), Self::NonTerminal(r0)) => l0 == r0,
            _ => false,
        }
    }
}

impl Eq for Token<'_> {}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Terminal(t) => t.as_str(),
            Self::NonTerminal(nt) => nt.as_str(),
        }
    }

    #[must_use]
    pub fn is_term(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    #[must_use]
    pub fn is_non_term(&self) -> bool {
        matches!(self, Self::NonTerminal(_))
    }

    #[must_use]
    pub fn as_term(&self) -> Option<&Terminal<'a>> {
        match self {
            Self::Terminal(t) => Some(t),
            Self::NonTerminal(_) => None,
        }
    }

    #[must_use]
    pub fn as_non_term(&self) -> Option<&NonTerminal<'a>> {
        match self {
            Self::Terminal(_) => None,
            Self::NonTerminal(nt) => Some(nt),
        }
    }
}

impl<'a> From<Terminal<'a>> for Token<'a> {
    fn from(value: Terminal<'a>) -> Self {
        Self::Terminal(value)
    }
}

impl<'a> From<NonTerminal<'a>> for Token<'a> {
    fn from(value: NonTerminal<'a>) -> Self {
        Self::NonTerminal(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identity_ignores_metadata() {
        let plain = Terminal::from("id");
        let located = Terminal::from("id").at(Loc::new(3, 7));
        assert_eq!(plain, located);
        assert_eq!(located.loc(), Some(Loc::new(3, 7)));

        let original = NonTerminal::from("expr");
        let generated = NonTerminal::fresh("expr");
        assert_eq!(original, generated);
        assert!(generated.is_synthetic());
        assert!(!original.is_synthetic());
    }

    #[test]
    fn token_variants_never_equal() {
        let t: Token = Terminal::from("x").into();
        let nt: Token = NonTerminal::from("x").into();
        assert!(t != nt);
        assert_eq!(t.as_str(), nt.as_str());
    }

    #[test]
    fn token_accessors_follow_the_variant() {
        let t: Token = Terminal::from("x").into();
        let nt: Token = NonTerminal::from("S").into();
        assert!(t.is_term() && !t.is_non_term());
        assert!(nt.is_non_term() && !nt.is_term());
        assert_eq!(t.as_term(), Some(&Terminal::from("x")));
        assert_eq!(t.as_non_term(), None);
        assert_eq!(nt.as_non_term(), Some(&NonTerminal::from("S")));
        assert_eq!(nt.as_term(), None);
    }
}
